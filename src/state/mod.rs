//! State management module
//!
//! This module contains the timer record, the user command set and the shared
//! application state.

pub mod app_state;
pub mod commands;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, Collaborators};
pub use commands::Command;
pub use timer_state::{Mode, TimerState, BREAK_DURATION_SECS, MAX_DURATION_SECS, WORK_DURATION_SECS};
