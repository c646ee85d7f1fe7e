//! Pomodoro Radio - A Pomodoro timer daemon with spoken transitions and music
//!
//! This library provides the work/break countdown state machine, its
//! persistence, the display presenter and the speech and music collaborators,
//! exposed over a small HTTP API.

pub mod config;
pub mod state;
pub mod timer;
pub mod persistence;
pub mod presenter;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
