//! Countdown timer module
//!
//! The state machine and the periodic clock that drives it.

pub mod clock;
pub mod machine;

// Re-export main types
pub use clock::{Clock, TickHandle, TokioClock};
pub use machine::{TimerEvent, TimerMachine, TICK_PERIOD};
