//! Timer state structure and the two Pomodoro modes

use serde::{Deserialize, Serialize};

/// Length of a work phase in seconds
pub const WORK_DURATION_SECS: u32 = 25 * 60;

/// Length of a break phase in seconds
pub const BREAK_DURATION_SECS: u32 = 5 * 60;

/// Largest `time_left` any mode can legitimately hold
pub const MAX_DURATION_SECS: u32 = if WORK_DURATION_SECS > BREAK_DURATION_SECS {
    WORK_DURATION_SECS
} else {
    BREAK_DURATION_SECS
};

/// The two alternating Pomodoro phases
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Work,
    Break,
}

impl Mode {
    /// Fixed duration of this mode in seconds
    pub fn duration(self) -> u32 {
        match self {
            Mode::Work => WORK_DURATION_SECS,
            Mode::Break => BREAK_DURATION_SECS,
        }
    }

    /// The mode that follows this one
    pub fn next(self) -> Self {
        match self {
            Mode::Work => Mode::Break,
            Mode::Break => Mode::Work,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Work => "work",
            Mode::Break => "break",
        }
    }
}

/// Countdown state, also the record persisted across restarts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub time_left: u32,
    pub mode: Mode,
    #[serde(default)]
    pub is_running: bool,
}

impl TimerState {
    /// Create a fresh, idle work phase
    pub fn new() -> Self {
        Self::idle(Mode::Work)
    }

    /// Create an idle state at the full duration of `mode`
    pub fn idle(mode: Mode) -> Self {
        Self {
            time_left: mode.duration(),
            mode,
            is_running: false,
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}
