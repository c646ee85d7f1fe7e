//! Display strings derived from the timer state

use serde::{Deserialize, Serialize};

use crate::state::{Mode, TimerState};

/// Format seconds as `M:SS`
pub fn format_time(time_left: u32) -> String {
    format!("{}:{:02}", time_left / 60, time_left % 60)
}

/// Share of the current mode's duration still left, in percent
pub fn progress_percent(time_left: u32, mode: Mode) -> f64 {
    let percent = f64::from(time_left) / f64::from(mode.duration()) * 100.0;
    percent.clamp(0.0, 100.0)
}

pub fn mode_label(mode: Mode) -> &'static str {
    match mode {
        Mode::Work => "Work Mode",
        Mode::Break => "Break Mode",
    }
}

/// Everything needed to draw the timer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerView {
    pub time: String,
    pub progress: f64,
    pub mode: Mode,
    pub mode_label: String,
    pub time_left: u32,
    pub is_running: bool,
}

impl From<&TimerState> for TimerView {
    fn from(state: &TimerState) -> Self {
        Self {
            time: format_time(state.time_left),
            progress: progress_percent(state.time_left, state.mode),
            mode: state.mode,
            mode_label: mode_label(state.mode).to_string(),
            time_left: state.time_left,
            is_running: state.is_running,
        }
    }
}
