//! User actions accepted by the application state

/// Every action the user surface can trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Reset,
    SetUserName(String),
    SelectTrack(String),
    PlayMusic,
    PauseMusic,
    StopMusic,
}

impl Command {
    /// Short name recorded as the last action
    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Pause => "pause",
            Command::Reset => "reset",
            Command::SetUserName(_) => "set-user",
            Command::SelectTrack(_) => "select-track",
            Command::PlayMusic => "music-play",
            Command::PauseMusic => "music-pause",
            Command::StopMusic => "music-stop",
        }
    }
}
