//! Configuration and CLI argument handling

use clap::Parser;
use std::path::PathBuf;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "pomodoro-radio")]
#[command(about = "A Pomodoro timer daemon with spoken transitions and background music")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20525")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// File holding the saved timer state
    #[arg(long, default_value = "pomodoro-state.json")]
    pub state_file: PathBuf,

    /// Keep timer state in memory only
    #[arg(long)]
    pub ephemeral: bool,

    /// Directory containing the music tracks
    #[arg(long, default_value = ".")]
    pub music_dir: PathBuf,

    /// Sound played when a phase ends
    #[arg(long, default_value = "alarm.mp3")]
    pub alarm: PathBuf,

    /// mpv-compatible media player program
    #[arg(long, default_value = "mpv")]
    pub player: String,

    /// espeak-compatible text-to-speech program
    #[arg(long, default_value = "espeak-ng")]
    pub speech: String,

    /// Preferred voice, matched against installed voice names
    #[arg(long, default_value = "Female")]
    pub voice: String,

    /// Name used in announcements
    #[arg(short, long, default_value = "")]
    pub user: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["pomodoro-radio"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20525");
        assert_eq!(config.state_file, PathBuf::from("pomodoro-state.json"));
        assert_eq!(config.voice, "Female");
        assert_eq!(config.user, "");
        assert_eq!(config.log_level(), "info");
        assert!(!config.ephemeral);
    }

    #[test]
    fn overrides() {
        let config = Config::try_parse_from([
            "pomodoro-radio",
            "--port",
            "9000",
            "--user",
            "Ada",
            "--ephemeral",
            "-v",
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.user, "Ada");
        assert!(config.ephemeral);
        assert_eq!(config.log_level(), "debug");
    }
}
