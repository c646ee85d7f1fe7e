//! External collaborator module
//!
//! Speech output, media playback, and the thin controllers that drive them.

pub mod announcer;
pub mod music;
pub mod player;
pub mod speech;

// Re-export main types
pub use announcer::{display_name, Announcement, Announcer, DEFAULT_USER_NAME};
pub use music::{find_track, MusicController, MusicTrack, TRACKS};
pub use player::{CommandPlayer, MediaPlayer};
pub use speech::{CommandSpeech, SpeechOutput};
