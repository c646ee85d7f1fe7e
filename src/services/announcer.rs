//! Spoken announcements for timer transitions

use std::sync::Arc;
use tracing::info;

use super::speech::SpeechOutput;

/// Name used when the user has not entered one
pub const DEFAULT_USER_NAME: &str = "User";

/// The sentences the timer can speak
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Announcement {
    Start,
    TimeForWork,
    TimeForBreak,
}

impl Announcement {
    /// Sentence addressed to `user_name`
    pub fn sentence(self, user_name: &str) -> String {
        let user = display_name(user_name);
        match self {
            Announcement::Start => format!("{}, your Pomodoro time starts now.", user),
            Announcement::TimeForWork => format!("{}, time for work!", user),
            Announcement::TimeForBreak => format!("{}, time for a break!", user),
        }
    }
}

/// Trimmed user name, or the default when blank
pub fn display_name(user_name: &str) -> &str {
    let trimmed = user_name.trim();
    if trimmed.is_empty() {
        DEFAULT_USER_NAME
    } else {
        trimmed
    }
}

pub struct Announcer {
    speech: Arc<dyn SpeechOutput>,
}

impl Announcer {
    pub fn new(speech: Arc<dyn SpeechOutput>) -> Self {
        Self { speech }
    }

    pub fn announce(&self, announcement: Announcement, user_name: &str) {
        let sentence = announcement.sentence(user_name);
        info!("Announcing: {}", sentence);
        self.speech.speak(&sentence);
    }
}
