//! Background music catalog and transport controls

use serde::Serialize;
use std::{sync::Arc, time::Duration};
use tracing::debug;

use super::player::MediaPlayer;

/// One entry of the static track catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MusicTrack {
    pub name: &'static str,
    pub url: &'static str,
}

/// Bundled ambient tracks, in display order
pub static TRACKS: &[MusicTrack] = &[
    MusicTrack { name: "A Bird", url: "a-bird.mp3" },
    MusicTrack { name: "Bird Flight", url: "bird-flight.mp3" },
    MusicTrack { name: "Cinematic Ascent", url: "cenematic-ascent.mp3" },
    MusicTrack { name: "Investigation", url: "nature-investigation.mp3" },
    MusicTrack { name: "Faraway", url: "faraway-bird.mp3" },
    MusicTrack { name: "Meet The Rain", url: "meet-the-rain.mp3" },
    MusicTrack { name: "Smooth", url: "smooth.mp3" },
    MusicTrack { name: "Voice Of Nature", url: "voice of nature.mp3" },
    MusicTrack { name: "Water Fountain", url: "Water-fountain.mp3" },
];

/// Look up a catalog entry by its url
pub fn find_track(url: &str) -> Option<&'static MusicTrack> {
    TRACKS.iter().find(|track| track.url == url)
}

/// Forwards transport commands to the player, remembering the selected track
pub struct MusicController {
    player: Arc<dyn MediaPlayer>,
    selected: Option<String>,
}

impl MusicController {
    pub fn new(player: Arc<dyn MediaPlayer>) -> Self {
        Self {
            player,
            selected: None,
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Load a track. Empty urls are ignored.
    pub fn select_track(&mut self, url: &str) {
        if url.is_empty() {
            return;
        }
        self.player.set_source(url);
        self.selected = Some(url.to_string());
    }

    /// Start playback. No-op until a track is selected.
    pub fn play(&self) {
        if self.selected.is_none() {
            debug!("Play ignored, no track selected");
            return;
        }
        self.player.play();
    }

    pub fn pause(&self) {
        self.player.pause();
    }

    /// Pause and rewind to the beginning
    pub fn stop(&self) {
        self.player.pause();
        self.player.seek(Duration::ZERO);
    }
}
