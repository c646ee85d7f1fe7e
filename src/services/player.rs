//! Audio playback through an external media player

use std::{
    path::{Path, PathBuf},
    process::Stdio,
    sync::Mutex,
    time::{Duration, Instant},
};
use tokio::{
    process::{Child, Command},
    runtime::Handle,
};
use tracing::{debug, info, warn};

/// Playback surface used for background music and the alarm cue
pub trait MediaPlayer: Send + Sync {
    /// Load a track, stopping whatever was playing
    fn set_source(&self, url: &str);
    fn play(&self);
    fn pause(&self);
    /// Move the playback position of the current track
    fn seek(&self, position: Duration);
    /// Fire the single-shot alarm sound
    fn play_alarm(&self);
}

#[derive(Debug, Default)]
struct Playback {
    source: Option<PathBuf>,
    child: Option<Child>,
    offset: Duration,
    started_at: Option<Instant>,
}

impl Playback {
    /// Kill the player process, remembering how far it got. A track that
    /// already ended is rewound instead. Returns whether something was playing.
    fn halt(&mut self) -> bool {
        let Some(mut child) = self.child.take() else {
            return false;
        };

        match child.try_wait() {
            Ok(None) => {}
            Ok(Some(status)) => {
                debug!("Player already exited with {}, rewinding", status);
                self.rewind();
                return false;
            }
            Err(e) => {
                warn!("Failed to poll player process: {}", e);
                self.rewind();
                return false;
            }
        }

        if let Err(e) = child.start_kill() {
            debug!("Player process already gone: {}", e);
        }
        if let Some(started_at) = self.started_at.take() {
            self.offset += started_at.elapsed();
        }
        true
    }

    /// Forget the position of a track that finished on its own
    fn rewind(&mut self) {
        self.started_at = None;
        self.offset = Duration::ZERO;
    }

    fn is_playing(&mut self) -> bool {
        match self.child.as_mut().map(Child::try_wait) {
            Some(Ok(None)) => true,
            Some(_) => {
                // Track ended on its own
                self.child = None;
                self.rewind();
                false
            }
            None => false,
        }
    }
}

/// mpv-compatible player restarted at the remembered offset on every resume
#[derive(Debug)]
pub struct CommandPlayer {
    program: String,
    music_dir: PathBuf,
    alarm: PathBuf,
    playback: Mutex<Playback>,
}

impl CommandPlayer {
    pub fn new(program: impl Into<String>, music_dir: impl Into<PathBuf>, alarm: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            music_dir: music_dir.into(),
            alarm: alarm.into(),
            playback: Mutex::new(Playback::default()),
        }
    }

    fn command(&self, path: &Path, offset: Duration) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(["--no-video", "--really-quiet"])
            .arg(start_arg(offset))
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        command
    }

    fn with_playback<F>(&self, action: &str, f: F)
    where
        F: FnOnce(&mut Playback),
    {
        match self.playback.lock() {
            Ok(mut playback) => f(&mut playback),
            Err(e) => warn!("Failed to lock playback for {}: {}", action, e),
        }
    }
}

impl MediaPlayer for CommandPlayer {
    fn set_source(&self, url: &str) {
        let path = self.music_dir.join(url);
        self.with_playback("set_source", |playback| {
            playback.halt();
            info!("Selected track {}", path.display());
            playback.source = Some(path);
            playback.offset = Duration::ZERO;
        });
    }

    fn play(&self) {
        if Handle::try_current().is_err() {
            warn!("No runtime available, cannot start playback");
            return;
        }

        self.with_playback("play", |playback| {
            if playback.is_playing() {
                return;
            }
            let Some(source) = playback.source.clone() else {
                debug!("Play ignored, no track selected");
                return;
            };

            match self.command(&source, playback.offset).spawn() {
                Ok(child) => {
                    info!("Playing {} from {:?}", source.display(), playback.offset);
                    playback.child = Some(child);
                    playback.started_at = Some(Instant::now());
                }
                Err(e) => warn!("Failed to start player {}: {}", self.program, e),
            }
        });
    }

    fn pause(&self) {
        self.with_playback("pause", |playback| {
            if playback.halt() {
                info!("Music paused at {:?}", playback.offset);
            }
        });
    }

    fn seek(&self, position: Duration) {
        let mut resume = false;
        self.with_playback("seek", |playback| {
            resume = playback.halt();
            playback.offset = position;
        });

        if resume {
            self.play();
        }
    }

    fn play_alarm(&self) {
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("No runtime available, skipping alarm");
                return;
            }
        };

        let mut command = self.command(&self.alarm, Duration::ZERO);
        command.kill_on_drop(false);
        let program = self.program.clone();
        handle.spawn(async move {
            match command.status().await {
                Ok(status) if status.success() => {}
                Ok(status) => warn!("Alarm playback exited with {}", status),
                Err(e) => warn!("Failed to start player {} for alarm: {}", program, e),
            }
        });
    }
}

/// Player flag that starts playback at `offset`
fn start_arg(offset: Duration) -> String {
    format!("--start={:.3}", offset.as_secs_f64())
}
