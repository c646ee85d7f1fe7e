//! Shared fakes for integration tests.

#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use pomodoro_radio::{
    persistence::{KeyValueStore, MemoryStore},
    services::{MediaPlayer, SpeechOutput},
    state::{AppState, Collaborators},
    timer::{Clock, TickHandle},
};

/// Clock that never fires on its own; tests deliver ticks by hand.
#[derive(Default)]
pub struct ManualClock {
    next_id: Mutex<u64>,
    active: Mutex<Vec<u64>>,
}

impl ManualClock {
    pub fn active(&self) -> Vec<u64> {
        self.active.lock().unwrap().clone()
    }
}

impl Clock for ManualClock {
    fn schedule(&self, _period: Duration) -> TickHandle {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        self.active.lock().unwrap().push(*next_id);
        TickHandle::new(*next_id)
    }

    fn cancel(&self, handle: TickHandle) {
        self.active.lock().unwrap().retain(|id| *id != handle.id());
    }
}

#[derive(Default)]
pub struct RecordingSpeech {
    spoken: Mutex<Vec<String>>,
}

impl RecordingSpeech {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

impl SpeechOutput for RecordingSpeech {
    fn speak(&self, text: &str) {
        self.spoken.lock().unwrap().push(text.to_string());
    }
}

#[derive(Default)]
pub struct RecordingPlayer {
    calls: Mutex<Vec<String>>,
}

impl RecordingPlayer {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn push(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl MediaPlayer for RecordingPlayer {
    fn set_source(&self, url: &str) {
        self.push(format!("source {}", url));
    }

    fn play(&self) {
        self.push("play".to_string());
    }

    fn pause(&self) {
        self.push("pause".to_string());
    }

    fn seek(&self, position: Duration) {
        self.push(format!("seek {}", position.as_secs()));
    }

    fn play_alarm(&self) {
        self.push("alarm".to_string());
    }
}

/// An application state wired to fakes, plus handles to inspect them
pub struct Harness {
    pub state: Arc<AppState>,
    pub clock: Arc<ManualClock>,
    pub speech: Arc<RecordingSpeech>,
    pub player: Arc<RecordingPlayer>,
    pub store: Arc<MemoryStore>,
}

impl Harness {
    pub fn new(user: &str) -> Self {
        Self::with_store(user, Arc::new(MemoryStore::new()))
    }

    pub fn with_store(user: &str, store: Arc<MemoryStore>) -> Self {
        let clock = Arc::new(ManualClock::default());
        let speech = Arc::new(RecordingSpeech::default());
        let player = Arc::new(RecordingPlayer::default());

        let state = Arc::new(AppState::new(
            20525,
            "127.0.0.1".to_string(),
            user.to_string(),
            Collaborators {
                clock: clock.clone(),
                speech: speech.clone(),
                player: player.clone(),
                store: Box::new(store.clone()) as Box<dyn KeyValueStore>,
            },
        ));

        Self {
            state,
            clock,
            speech,
            player,
            store,
        }
    }

    /// Deliver one tick from the live subscription
    pub fn tick(&self) {
        let id = *self
            .clock
            .active()
            .last()
            .expect("no live tick subscription");
        self.state.clock_tick(id).unwrap();
    }
}
