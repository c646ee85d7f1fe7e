//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{Command, TimerState};
use crate::{
    persistence::{KeyValueStore, StatePersistence},
    presenter::TimerView,
    services::{Announcer, MediaPlayer, MusicController, SpeechOutput},
    timer::{Clock, TimerEvent, TimerMachine},
};

/// Outside-world handles the application drives
pub struct Collaborators {
    pub clock: Arc<dyn Clock>,
    pub speech: Arc<dyn SpeechOutput>,
    pub player: Arc<dyn MediaPlayer>,
    pub store: Box<dyn KeyValueStore>,
}

/// Main application state: the timer, the music controls and server metadata
pub struct AppState {
    machine: Mutex<TimerMachine>,
    music: Mutex<MusicController>,
    user_name: Mutex<String>,
    announcer: Announcer,
    player: Arc<dyn MediaPlayer>,
    persistence: StatePersistence,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Channel carrying every re-render
    view_tx: watch::Sender<TimerView>,
    /// Keep the receiver alive to prevent channel closure
    _view_rx: watch::Receiver<TimerView>,
}

impl AppState {
    /// Create the state, restoring the saved timer record when one exists
    pub fn new(port: u16, host: String, user_name: String, collaborators: Collaborators) -> Self {
        let persistence = StatePersistence::new(collaborators.store);
        let restored = persistence.load().unwrap_or_else(|| {
            info!("Starting from a fresh work phase");
            TimerState::new()
        });

        let machine = TimerMachine::new(restored, collaborators.clock);
        let (view_tx, view_rx) = watch::channel(TimerView::from(&machine.state()));

        Self {
            machine: Mutex::new(machine),
            music: Mutex::new(MusicController::new(Arc::clone(&collaborators.player))),
            user_name: Mutex::new(user_name),
            announcer: Announcer::new(collaborators.speech),
            player: collaborators.player,
            persistence,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            view_tx,
            _view_rx: view_rx,
        }
    }

    /// Run one user action and return the resulting view
    pub fn dispatch(&self, command: Command) -> Result<TimerView, String> {
        let action = command.name();
        debug!("Dispatching {}", action);

        let events = match command {
            Command::Start => self.with_machine(TimerMachine::start)?,
            Command::Pause => self.with_machine(TimerMachine::pause)?,
            Command::Reset => self.with_machine(TimerMachine::reset)?,
            Command::SetUserName(name) => {
                let mut user_name = self.user_name.lock()
                    .map_err(|e| format!("Failed to lock user name: {}", e))?;
                info!("User name set to {:?}", name);
                *user_name = name;
                Vec::new()
            }
            Command::SelectTrack(url) => {
                self.with_music(|music| music.select_track(&url))?;
                Vec::new()
            }
            Command::PlayMusic => {
                self.with_music(|music| music.play())?;
                Vec::new()
            }
            Command::PauseMusic => {
                self.with_music(|music| music.pause())?;
                Vec::new()
            }
            Command::StopMusic => {
                self.with_music(|music| music.stop())?;
                Vec::new()
            }
        };

        self.record_action(action);
        self.apply(events);
        self.timer_view()
    }

    /// Feed a clock tick from subscription `id`. Ticks from cancelled
    /// subscriptions are dropped.
    pub fn clock_tick(&self, id: u64) -> Result<(), String> {
        let events = {
            let mut machine = self.machine.lock()
                .map_err(|e| format!("Failed to lock timer: {}", e))?;

            if machine.subscription_id() != Some(id) {
                debug!("Dropping stale tick from subscription {}", id);
                return Ok(());
            }
            machine.tick()
        };

        self.apply(events);
        Ok(())
    }

    /// Write the current timer state to the store
    pub fn save_state(&self) -> Result<(), String> {
        let state = self.get_timer_state()?;
        self.persistence.save(&state);
        Ok(())
    }

    /// Get current timer state
    pub fn get_timer_state(&self) -> Result<TimerState, String> {
        self.machine.lock()
            .map(|machine| machine.state())
            .map_err(|e| format!("Failed to lock timer: {}", e))
    }

    pub fn timer_view(&self) -> Result<TimerView, String> {
        self.get_timer_state().map(|state| TimerView::from(&state))
    }

    pub fn user_name(&self) -> Result<String, String> {
        self.user_name.lock()
            .map(|name| name.clone())
            .map_err(|e| format!("Failed to lock user name: {}", e))
    }

    pub fn selected_track(&self) -> Result<Option<String>, String> {
        self.music.lock()
            .map(|music| music.selected().map(str::to_string))
            .map_err(|e| format!("Failed to lock music controller: {}", e))
    }

    /// Receiver that observes every re-render
    pub fn subscribe_view(&self) -> watch::Receiver<TimerView> {
        self.view_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    fn with_machine<F>(&self, transition: F) -> Result<Vec<TimerEvent>, String>
    where
        F: FnOnce(&mut TimerMachine) -> Vec<TimerEvent>,
    {
        let mut machine = self.machine.lock()
            .map_err(|e| format!("Failed to lock timer: {}", e))?;
        Ok(transition(&mut *machine))
    }

    fn with_music<F>(&self, action: F) -> Result<(), String>
    where
        F: FnOnce(&mut MusicController),
    {
        let mut music = self.music.lock()
            .map_err(|e| format!("Failed to lock music controller: {}", e))?;
        action(&mut *music);
        Ok(())
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Carry out the side effects of a transition. Called without holding the
    /// timer lock.
    fn apply(&self, events: Vec<TimerEvent>) {
        for event in events {
            match event {
                TimerEvent::Render => self.render(),
                TimerEvent::Alarm => self.player.play_alarm(),
                TimerEvent::Announce(announcement) => match self.user_name() {
                    Ok(user_name) => self.announcer.announce(announcement, &user_name),
                    Err(e) => warn!("Skipping announcement: {}", e),
                },
            }
        }
    }

    /// Publish the current view. The send happens under the timer lock so
    /// the channel always ends on the newest state.
    fn render(&self) {
        let machine = match self.machine.lock() {
            Ok(machine) => machine,
            Err(e) => {
                warn!("Failed to render timer: {}", e);
                return;
            }
        };

        let view = TimerView::from(&machine.state());
        debug!("Render {} ({:.1}%)", view.time, view.progress);
        if let Err(e) = self.view_tx.send(view) {
            warn!("Failed to send timer update: {}", e);
        }
    }
}
