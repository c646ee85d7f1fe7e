//! Work/break countdown state machine

use std::{sync::Arc, time::Duration};
use tracing::{debug, info};

use super::clock::{Clock, TickHandle};
use crate::{
    services::announcer::Announcement,
    state::{Mode, TimerState},
};

/// Period between two countdown ticks
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Side effects requested by a transition, applied by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// The displayed time, progress or mode changed
    Render,
    /// The countdown expired
    Alarm,
    /// Something should be spoken to the user
    Announce(Announcement),
}

/// Owns the timer state and at most one tick subscription.
///
/// `state.is_running` mirrors `subscription.is_some()` at every point
/// between two method calls.
pub struct TimerMachine {
    state: TimerState,
    clock: Arc<dyn Clock>,
    subscription: Option<TickHandle>,
}

impl TimerMachine {
    /// Seed the machine from a restored or default state. A restored countdown
    /// never resumes by itself.
    pub fn new(state: TimerState, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: TimerState {
                is_running: false,
                ..state
            },
            clock,
            subscription: None,
        }
    }

    /// Current state snapshot
    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.subscription.is_some()
    }

    /// Id of the live tick subscription, if any
    pub fn subscription_id(&self) -> Option<u64> {
        self.subscription.as_ref().map(TickHandle::id)
    }

    /// Start counting down. No-op while already running.
    pub fn start(&mut self) -> Vec<TimerEvent> {
        if self.subscription.is_some() {
            debug!("Start ignored, timer already running");
            return Vec::new();
        }

        self.subscription = Some(self.clock.schedule(TICK_PERIOD));
        self.state.is_running = true;
        info!(
            "Timer started in {} mode with {}s left",
            self.state.mode.as_str(),
            self.state.time_left
        );

        vec![TimerEvent::Render, TimerEvent::Announce(Announcement::Start)]
    }

    /// Advance the countdown by one second. No-op while idle.
    pub fn tick(&mut self) -> Vec<TimerEvent> {
        if self.subscription.is_none() {
            return Vec::new();
        }

        let mut events = Vec::new();
        if self.state.time_left > 0 {
            self.state.time_left -= 1;
            events.push(TimerEvent::Render);
        }

        if self.state.time_left == 0 {
            info!("{} phase finished", self.state.mode.as_str());
            self.stop_clock();
            events.push(TimerEvent::Alarm);
            events.extend(self.switch_mode());
        }

        events
    }

    /// Stop counting down, keeping time and mode. No-op while idle.
    pub fn pause(&mut self) -> Vec<TimerEvent> {
        if self.stop_clock() {
            info!("Timer paused with {}s left", self.state.time_left);
            vec![TimerEvent::Render]
        } else {
            Vec::new()
        }
    }

    /// Stop counting down and refill the current mode's duration
    pub fn reset(&mut self) -> Vec<TimerEvent> {
        self.stop_clock();
        self.state.time_left = self.state.mode.duration();
        info!("Timer reset to {}s in {} mode", self.state.time_left, self.state.mode.as_str());
        vec![TimerEvent::Render]
    }

    /// Flip between work and break, refilling the new mode's duration
    pub fn switch_mode(&mut self) -> Vec<TimerEvent> {
        self.stop_clock();
        self.state = TimerState::idle(self.state.mode.next());
        info!("Switched to {} mode", self.state.mode.as_str());

        let announcement = match self.state.mode {
            Mode::Work => Announcement::TimeForWork,
            Mode::Break => Announcement::TimeForBreak,
        };
        vec![TimerEvent::Render, TimerEvent::Announce(announcement)]
    }

    /// Cancel the live subscription. Returns whether one existed.
    fn stop_clock(&mut self) -> bool {
        self.state.is_running = false;
        match self.subscription.take() {
            Some(handle) => {
                self.clock.cancel(handle);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeClock {
        next: Mutex<u64>,
        active: Mutex<Vec<u64>>,
    }

    impl FakeClock {
        fn active(&self) -> Vec<u64> {
            self.active.lock().unwrap().clone()
        }
    }

    impl Clock for FakeClock {
        fn schedule(&self, _period: Duration) -> TickHandle {
            let mut next = self.next.lock().unwrap();
            *next += 1;
            self.active.lock().unwrap().push(*next);
            TickHandle::new(*next)
        }

        fn cancel(&self, handle: TickHandle) {
            self.active.lock().unwrap().retain(|id| *id != handle.id());
        }
    }

    fn machine_with(state: TimerState) -> (TimerMachine, Arc<FakeClock>) {
        let clock = Arc::new(FakeClock::default());
        (TimerMachine::new(state, clock.clone()), clock)
    }

    #[test]
    fn start_announces_and_subscribes_once() {
        let (mut machine, clock) = machine_with(TimerState::new());

        let events = machine.start();
        assert_eq!(
            events,
            vec![TimerEvent::Render, TimerEvent::Announce(Announcement::Start)]
        );
        assert!(machine.state().is_running);

        assert!(machine.start().is_empty());
        assert_eq!(clock.active().len(), 1);
    }

    #[test]
    fn tick_while_idle_changes_nothing() {
        let (mut machine, _clock) = machine_with(TimerState::new());
        assert!(machine.tick().is_empty());
        assert_eq!(machine.state(), TimerState::new());
    }

    #[test]
    fn tick_counts_down_and_renders() {
        let (mut machine, _clock) = machine_with(TimerState::new());
        machine.start();
        assert_eq!(machine.tick(), vec![TimerEvent::Render]);
        assert_eq!(machine.state().time_left, 1499);
    }

    #[test]
    fn last_tick_switches_to_break() {
        let (mut machine, clock) = machine_with(TimerState {
            time_left: 1,
            mode: Mode::Work,
            is_running: false,
        });
        machine.start();

        let events = machine.tick();
        assert_eq!(
            events,
            vec![
                TimerEvent::Render,
                TimerEvent::Alarm,
                TimerEvent::Render,
                TimerEvent::Announce(Announcement::TimeForBreak),
            ]
        );
        assert_eq!(machine.state(), TimerState::idle(Mode::Break));
        assert!(clock.active().is_empty());
    }

    #[test]
    fn full_break_countdown_returns_to_work() {
        let (mut machine, _clock) = machine_with(TimerState::idle(Mode::Break));
        machine.start();

        for _ in 0..299 {
            machine.tick();
        }
        assert_eq!(machine.state().time_left, 1);
        assert_eq!(machine.state().mode, Mode::Break);

        let events = machine.tick();
        assert!(events.contains(&TimerEvent::Announce(Announcement::TimeForWork)));
        assert_eq!(machine.state(), TimerState::idle(Mode::Work));
    }

    #[test]
    fn zero_left_expires_on_next_tick() {
        let (mut machine, _clock) = machine_with(TimerState {
            time_left: 0,
            mode: Mode::Work,
            is_running: false,
        });
        machine.start();
        let events = machine.tick();
        assert_eq!(events[0], TimerEvent::Alarm);
        assert_eq!(machine.state(), TimerState::idle(Mode::Break));
    }

    #[test]
    fn pause_keeps_time_and_mode() {
        let (mut machine, clock) = machine_with(TimerState::new());
        machine.start();
        machine.tick();
        machine.tick();

        assert_eq!(machine.pause(), vec![TimerEvent::Render]);
        assert_eq!(
            machine.state(),
            TimerState {
                time_left: 1498,
                mode: Mode::Work,
                is_running: false,
            }
        );
        assert!(clock.active().is_empty());

        // pausing again is harmless
        assert!(machine.pause().is_empty());
    }

    #[test]
    fn reset_refills_current_mode() {
        let (mut machine, clock) = machine_with(TimerState {
            time_left: 42,
            mode: Mode::Work,
            is_running: false,
        });
        machine.start();

        assert_eq!(machine.reset(), vec![TimerEvent::Render]);
        assert_eq!(machine.state(), TimerState::idle(Mode::Work));
        assert!(clock.active().is_empty());

        let (mut machine, _clock) = machine_with(TimerState {
            time_left: 10,
            mode: Mode::Break,
            is_running: false,
        });
        machine.reset();
        assert_eq!(machine.state(), TimerState::idle(Mode::Break));
    }

    #[test]
    fn restart_after_pause_replaces_subscription() {
        let (mut machine, clock) = machine_with(TimerState::new());
        machine.start();
        let first = machine.subscription_id();
        machine.pause();
        machine.start();

        assert_ne!(machine.subscription_id(), first);
        assert_eq!(clock.active().len(), 1);
    }

    #[test]
    fn restored_state_never_resumes() {
        let (machine, clock) = machine_with(TimerState {
            time_left: 900,
            mode: Mode::Break,
            is_running: true,
        });
        assert!(!machine.state().is_running);
        assert!(clock.active().is_empty());
    }
}
