//! Saving and restoring the timer state record

use tracing::{debug, info, warn};

use super::store::KeyValueStore;
use crate::state::{TimerState, MAX_DURATION_SECS};

/// Key under which the timer record is stored
pub const STATE_KEY: &str = "pomodoroState";

/// Reads and writes the single timer record in a key-value store
pub struct StatePersistence {
    store: Box<dyn KeyValueStore>,
}

impl StatePersistence {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Overwrite the stored record. Failures are logged, never returned.
    pub fn save(&self, state: &TimerState) {
        let encoded = match serde_json::to_string(state) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!("Failed to encode timer state: {}", e);
                return;
            }
        };

        match self.store.set(STATE_KEY, &encoded) {
            Ok(()) => info!("Saved timer state: {}", encoded),
            Err(e) => warn!("Failed to save timer state: {}", e),
        }
    }

    /// Restore the stored record with `is_running` forced off.
    ///
    /// Returns `None` when nothing usable is stored.
    pub fn load(&self) -> Option<TimerState> {
        let raw = match self.store.get(STATE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No saved timer state");
                return None;
            }
            Err(e) => {
                warn!("Failed to read saved timer state: {}", e);
                return None;
            }
        };

        let state: TimerState = match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(e) => {
                warn!("Ignoring malformed timer state: {}", e);
                return None;
            }
        };

        if state.time_left > MAX_DURATION_SECS {
            warn!("Ignoring timer state with {}s left", state.time_left);
            return None;
        }

        info!(
            "Restored timer state: {}s left in {} mode",
            state.time_left,
            state.mode.as_str()
        );
        Some(TimerState {
            is_running: false,
            ..state
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{persistence::store::MemoryStore, state::Mode};
    use std::sync::Arc;

    fn persistence() -> (StatePersistence, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (StatePersistence::new(Box::new(store.clone())), store)
    }

    #[test]
    fn round_trip_forces_not_running() {
        let (persistence, _store) = persistence();
        persistence.save(&TimerState {
            time_left: 900,
            mode: Mode::Break,
            is_running: true,
        });

        assert_eq!(
            persistence.load(),
            Some(TimerState {
                time_left: 900,
                mode: Mode::Break,
                is_running: false,
            })
        );
    }

    #[test]
    fn save_writes_the_fixed_key() {
        let (persistence, store) = persistence();
        persistence.save(&TimerState::new());

        let raw = store.get("pomodoroState").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"timeLeft": 1500, "mode": "work", "isRunning": false})
        );
    }

    #[test]
    fn absent_record_loads_nothing() {
        let (persistence, _store) = persistence();
        assert_eq!(persistence.load(), None);
    }

    #[test]
    fn corrupt_records_load_nothing() {
        let (persistence, store) = persistence();
        for raw in [
            "{not json",
            r#"{"timeLeft": -3, "mode": "work", "isRunning": false}"#,
            r#"{"timeLeft": 60, "mode": "nap", "isRunning": false}"#,
            r#"{"timeLeft": 60}"#,
            r#"{"timeLeft": 1501, "mode": "work", "isRunning": false}"#,
        ] {
            store.set(STATE_KEY, raw).unwrap();
            assert_eq!(persistence.load(), None, "accepted {}", raw);
        }
    }
}
