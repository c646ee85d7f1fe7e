//! Cancelable periodic tick source

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
    time::Duration,
};
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{interval_at, Instant},
};
use tracing::{debug, warn};

/// Handle to one live tick subscription.
///
/// Not `Clone`: whoever owns the handle is the only one able to cancel it.
#[derive(Debug, PartialEq, Eq)]
pub struct TickHandle {
    id: u64,
}

impl TickHandle {
    pub fn new(id: u64) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Periodic scheduler used by the timer state machine
pub trait Clock: Send + Sync {
    /// Begin delivering ticks every `period` until the handle is cancelled
    fn schedule(&self, period: Duration) -> TickHandle;

    /// Stop delivering ticks for `handle`
    fn cancel(&self, handle: TickHandle);
}

/// Clock backed by tokio interval tasks.
///
/// Each tick is sent as the id of the subscription that produced it, so the
/// receiver can drop ticks that raced with a cancellation.
#[derive(Debug)]
pub struct TokioClock {
    next_id: AtomicU64,
    tasks: Mutex<HashMap<u64, JoinHandle<()>>>,
    tick_tx: mpsc::UnboundedSender<u64>,
}

impl TokioClock {
    /// Create a clock together with the receiving end of its tick channel
    pub fn new() -> (Self, mpsc::UnboundedReceiver<u64>) {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        let clock = Self {
            next_id: AtomicU64::new(1),
            tasks: Mutex::new(HashMap::new()),
            tick_tx,
        };
        (clock, tick_rx)
    }
}

impl Clock for TokioClock {
    fn schedule(&self, period: Duration) -> TickHandle {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let tx = self.tick_tx.clone();

        let task = tokio::spawn(async move {
            // First tick lands one full period after scheduling
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                if tx.send(id).is_err() {
                    break;
                }
            }
        });

        match self.tasks.lock() {
            Ok(mut tasks) => {
                tasks.insert(id, task);
            }
            Err(e) => {
                warn!("Failed to register tick task {}: {}", id, e);
                task.abort();
            }
        }

        debug!("Scheduled tick subscription {}", id);
        TickHandle::new(id)
    }

    fn cancel(&self, handle: TickHandle) {
        let task = match self.tasks.lock() {
            Ok(mut tasks) => tasks.remove(&handle.id()),
            Err(e) => {
                warn!("Failed to lock tick tasks: {}", e);
                None
            }
        };

        if let Some(task) = task {
            task.abort();
            debug!("Cancelled tick subscription {}", handle.id());
        }
    }
}
