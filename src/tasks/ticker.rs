//! Tick driver background task

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::state::AppState;

/// Background task that feeds clock ticks into the timer state machine
pub async fn tick_task(state: Arc<AppState>, mut ticks: mpsc::UnboundedReceiver<u64>) {
    info!("Starting tick task");

    while let Some(id) = ticks.recv().await {
        if let Err(e) = state.clock_tick(id) {
            error!("Failed to apply tick: {}", e);
        }
    }

    warn!("Tick channel closed, tick task stopping");
}
