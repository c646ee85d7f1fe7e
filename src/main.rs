//! Pomodoro Radio - A Pomodoro timer daemon with spoken transitions and music
//!
//! This is the main entry point for the pomodoro-radio application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use pomodoro_radio::{
    api::create_router,
    config::Config,
    persistence::{JsonFileStore, KeyValueStore, MemoryStore},
    services::{CommandPlayer, CommandSpeech},
    state::{AppState, Collaborators},
    tasks::tick_task,
    timer::TokioClock,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("pomodoro_radio={},tower_http=info", config.log_level()))
        .init();

    info!("Starting pomodoro-radio v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, state_file={}, music_dir={}",
          config.host, config.port, config.state_file.display(), config.music_dir.display());

    let store: Box<dyn KeyValueStore> = if config.ephemeral {
        info!("Ephemeral mode, timer state will not be saved");
        Box::new(MemoryStore::new())
    } else {
        Box::new(JsonFileStore::new(&config.state_file))
    };

    let (clock, ticks) = TokioClock::new();
    let speech = CommandSpeech::detect(&config.speech, &config.voice).await;
    let player = CommandPlayer::new(&config.player, &config.music_dir, &config.alarm);

    // Create application state, restoring any saved timer
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.user.clone(),
        Collaborators {
            clock: Arc::new(clock),
            speech: Arc::new(speech),
            player: Arc::new(player),
            store,
        },
    ));

    // Start the tick driver background task
    let tick_state = Arc::clone(&state);
    tokio::spawn(async move {
        tick_task(tick_state, ticks).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start         - Start the countdown");
    info!("  POST /pause         - Pause the countdown");
    info!("  POST /reset         - Reset the current phase");
    info!("  POST /user          - Set the announced user name");
    info!("  GET  /tracks        - List music tracks");
    info!("  POST /music/select  - Select a track");
    info!("  POST /music/play    - Play music");
    info!("  POST /music/pause   - Pause music");
    info!("  POST /music/stop    - Stop music");
    info!("  GET  /status        - Current timer and music status");
    info!("  GET  /events        - Live timer updates (SSE)");
    info!("  GET  /health        - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    if let Err(e) = state.save_state() {
        tracing::error!("Failed to save timer state: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
