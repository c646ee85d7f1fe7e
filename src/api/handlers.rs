//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tracing::{error, info, warn};

use crate::{
    services::{display_name, find_track, MusicTrack, TRACKS},
    state::{AppState, Command},
};
use super::responses::{ApiResponse, HealthResponse, SelectTrackRequest, StatusResponse, UserRequest};

/// Dispatch `command` and wrap the resulting view
fn run_command(
    state: &AppState,
    command: Command,
    message: &str,
) -> Result<Json<ApiResponse>, StatusCode> {
    let action = command.name();
    match state.dispatch(command) {
        Ok(timer) => {
            info!("{} endpoint called", action);
            Ok(Json(ApiResponse::from_timer(message.to_string(), timer)))
        }
        Err(e) => {
            error!("Failed to run {}: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /start - Start the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    run_command(&state, Command::Start, "Timer started")
}

/// Handle POST /pause - Pause the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    run_command(&state, Command::Pause, "Timer paused")
}

/// Handle POST /reset - Refill the current mode
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    run_command(&state, Command::Reset, "Timer reset")
}

/// Handle POST /user - Set the name used in announcements
pub async fn user_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UserRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    run_command(&state, Command::SetUserName(request.name), "User name updated")
}

/// Handle GET /tracks - List the music catalog
pub async fn tracks_handler() -> Json<&'static [MusicTrack]> {
    Json(TRACKS)
}

/// Handle POST /music/select - Load a catalog track
pub async fn select_track_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SelectTrackRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let Some(track) = find_track(&request.url) else {
        warn!("Unknown track requested: {}", request.url);
        return Err(StatusCode::NOT_FOUND);
    };

    run_command(
        &state,
        Command::SelectTrack(track.url.to_string()),
        &format!("Selected {}", track.name),
    )
}

/// Handle POST /music/play - Play the selected track
pub async fn music_play_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    run_command(&state, Command::PlayMusic, "Music playing")
}

/// Handle POST /music/pause - Pause the music
pub async fn music_pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    run_command(&state, Command::PauseMusic, "Music paused")
}

/// Handle POST /music/stop - Pause and rewind the music
pub async fn music_stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    run_command(&state, Command::StopMusic, "Music stopped")
}

/// Handle GET /status - Return timer, music and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = state.timer_view().map_err(|e| {
        error!("Failed to get timer state: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let user_name = state.user_name().map_err(|e| {
        error!("Failed to get user name: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let selected_track = state.selected_track().map_err(|e| {
        error!("Failed to get selected track: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        user_name: display_name(&user_name).to_string(),
        selected_track,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /events - Stream every re-render as server-sent events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let views = state.subscribe_view();

    let stream = stream::unfold(views, |mut views| async move {
        views.changed().await.ok()?;
        let view = views.borrow_and_update().clone();
        let event = match Event::default().event("render").json_data(&view) {
            Ok(event) => event,
            Err(e) => {
                warn!("Failed to encode render event: {}", e);
                Event::default().event("render").data("{}")
            }
        };
        Some((Ok::<_, Infallible>(event), views))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
