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
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

use crate::{
    state::AppState,
    tasks::TimerCommand,
};
use super::responses::{
    ApiResponse, DurationRequest, HealthResponse, ModeRequest, PresetsResponse, StatusResponse,
};

/// Send a command to the timer task and describe the outcome
async fn run_command(
    state: &AppState,
    command: TimerCommand,
    action: &str,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.timer.send(command).await {
        Ok(outcome) if outcome.accepted => {
            state.track_action(action);
            info!("{} endpoint called - accepted", action);
            Ok(Json(ApiResponse::accepted(
                format!("Timer {} applied", action),
                outcome.snapshot,
            )))
        }
        Ok(outcome) => {
            info!("{} endpoint called - rejected in {:?} phase", action, outcome.snapshot.phase);
            Ok(Json(ApiResponse::rejected(
                format!("Timer {} not allowed right now", action),
                outcome.snapshot,
            )))
        }
        Err(e) => {
            error!("Failed to apply {}: {}", action, e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Handle POST /timer/start
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    run_command(&state, TimerCommand::Start, "start").await
}

/// Handle POST /timer/pause
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    run_command(&state, TimerCommand::Pause, "pause").await
}

/// Handle POST /timer/reset
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    run_command(&state, TimerCommand::Reset, "reset").await
}

/// Handle POST /timer/reset-all - Rewind the whole Pomodoro session
pub async fn reset_all_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    run_command(&state, TimerCommand::ResetAll, "reset-all").await
}

/// Handle POST /timer/duration - Select a preset for the current mode
pub async fn duration_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DurationRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    run_command(&state, TimerCommand::SetDuration(request.seconds), "duration").await
}

/// Handle POST /timer/mode
pub async fn mode_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ModeRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    run_command(&state, TimerCommand::SetMode(request.mode), "mode").await
}

/// Handle GET /timer - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let options = state.timer.options();
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer: state.timer.snapshot(),
        profile: options.profile,
        auto_continue: options.auto_continue,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /timer/presets
pub async fn presets_handler(State(state): State<Arc<AppState>>) -> Json<PresetsResponse> {
    Json(PresetsResponse::for_profile(state.timer.options().profile))
}

/// Handle GET /events - Stream timer events as server-sent events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let events = state.timer.subscribe();

    let stream = stream::unfold(events, |mut events| async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    let sse = match Event::default().event(event.name()).json_data(&event) {
                        Ok(sse) => sse,
                        Err(e) => {
                            warn!("Failed to encode timer event: {}", e);
                            continue;
                        }
                    };
                    return Some((Ok::<_, Infallible>(sse), events));
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event stream lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
