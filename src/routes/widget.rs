use axum::{Json, extract::State, http::StatusCode};

use crate::{
    error::AppError,
    message::{LogEntry, SendRequest},
    services::metrics_manager::MetricsData,
    state::SharedState,
};

fn live(state: &SharedState) -> Result<(), AppError> {
    if state.widget.is_destroyed() {
        Err(AppError::Destroyed)
    } else {
        Ok(())
    }
}

pub async fn open_handler(State(state): State<SharedState>) -> Result<StatusCode, AppError> {
    live(&state)?;
    state.widget.open().await;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn close_handler(State(state): State<SharedState>) -> Result<StatusCode, AppError> {
    live(&state)?;
    state.widget.close().await;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_handler(State(state): State<SharedState>) -> Result<StatusCode, AppError> {
    live(&state)?;
    state.widget.toggle().await;
    Ok(StatusCode::NO_CONTENT)
}

// Blank messages are ignored by the widget, so they also answer 204.
pub async fn send_handler(
    State(state): State<SharedState>,
    Json(payload): Json<SendRequest>,
) -> Result<StatusCode, AppError> {
    live(&state)?;
    state.widget.send_message(&payload.message).await;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn messages_handler(State(state): State<SharedState>) -> Json<Vec<LogEntry>> {
    Json(state.widget.messages().await)
}

pub async fn metrics_handler(State(state): State<SharedState>) -> Json<MetricsData> {
    Json(state.widget.metrics().snapshot().await)
}
