// src/routes/mod.rs
pub mod widget;

use crate::state::SharedState;
use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use widget::{
    close_handler, messages_handler, metrics_handler, open_handler, send_handler, toggle_handler,
};

pub const CONTROL_KEY_HEADER: &str = "x-widget-key";

/// Host control surface for a single widget.
pub fn create_router(state: SharedState) -> Router {
    let widget_routes = Router::new()
        .route("/open", post(open_handler))
        .route("/close", post(close_handler))
        .route("/toggle", post(toggle_handler))
        .route("/send", post(send_handler))
        .route("/messages", get(messages_handler))
        .route("/metrics", get(metrics_handler))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/widget", widget_routes)
        .route("/health", get(|| async { "OK" }))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn auth_middleware(
    State(state): State<SharedState>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(key) = &state.control_key else {
        return Ok(next.run(req).await);
    };
    match req.headers().get(CONTROL_KEY_HEADER) {
        Some(val) if val == key.as_str() => Ok(next.run(req).await),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}
