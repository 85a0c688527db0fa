use std::sync::Arc;

use anyhow::Context;
use chatbot_widget::{
    config::{DEFAULT_CONFIG_PATH, ENV_CONFIG_PATH, WidgetConfig},
    routes,
    state::AppState,
};
use tower_http::cors::CorsLayer;
use tracing::info;

const DEFAULT_CONTROL_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config_path =
        std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = WidgetConfig::load(&config_path)
        .with_context(|| format!("loading widget config from {config_path}"))?;

    let mut state = AppState::new(&config).context("building chat widget")?;
    if let Ok(key) = std::env::var("CHATBOT_CONTROL_KEY") {
        state = state.with_control_key(key);
    }

    let app = routes::create_router(Arc::new(state)).layer(CorsLayer::very_permissive());

    let addr =
        std::env::var("CHATBOT_CONTROL_ADDR").unwrap_or_else(|_| DEFAULT_CONTROL_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding control server to {addr}"))?;

    info!("chat widget control surface at http://{addr}/widget");
    axum::serve(listener, app).await?;
    Ok(())
}
