// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use crate::application::sync_engine::SyncEngine;
use crate::application::widget_registry::WidgetRegistry;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::event_log::{log_control_states, log_system_status, tracing_listener};
use crate::infrastructure::simulated_device::SimulatedDevice;
use crate::infrastructure::websocket_hub::{WebSocketHub, DEFAULT_HUB_CAPACITY};
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{get_data, health_check, not_found, post_control};
use crate::presentation::websocket::ws_handler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Compose the widget registry (fixed from here on)
    let mut registry = WidgetRegistry::new().with_chart_max_points(config.dashboard.chart_max_points);
    registry.set_title(&config.dashboard.title, &config.dashboard.subtitle);
    let device = SimulatedDevice::new();
    device.install(&mut registry, config.dashboard.chart_max_points);

    // Create transport and engine (application layer)
    let hub = WebSocketHub::new(DEFAULT_HUB_CAPACITY);
    let engine = Arc::new(
        SyncEngine::new(registry, hub.clone())
            .with_update_interval(config.dashboard.update_interval())
            .with_listener(tracing_listener()),
    );

    log_system_status(&engine.system_status().await);
    log_control_states(&engine.control_states().await);

    tokio::spawn(engine.clone().run());

    // Create application state
    let state = Arc::new(AppState { engine, hub });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/api/data", get(get_data))
        .route("/api/control", post(post_control))
        .route("/ws", get(ws_handler))
        .fallback(not_found)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = config.server.socket_addr()?;
    tracing::info!("Starting device dashboard on {}", addr);
    tracing::info!("API endpoint: http://{}/api/data, WebSocket: ws://{}/ws", addr, addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
