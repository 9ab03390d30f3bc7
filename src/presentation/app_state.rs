// Application state for HTTP and WebSocket handlers
use crate::application::sync_engine::SyncEngine;
use crate::infrastructure::websocket_hub::WebSocketHub;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SyncEngine>,
    pub hub: Arc<WebSocketHub>,
}
