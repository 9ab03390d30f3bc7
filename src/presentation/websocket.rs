// WebSocket session handler - the push channel entry point
use crate::infrastructure::websocket_hub::{receiver_stream, ViewerGuard};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Register a viewer and announce it. The subscription is taken before the
/// on-connect broadcast so the joining viewer receives that snapshot too.
async fn open_session(state: &AppState) -> (ViewerGuard, broadcast::Receiver<String>) {
    let (guard, rx) = state.hub.join();
    state.engine.viewer_connected(guard.id()).await;
    (guard, rx)
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let (guard, rx) = open_session(&state).await;
    let viewer = guard.id();

    let send_task = tokio::spawn(async move {
        let updates = receiver_stream(rx);
        futures::pin_mut!(updates);
        while let Some(payload) = updates.next().await {
            if sender.send(Message::Text(payload)).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(message)) = receiver.next().await {
        match message {
            Message::Text(text) => state.engine.handle_push_message(viewer, &text).await,
            Message::Close(_) => break,
            _ => {}
        }
    }

    send_task.abort();
    drop(guard);
    state.engine.viewer_disconnected(viewer);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::push_channel::PushChannel;
    use crate::application::sync_engine::SyncEngine;
    use crate::application::widget_registry::WidgetRegistry;
    use crate::infrastructure::websocket_hub::WebSocketHub;
    use serde_json::Value;

    fn state_with_switch() -> AppState {
        let hub = WebSocketHub::new(8);
        let mut registry = WidgetRegistry::new();
        registry.add_switch("Relay", "", |_| {}, "blue");
        let engine = Arc::new(SyncEngine::new(registry, hub.clone()));
        AppState { engine, hub }
    }

    #[tokio::test]
    async fn test_joining_viewer_receives_connect_snapshot() {
        let state = state_with_switch();

        let (guard, mut rx) = open_session(&state).await;

        let frame: Value = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
        assert_eq!(frame["connectedClients"], 1);
        assert_eq!(frame["controls"][0]["id"], "switch_0");
        assert!(frame["controls"][0].get("title").is_none());
        assert!(rx.try_recv().is_err());

        drop(guard);
        assert_eq!(state.hub.connected_clients(), 0);
    }

    #[tokio::test]
    async fn test_existing_viewer_sees_newcomer_snapshot() {
        let state = state_with_switch();
        let (_first, mut first_rx) = open_session(&state).await;
        first_rx.try_recv().unwrap();

        let (_second, mut second_rx) = open_session(&state).await;

        let seen_by_first: Value = serde_json::from_str(&first_rx.try_recv().unwrap()).unwrap();
        let seen_by_second: Value = serde_json::from_str(&second_rx.try_recv().unwrap()).unwrap();
        assert_eq!(seen_by_first["connectedClients"], 2);
        assert_eq!(seen_by_second, seen_by_first);
    }
}
