// HTTP request handlers
use crate::application::events::ActionSource;
use crate::domain::action::ControlAction;
use crate::infrastructure::http_response::{error_response, json_response, success_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Full snapshot of every card and control
pub async fn get_data(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.engine.full_snapshot().await;
    match json_response(StatusCode::OK, &snapshot) {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Apply a `{id, action, value?}` command. Whether the dispatch changed
/// anything is not reported; only an absent or unparsable body is an error.
pub async fn post_control(State(state): State<Arc<AppState>>, body: String) -> impl IntoResponse {
    let response = if body.trim().is_empty() {
        error_response(StatusCode::BAD_REQUEST, "No data received")
    } else {
        match ControlAction::parse(&body) {
            Ok(action) => {
                // Ignored actions still answer success; the engine logs them.
                let _ = state.engine.apply_action(&action, ActionSource::Http).await;
                success_response()
            }
            Err(e) => {
                tracing::warn!(category = "control", "Rejected control request: {}", e);
                error_response(StatusCode::BAD_REQUEST, &e.to_string())
            }
        }
    };

    match response {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "File Not Found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::push_channel::PushChannel;
    use crate::application::sync_engine::SyncEngine;
    use crate::application::widget_registry::WidgetRegistry;
    use crate::infrastructure::websocket_hub::WebSocketHub;
    use axum::response::Response;
    use serde_json::Value;

    fn state_with_switch() -> Arc<AppState> {
        let hub = WebSocketHub::new(8);
        let mut registry = WidgetRegistry::new();
        registry.add_switch("Relay", "Output relay", |_| {}, "blue");
        let engine = Arc::new(SyncEngine::new(registry, hub.clone()));
        Arc::new(AppState { engine, hub })
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_post_toggle_then_snapshot() {
        let state = state_with_switch();

        let response = post_control(
            State(state.clone()),
            r#"{"id":"switch_0","action":"toggle"}"#.to_string(),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!({"status": "success"}));

        let data = body_json(get_data(State(state)).await.into_response()).await;
        assert_eq!(data["controls"][0]["id"], "switch_0");
        assert_eq!(data["controls"][0]["state"], true);
        assert_eq!(data["controls"][0]["title"], "Relay");
        assert_eq!(data["controls"][0]["type"], 0);
    }

    #[tokio::test]
    async fn test_post_without_body_is_bad_request() {
        let state = state_with_switch();
        let response = post_control(State(state), String::new()).await.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "No data received");
    }

    #[tokio::test]
    async fn test_post_malformed_body_is_bad_request() {
        let state = state_with_switch();
        let response = post_control(State(state.clone()), "{oops".to_string())
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(!state.engine.with_registry(|r| r.get_control_state("switch_0")).await);
    }

    #[tokio::test]
    async fn test_post_no_op_still_succeeds() {
        let state = state_with_switch();
        let (_guard, mut rx) = state.hub.join();

        let response = post_control(
            State(state.clone()),
            r#"{"id":"switch_0","action":"slide","value":3}"#.to_string(),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_post_broadcasts_to_viewers() {
        let state = state_with_switch();
        let (_guard, mut rx) = state.hub.join();

        post_control(
            State(state.clone()),
            r#"{"id":"switch_0","action":"toggle"}"#.to_string(),
        )
        .await
        .into_response();

        let frame: Value = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
        assert_eq!(frame["controls"][0]["state"], true);
        assert_eq!(frame["connectedClients"], 1);
        assert_eq!(state.hub.connected_clients(), 1);
    }

    #[tokio::test]
    async fn test_not_found() {
        let response = not_found().await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
