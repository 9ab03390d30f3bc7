// HTTP response utilities for JSON payloads
use axum::{
    body::Body,
    http::{header, HeaderValue, Response, StatusCode},
};
use serde::Serialize;
use serde_json::json;

/// Serialize `data` as a JSON response with the given status.
pub fn json_response<T: Serialize>(status: StatusCode, data: &T) -> Result<Response<Body>, StatusCode> {
    let body = serde_json::to_vec(data).map_err(|e| {
        tracing::error!("JSON serialization error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .header(header::CONTENT_LENGTH, HeaderValue::from(body.len()))
        .body(Body::from(body))
        .map_err(|e| {
            tracing::error!("Response build error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

/// `{"status":"success"}` with 200.
pub fn success_response() -> Result<Response<Body>, StatusCode> {
    json_response(StatusCode::OK, &json!({ "status": "success" }))
}

/// `{"error": message}` with the given status.
pub fn error_response(status: StatusCode, message: &str) -> Result<Response<Body>, StatusCode> {
    json_response(status, &json!({ "error": message }))
}
