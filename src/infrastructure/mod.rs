// Infrastructure layer - External adapters and configuration
pub mod config;
pub mod event_log;
pub mod http_response;
pub mod simulated_device;
pub mod websocket_hub;
