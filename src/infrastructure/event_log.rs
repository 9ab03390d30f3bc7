// Diagnostic logger - Formats engine events and status reports with tracing
use crate::application::events::{ActionSource, DashboardEvent, EventListener};
use crate::application::push_channel::BroadcastOutcome;
use crate::application::status_report::{ControlStateLine, SystemStatus};
use crate::domain::action::ActionVerb;
use crate::domain::error::DashboardError;

pub fn tracing_listener() -> EventListener {
    Box::new(log_event)
}

pub fn log_event(event: &DashboardEvent) {
    match event {
        DashboardEvent::ViewerConnected { viewer, connected } => {
            tracing::info!(category = "websocket", viewer, connected, "Client #{} connected", viewer);
        }
        DashboardEvent::ViewerDisconnected { viewer, connected } => {
            tracing::info!(category = "websocket", viewer, connected, "Client #{} disconnected", viewer);
        }
        DashboardEvent::ControlChanged { source, change } => {
            let detail = match change.verb {
                ActionVerb::Toggle => format!("toggled to {}", if change.state { "ON" } else { "OFF" }),
                ActionVerb::Click => "clicked".to_string(),
                ActionVerb::Slide => format!("set to {}", change.value),
            };
            tracing::info!(
                category = "control",
                id = %change.id,
                source = source_label(source),
                "Control '{}' {}",
                change.title,
                detail
            );
            if change.out_of_range {
                tracing::warn!(category = "control", id = %change.id, value = change.value, "Slider value outside its range");
            }
        }
        DashboardEvent::ActionIgnored { source, error } => match error {
            DashboardError::MalformedMessage(reason) => {
                tracing::warn!(category = "control", source = source_label(source), "Dropped message: {}", reason);
            }
            other => {
                tracing::debug!(category = "control", source = source_label(source), "Action ignored: {}", other);
            }
        },
        DashboardEvent::CustomMessage { viewer, payload } => {
            tracing::debug!(category = "websocket", viewer, "Message from client #{}: {}", viewer, payload);
        }
        DashboardEvent::TickCompleted { timestamp, samples, outcome } => {
            let delivered = match outcome {
                BroadcastOutcome::Delivered(n) => *n,
                BroadcastOutcome::NoViewers => 0,
            };
            tracing::trace!(category = "sync", timestamp, samples, delivered, "Tick completed");
        }
    }
}

fn source_label(source: &ActionSource) -> &'static str {
    match source {
        ActionSource::Http => "http",
        ActionSource::PushChannel(_) => "websocket",
    }
}

pub fn log_system_status(status: &SystemStatus) {
    tracing::info!(
        category = "status",
        title = %status.title,
        cards = status.cards,
        controls = status.controls,
        update_interval_ms = status.update_interval.as_millis() as u64,
        connected_clients = status.connected_clients,
        "Dashboard system status"
    );
}

pub fn log_control_states(lines: &[ControlStateLine]) {
    for line in lines {
        tracing::info!(category = "state", "{}", line);
    }
}
