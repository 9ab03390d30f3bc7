// Structured events raised by the sync engine
use crate::application::control_dispatcher::ControlChange;
use crate::application::push_channel::BroadcastOutcome;
use crate::domain::error::DashboardError;

pub type ViewerId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionSource {
    Http,
    PushChannel(ViewerId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    ViewerConnected { viewer: ViewerId, connected: usize },
    ViewerDisconnected { viewer: ViewerId, connected: usize },
    ControlChanged { source: ActionSource, change: ControlChange },
    ActionIgnored { source: ActionSource, error: DashboardError },
    /// Every inbound push-channel text, after action handling.
    CustomMessage { viewer: ViewerId, payload: String },
    TickCompleted { timestamp: u64, samples: usize, outcome: BroadcastOutcome },
}

pub type EventListener = Box<dyn Fn(&DashboardEvent) + Send + Sync>;
