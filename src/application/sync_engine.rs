// Sync engine - Periodic tick, on-change and on-connect broadcasts
use crate::application::control_dispatcher::{ControlChange, ControlDispatcher};
use crate::application::events::{ActionSource, DashboardEvent, EventListener, ViewerId};
use crate::application::push_channel::{BroadcastOutcome, PushChannel};
use crate::application::status_report::{ControlStateLine, SystemStatus};
use crate::application::widget_registry::WidgetRegistry;
use crate::domain::action::ControlAction;
use crate::domain::error::DashboardError;
use crate::domain::snapshot::{CompactSnapshot, FullSnapshot};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_millis(1000);
pub const MIN_UPDATE_INTERVAL: Duration = Duration::from_millis(1);

/// Owns the registry behind one exclusive section. The tick, HTTP dispatch
/// and push-channel dispatch all serialize on it; callbacks run inline while
/// it is held and the lock is released before broadcasting.
pub struct SyncEngine {
    registry: Mutex<WidgetRegistry>,
    channel: Arc<dyn PushChannel>,
    dispatcher: ControlDispatcher,
    started: Instant,
    update_interval_ms: AtomicU64,
    listeners: Vec<EventListener>,
}

impl SyncEngine {
    pub fn new(registry: WidgetRegistry, channel: Arc<dyn PushChannel>) -> Self {
        Self {
            registry: Mutex::new(registry),
            channel,
            dispatcher: ControlDispatcher::new(),
            started: Instant::now(),
            update_interval_ms: AtomicU64::new(DEFAULT_UPDATE_INTERVAL.as_millis() as u64),
            listeners: Vec::new(),
        }
    }

    pub fn with_listener(mut self, listener: EventListener) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn with_update_interval(self, interval: Duration) -> Self {
        self.set_update_interval(interval);
        self
    }

    /// Takes effect from the next tick. Anything below
    /// `MIN_UPDATE_INTERVAL` (including zero) is raised to it.
    pub fn set_update_interval(&self, interval: Duration) {
        let interval = interval.max(MIN_UPDATE_INTERVAL);
        self.update_interval_ms
            .store(interval.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms.load(Ordering::Relaxed))
    }

    /// Milliseconds since the engine was created, on the monotonic clock.
    pub fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    pub fn connected_clients(&self) -> usize {
        self.channel.connected_clients()
    }

    /// Run the periodic cycle forever. The next tick is scheduled one
    /// interval after the previous one finished.
    pub async fn run(self: Arc<Self>) {
        tracing::info!(
            interval_ms = self.update_interval().as_millis() as u64,
            "sync loop started"
        );
        loop {
            tokio::time::sleep(self.update_interval()).await;
            self.tick().await;
        }
    }

    /// One synchronization cycle: sample chart producers, then broadcast a
    /// compact snapshot.
    pub async fn tick(&self) -> BroadcastOutcome {
        let timestamp = self.now_ms();
        let (samples, snapshot) = {
            let mut registry = self.registry.lock().await;
            let samples = registry.sample_charts(timestamp);
            (samples, registry.compact_snapshot(timestamp, self.connected_clients()))
        };

        let outcome = self.send(&snapshot);
        self.emit(DashboardEvent::TickCompleted {
            timestamp,
            samples,
            outcome,
        });
        outcome
    }

    pub async fn broadcast_snapshot(&self) -> BroadcastOutcome {
        let snapshot = self.compact_snapshot().await;
        self.send(&snapshot)
    }

    pub async fn compact_snapshot(&self) -> CompactSnapshot {
        let registry = self.registry.lock().await;
        registry.compact_snapshot(self.now_ms(), self.connected_clients())
    }

    /// Read-only view for the request/response channel.
    pub async fn full_snapshot(&self) -> FullSnapshot {
        let registry = self.registry.lock().await;
        registry.full_snapshot(self.now_ms(), self.connected_clients())
    }

    /// Dispatch one action. A successful mutation is followed immediately by
    /// a compact broadcast; failures broadcast nothing.
    pub async fn apply_action(
        &self,
        action: &ControlAction,
        source: ActionSource,
    ) -> Result<ControlChange, DashboardError> {
        let result = {
            let mut registry = self.registry.lock().await;
            self.dispatcher
                .dispatch(&mut registry, action)
                .map(|change| {
                    let snapshot = registry.compact_snapshot(self.now_ms(), self.connected_clients());
                    (change, snapshot)
                })
        };

        match result {
            Ok((change, snapshot)) => {
                self.send(&snapshot);
                self.emit(DashboardEvent::ControlChanged {
                    source,
                    change: change.clone(),
                });
                Ok(change)
            }
            Err(error) => {
                self.emit(DashboardEvent::ActionIgnored {
                    source,
                    error: error.clone(),
                });
                Err(error)
            }
        }
    }

    /// Handle one text frame from a viewer. Malformed frames are dropped
    /// without a reply.
    pub async fn handle_push_message(&self, viewer: ViewerId, payload: &str) {
        let source = ActionSource::PushChannel(viewer);
        match ControlAction::parse(payload) {
            Ok(action) => {
                let _ = self.apply_action(&action, source).await;
            }
            Err(error) => self.emit(DashboardEvent::ActionIgnored { source, error }),
        }

        self.emit(DashboardEvent::CustomMessage {
            viewer,
            payload: payload.to_string(),
        });
    }

    /// The viewer must already be subscribed so it receives this broadcast.
    pub async fn viewer_connected(&self, viewer: ViewerId) -> BroadcastOutcome {
        self.emit(DashboardEvent::ViewerConnected {
            viewer,
            connected: self.connected_clients(),
        });
        self.broadcast_snapshot().await
    }

    pub fn viewer_disconnected(&self, viewer: ViewerId) {
        self.emit(DashboardEvent::ViewerDisconnected {
            viewer,
            connected: self.connected_clients(),
        });
    }

    /// Device-side access to the registry (static card updates, state
    /// setters), serialized with everything else.
    pub async fn with_registry<R>(&self, f: impl FnOnce(&mut WidgetRegistry) -> R) -> R {
        let mut registry = self.registry.lock().await;
        f(&mut registry)
    }

    pub async fn system_status(&self) -> SystemStatus {
        let registry = self.registry.lock().await;
        SystemStatus {
            title: registry.title().to_string(),
            cards: registry.cards().len(),
            controls: registry.controls().len(),
            update_interval: self.update_interval(),
            connected_clients: self.connected_clients(),
        }
    }

    pub async fn control_states(&self) -> Vec<ControlStateLine> {
        self.registry.lock().await.control_states()
    }

    fn send(&self, snapshot: &CompactSnapshot) -> BroadcastOutcome {
        match serde_json::to_string(snapshot) {
            Ok(payload) => self.channel.broadcast(payload),
            Err(e) => {
                tracing::error!("Snapshot serialization error: {}", e);
                BroadcastOutcome::NoViewers
            }
        }
    }

    fn emit(&self, event: DashboardEvent) {
        for listener in &self.listeners {
            listener(&event);
        }
    }
}
