// WebSocket fan-out hub implementing the push channel
use crate::application::events::ViewerId;
use crate::application::push_channel::{BroadcastOutcome, PushChannel};
use futures::stream::Stream;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::broadcast;

pub const DEFAULT_HUB_CAPACITY: usize = 16;

/// Broadcast fan-out plus a live viewer count. Slow viewers lag and skip
/// frames; the hub never blocks or disconnects them.
pub struct WebSocketHub {
    sender: broadcast::Sender<String>,
    viewers: AtomicUsize,
    next_viewer: AtomicU64,
}

impl WebSocketHub {
    pub fn new(capacity: usize) -> Arc<Self> {
        let (sender, _) = broadcast::channel(capacity);
        Arc::new(Self {
            sender,
            viewers: AtomicUsize::new(0),
            next_viewer: AtomicU64::new(0),
        })
    }

    /// Subscribe a new viewer. The returned guard keeps it counted until
    /// dropped.
    pub fn join(self: &Arc<Self>) -> (ViewerGuard, broadcast::Receiver<String>) {
        let receiver = self.sender.subscribe();
        let id = self.next_viewer.fetch_add(1, Ordering::Relaxed);
        self.viewers.fetch_add(1, Ordering::SeqCst);
        let guard = ViewerGuard {
            id,
            hub: Arc::clone(self),
        };
        (guard, receiver)
    }
}

impl PushChannel for WebSocketHub {
    fn broadcast(&self, payload: String) -> BroadcastOutcome {
        match self.sender.send(payload) {
            Ok(delivered) => BroadcastOutcome::Delivered(delivered),
            Err(_) => BroadcastOutcome::NoViewers,
        }
    }

    fn connected_clients(&self) -> usize {
        self.viewers.load(Ordering::SeqCst)
    }
}

pub struct ViewerGuard {
    id: ViewerId,
    hub: Arc<WebSocketHub>,
}

impl ViewerGuard {
    pub fn id(&self) -> ViewerId {
        self.id
    }
}

impl Drop for ViewerGuard {
    fn drop(&mut self) {
        self.hub.viewers.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Turn a viewer's receiver into a stream of frames, skipping anything
/// lost to lag.
pub fn receiver_stream(mut rx: broadcast::Receiver<String>) -> impl Stream<Item = String> {
    async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(payload) => yield payload,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!("Viewer lagged, skipped {} frames", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[test]
    fn test_broadcast_without_viewers() {
        let hub = WebSocketHub::new(4);
        assert_eq!(hub.broadcast("{}".to_string()), BroadcastOutcome::NoViewers);
        assert_eq!(hub.connected_clients(), 0);
    }

    #[tokio::test]
    async fn test_join_counts_and_receives() {
        let hub = WebSocketHub::new(4);
        let (first, mut first_rx) = hub.join();
        let (second, _second_rx) = hub.join();

        assert_ne!(first.id(), second.id());
        assert_eq!(hub.connected_clients(), 2);
        assert_eq!(hub.broadcast("a".to_string()), BroadcastOutcome::Delivered(2));
        assert_eq!(first_rx.recv().await.unwrap(), "a");

        drop(second);
        assert_eq!(hub.connected_clients(), 1);
        drop(first);
        assert_eq!(hub.connected_clients(), 0);
    }

    #[tokio::test]
    async fn test_stream_skips_lagged_frames() {
        let hub = WebSocketHub::new(2);
        let (_guard, rx) = hub.join();
        for frame in ["1", "2", "3", "4"] {
            hub.broadcast(frame.to_string());
        }

        let stream = receiver_stream(rx);
        futures::pin_mut!(stream);
        assert_eq!(stream.next().await.as_deref(), Some("3"));
        assert_eq!(stream.next().await.as_deref(), Some("4"));
    }
}
