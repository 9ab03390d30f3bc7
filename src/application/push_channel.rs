// Push channel seam - implemented by the transport adapter

/// Result of a fire-and-forget broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastOutcome {
    Delivered(usize),
    NoViewers,
}

/// Fan-out side of the bidirectional viewer channel. Sends never block and
/// are never acknowledged.
pub trait PushChannel: Send + Sync {
    fn broadcast(&self, payload: String) -> BroadcastOutcome;

    fn connected_clients(&self) -> usize;
}
