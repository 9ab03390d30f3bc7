// Error taxonomy shared by the registry, dispatcher and both inbound channels
use thiserror::Error;

/// Every failure in the core is absorbed: the registry stays in its prior
/// state and the caller decides whether to report or drop it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    /// Accessor or dispatch target not found.
    #[error("unknown widget id '{0}'")]
    UnknownId(String),

    /// Verb is not valid for the control's kind.
    #[error("action '{action}' is not valid for control '{id}'")]
    ActionKindMismatch { id: String, action: String },

    /// Unparsable payload or missing required fields.
    #[error("malformed message: {0}")]
    MalformedMessage(String),
}
