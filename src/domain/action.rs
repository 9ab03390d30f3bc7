// Inbound control actions, shared by the HTTP and WebSocket channels
use crate::domain::error::DashboardError;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionVerb {
    Toggle,
    Click,
    Slide,
}

impl ActionVerb {
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "toggle" => Some(ActionVerb::Toggle),
            "click" => Some(ActionVerb::Click),
            "slide" => Some(ActionVerb::Slide),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ActionVerb::Toggle => "toggle",
            ActionVerb::Click => "click",
            ActionVerb::Slide => "slide",
        }
    }
}

/// Normalized `{id, action, value?}` message.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ControlAction {
    pub id: String,
    pub action: String,
    #[serde(default)]
    pub value: Option<serde_json::Number>,
}

impl ControlAction {
    pub fn new(id: impl Into<String>, verb: ActionVerb, value: Option<i64>) -> Self {
        Self {
            id: id.into(),
            action: verb.as_str().to_string(),
            value: value.map(serde_json::Number::from),
        }
    }

    /// Parse a raw payload. Invalid JSON, a non-object, or a missing
    /// `id`/`action` string is a `MalformedMessage`.
    pub fn parse(payload: &str) -> Result<Self, DashboardError> {
        serde_json::from_str(payload).map_err(|e| DashboardError::MalformedMessage(e.to_string()))
    }

    pub fn verb(&self) -> Option<ActionVerb> {
        ActionVerb::parse(&self.action)
    }

    /// Slider target. Fractions truncate toward zero and out-of-range
    /// numbers saturate at the `i32` bounds.
    pub fn slide_value(&self) -> Option<i32> {
        let number = self.value.as_ref()?;
        let wide = match number.as_i64() {
            Some(v) => v,
            None => number.as_f64()? as i64,
        };
        Some(wide.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
    }
}
