// Status reports for the diagnostic logger
use crate::domain::widget::{Control, ControlKind};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemStatus {
    pub title: String,
    pub cards: usize,
    pub controls: usize,
    pub update_interval: Duration,
    pub connected_clients: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlStateDetail {
    Toggle(bool),
    Value(i32),
    Button,
}

/// One line of the control-state dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlStateLine {
    pub id: String,
    pub title: String,
    pub detail: ControlStateDetail,
}

impl From<&Control> for ControlStateLine {
    fn from(control: &Control) -> Self {
        let detail = match control.kind() {
            ControlKind::Switch | ControlKind::PowerButton => ControlStateDetail::Toggle(control.state()),
            ControlKind::Slider => ControlStateDetail::Value(control.value()),
            ControlKind::Button => ControlStateDetail::Button,
        };
        Self {
            id: control.id().to_string(),
            title: control.metadata.title.clone(),
            detail,
        }
    }
}

impl fmt::Display for ControlStateLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID: {} | Title: {}", self.id, self.title)?;
        match self.detail {
            ControlStateDetail::Toggle(on) => write!(f, " | State: {}", if on { "ON" } else { "OFF" }),
            ControlStateDetail::Value(value) => write!(f, " | Value: {value}"),
            ControlStateDetail::Button => write!(f, " | Type: BUTTON"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::widget_registry::WidgetRegistry;

    #[test]
    fn test_state_lines() {
        let mut registry = WidgetRegistry::new();
        let relay = registry.add_switch("Relay", "", |_| {}, "blue");
        registry.add_button("Reset", "", || {}, "green");
        let pwm = registry.add_slider("PWM", "", |_| {}, 0, 255, "blue");
        registry.set_control_state(&relay, true);
        registry.set_slider_value(&pwm, 128);

        let lines: Vec<String> = registry.control_states().iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            [
                "ID: switch_0 | Title: Relay | State: ON",
                "ID: btn_1 | Title: Reset | Type: BUTTON",
                "ID: slider_2 | Title: PWM | Value: 128",
            ]
        );
    }
}
