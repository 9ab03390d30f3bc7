// Control dispatcher - Applies one inbound action against a control
use crate::application::widget_registry::WidgetRegistry;
use crate::domain::action::{ActionVerb, ControlAction};
use crate::domain::error::DashboardError;
use crate::domain::widget::ControlKind;

/// Verb × kind compatibility. Extend this table when adding kinds.
const ACTION_TABLE: &[(ActionVerb, &[ControlKind])] = &[
    (ActionVerb::Toggle, &[ControlKind::Switch, ControlKind::PowerButton]),
    (ActionVerb::Click, &[ControlKind::Button]),
    (ActionVerb::Slide, &[ControlKind::Slider]),
];

pub fn accepts(verb: ActionVerb, kind: ControlKind) -> bool {
    ACTION_TABLE
        .iter()
        .any(|(v, kinds)| *v == verb && kinds.contains(&kind))
}

/// What a successful dispatch did, as seen after the callback ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlChange {
    pub id: String,
    pub title: String,
    pub kind: ControlKind,
    pub verb: ActionVerb,
    pub state: bool,
    pub value: i32,
    /// Slider value landed outside `[min, max]`. Stored anyway.
    pub out_of_range: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ControlDispatcher;

impl ControlDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Validate and apply `action`, invoking exactly one callback on
    /// success. Any error leaves the registry untouched and runs no
    /// callback.
    pub fn dispatch(
        &self,
        registry: &mut WidgetRegistry,
        action: &ControlAction,
    ) -> Result<ControlChange, DashboardError> {
        let control = registry
            .find_control_mut(&action.id)
            .ok_or_else(|| DashboardError::UnknownId(action.id.clone()))?;

        let mismatch = || DashboardError::ActionKindMismatch {
            id: action.id.clone(),
            action: action.action.clone(),
        };
        let verb = action.verb().ok_or_else(mismatch)?;
        if !accepts(verb, control.kind()) {
            return Err(mismatch());
        }

        let applied = match verb {
            ActionVerb::Toggle => {
                let next = !control.state();
                control.apply_state(next)
            }
            ActionVerb::Click => control.press(),
            ActionVerb::Slide => {
                let value = action.slide_value().ok_or_else(|| {
                    DashboardError::MalformedMessage(format!(
                        "slide on '{}' requires a numeric value",
                        action.id
                    ))
                })?;
                control.apply_value(value)
            }
        };
        if !applied {
            return Err(mismatch());
        }

        let (min, max) = control.bounds();
        let out_of_range = verb == ActionVerb::Slide && !(min..=max).contains(&control.value());

        Ok(ControlChange {
            id: control.id().to_string(),
            title: control.metadata.title.clone(),
            kind: control.kind(),
            verb,
            state: control.state(),
            value: control.value(),
            out_of_range,
        })
    }
}
