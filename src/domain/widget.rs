// Widget domain models: cards (read-only) and controls (read-write)
use crate::domain::time_series::TimeSeriesStore;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Card kinds. The discriminant order is the wire code viewers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardKind {
    Temperature,
    Humidity,
    MotorRpm,
    Custom,
    Status,
    Percentage,
    Chart,
}

impl CardKind {
    pub const fn code(self) -> u8 {
        match self {
            CardKind::Temperature => 0,
            CardKind::Humidity => 1,
            CardKind::MotorRpm => 2,
            CardKind::Custom => 3,
            CardKind::Status => 4,
            CardKind::Percentage => 5,
            CardKind::Chart => 6,
        }
    }

    pub const fn id_prefix(self) -> &'static str {
        match self {
            CardKind::Temperature => "temp_",
            CardKind::Humidity => "hum_",
            CardKind::MotorRpm => "rpm_",
            CardKind::Custom => "custom_",
            CardKind::Status => "status_",
            CardKind::Percentage => "pct_",
            CardKind::Chart => "chart_",
        }
    }
}

impl Serialize for CardKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    Switch,
    Button,
    PowerButton,
    Slider,
}

impl ControlKind {
    pub const fn code(self) -> u8 {
        match self {
            ControlKind::Switch => 0,
            ControlKind::Button => 1,
            ControlKind::PowerButton => 2,
            ControlKind::Slider => 3,
        }
    }

    pub const fn id_prefix(self) -> &'static str {
        match self {
            ControlKind::Switch => "switch_",
            ControlKind::Button => "btn_",
            ControlKind::PowerButton => "power_",
            ControlKind::Slider => "slider_",
        }
    }
}

impl Serialize for ControlKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Presentation metadata. Opaque to the core, passed through to snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetMetadata {
    pub title: String,
    pub description: String,
    pub color: String,
    pub icon: String,
}

impl WidgetMetadata {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }
}

pub type TextProducer = Arc<dyn Fn() -> String + Send + Sync>;
pub type SampleProducer = Arc<dyn Fn() -> f64 + Send + Sync>;

/// Producers bound to a card. Absent producers fall back to the last
/// statically set value/status.
#[derive(Clone, Default)]
pub struct CardProducers {
    pub value: Option<TextProducer>,
    pub status: Option<TextProducer>,
    pub sample: Option<SampleProducer>,
}

impl CardProducers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value<F>(mut self, producer: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.value = Some(Arc::new(producer));
        self
    }

    pub fn status<F>(mut self, producer: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.status = Some(Arc::new(producer));
        self
    }

    /// Numeric producer sampled into the chart series on every tick. Charts
    /// without one sample their value producer instead.
    pub fn sample<F>(mut self, producer: F) -> Self
    where
        F: Fn() -> f64 + Send + Sync + 'static,
    {
        self.sample = Some(Arc::new(producer));
        self
    }
}

impl fmt::Debug for CardProducers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardProducers")
            .field("value", &self.value.is_some())
            .field("status", &self.status.is_some())
            .field("sample", &self.sample.is_some())
            .finish()
    }
}

#[derive(Debug)]
pub struct Card {
    id: String,
    kind: CardKind,
    pub metadata: WidgetMetadata,
    value: String,
    status: String,
    producers: CardProducers,
    series: Option<TimeSeriesStore>,
}

impl Card {
    /// `max_points` only applies to chart cards; other kinds carry no series.
    pub fn new(
        id: String,
        kind: CardKind,
        metadata: WidgetMetadata,
        producers: CardProducers,
        max_points: usize,
    ) -> Self {
        let series = (kind == CardKind::Chart).then(|| TimeSeriesStore::with_capacity(max_points));
        Self {
            id,
            kind,
            metadata,
            value: String::new(),
            status: String::new(),
            producers,
            series,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> CardKind {
        self.kind
    }

    pub fn current_value(&self) -> String {
        match &self.producers.value {
            Some(producer) => producer(),
            None => self.value.clone(),
        }
    }

    pub fn current_status(&self) -> String {
        match &self.producers.status {
            Some(producer) => producer(),
            None => self.status.clone(),
        }
    }

    /// Static update. An empty status keeps the previous one.
    pub fn set_static(&mut self, value: &str, status: &str) {
        self.value = value.to_string();
        if !status.is_empty() {
            self.status = status.to_string();
        }
    }

    pub fn series(&self) -> Option<&TimeSeriesStore> {
        self.series.as_ref()
    }

    /// Invoke the chart's producer and append its reading. A dedicated
    /// sample producer wins; otherwise the value producer's text is read as
    /// a leading number (`"42.5"`, `"42.5°C"`). Returns `None` for non-chart
    /// cards, charts without a producer and text with no leading number.
    pub fn record_sample(&mut self, timestamp: u64) -> Option<f64> {
        let series = self.series.as_mut()?;
        let value = match (&self.producers.sample, &self.producers.value) {
            (Some(sample), _) => sample(),
            (None, Some(text)) => leading_number(&text())?,
            (None, None) => return None,
        };
        series.append(timestamp, value);
        Some(value)
    }
}

fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let end = text
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
        .map_or(text.len(), |(i, _)| i);
    text[..end].parse().ok()
}

pub type ToggleCallback = Box<dyn FnMut(bool) + Send>;
pub type ClickCallback = Box<dyn FnMut() + Send>;
pub type SlideCallback = Box<dyn FnMut(i32) + Send>;

/// Kind, bounds and callback of a control in one value, so a control can
/// only ever carry the callback variant its kind expects.
pub enum ControlBinding {
    Switch(ToggleCallback),
    PowerButton(ToggleCallback),
    Button(ClickCallback),
    Slider {
        min: i32,
        max: i32,
        on_slide: SlideCallback,
    },
}

impl ControlBinding {
    pub fn switch<F: FnMut(bool) + Send + 'static>(on_toggle: F) -> Self {
        ControlBinding::Switch(Box::new(on_toggle))
    }

    pub fn power_button<F: FnMut(bool) + Send + 'static>(on_toggle: F) -> Self {
        ControlBinding::PowerButton(Box::new(on_toggle))
    }

    pub fn button<F: FnMut() + Send + 'static>(on_click: F) -> Self {
        ControlBinding::Button(Box::new(on_click))
    }

    pub fn slider<F: FnMut(i32) + Send + 'static>(min: i32, max: i32, on_slide: F) -> Self {
        ControlBinding::Slider {
            min,
            max,
            on_slide: Box::new(on_slide),
        }
    }

    pub fn kind(&self) -> ControlKind {
        match self {
            ControlBinding::Switch(_) => ControlKind::Switch,
            ControlBinding::PowerButton(_) => ControlKind::PowerButton,
            ControlBinding::Button(_) => ControlKind::Button,
            ControlBinding::Slider { .. } => ControlKind::Slider,
        }
    }
}

enum ControlCallback {
    Toggle(ToggleCallback),
    Click(ClickCallback),
    Slide(SlideCallback),
}

pub struct Control {
    id: String,
    kind: ControlKind,
    pub metadata: WidgetMetadata,
    state: bool,
    value: i32,
    min_value: i32,
    max_value: i32,
    callback: ControlCallback,
}

impl Control {
    /// Sliders start at their minimum; toggles start off.
    pub fn new(id: String, metadata: WidgetMetadata, binding: ControlBinding) -> Self {
        let kind = binding.kind();
        let (min_value, max_value, callback) = match binding {
            ControlBinding::Switch(cb) | ControlBinding::PowerButton(cb) => {
                (0, 0, ControlCallback::Toggle(cb))
            }
            ControlBinding::Button(cb) => (0, 0, ControlCallback::Click(cb)),
            ControlBinding::Slider { min, max, on_slide } => {
                (min, max, ControlCallback::Slide(on_slide))
            }
        };

        Self {
            id,
            kind,
            metadata,
            state: false,
            value: min_value,
            min_value,
            max_value,
            callback,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ControlKind {
        self.kind
    }

    pub fn state(&self) -> bool {
        self.state
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn bounds(&self) -> (i32, i32) {
        (self.min_value, self.max_value)
    }

    /// Assign the toggle state and notify the device. No-op for non-toggle
    /// controls; returns whether the callback ran.
    pub fn apply_state(&mut self, state: bool) -> bool {
        match &mut self.callback {
            ControlCallback::Toggle(on_toggle) => {
                self.state = state;
                on_toggle(state);
                true
            }
            _ => false,
        }
    }

    pub fn press(&mut self) -> bool {
        match &mut self.callback {
            ControlCallback::Click(on_click) => {
                on_click();
                true
            }
            _ => false,
        }
    }

    /// Values outside `[min, max]` are stored as given.
    pub fn apply_value(&mut self, value: i32) -> bool {
        match &mut self.callback {
            ControlCallback::Slide(on_slide) => {
                self.value = value;
                on_slide(value);
                true
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Control")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("state", &self.state)
            .field("value", &self.value)
            .field("min_value", &self.min_value)
            .field("max_value", &self.max_value)
            .finish_non_exhaustive()
    }
}
