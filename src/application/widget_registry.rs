// Widget registry - Single source of truth for displayed state
use crate::application::status_report::ControlStateLine;
use crate::domain::snapshot::{CompactSnapshot, FullSnapshot};
use crate::domain::time_series::DEFAULT_MAX_POINTS;
use crate::domain::widget::{
    Card, CardKind, CardProducers, Control, ControlBinding, ControlKind, WidgetMetadata,
};
use std::sync::Arc;

pub const DEFAULT_TITLE: &str = "ESP32 Dashboard";
pub const DEFAULT_SUBTITLE: &str = "Real-time monitoring system";

/// Ordered cards and controls. Composition is fixed once the sync loop
/// starts; lookups are linear scans over small vectors.
#[derive(Debug)]
pub struct WidgetRegistry {
    title: String,
    subtitle: String,
    cards: Vec<Card>,
    controls: Vec<Control>,
    next_card_seq: usize,
    next_control_seq: usize,
    chart_max_points: usize,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            subtitle: DEFAULT_SUBTITLE.to_string(),
            cards: Vec::new(),
            controls: Vec::new(),
            next_card_seq: 0,
            next_control_seq: 0,
            chart_max_points: DEFAULT_MAX_POINTS,
        }
    }

    /// Capacity used by `register_card` for chart cards.
    pub fn with_chart_max_points(mut self, max_points: usize) -> Self {
        self.chart_max_points = max_points;
        self
    }

    /// Subtitle is only replaced when non-empty.
    pub fn set_title(&mut self, title: &str, subtitle: &str) {
        self.title = title.to_string();
        if !subtitle.is_empty() {
            self.subtitle = subtitle.to_string();
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    // --- registration -----------------------------------------------------

    pub fn register_card(
        &mut self,
        kind: CardKind,
        metadata: WidgetMetadata,
        producers: CardProducers,
    ) -> String {
        let max_points = self.chart_max_points;
        self.register_card_with_capacity(kind, metadata, producers, max_points)
    }

    pub fn register_card_with_capacity(
        &mut self,
        kind: CardKind,
        metadata: WidgetMetadata,
        producers: CardProducers,
        max_points: usize,
    ) -> String {
        let id = format!("{}{}", kind.id_prefix(), self.next_card_seq);
        self.next_card_seq += 1;
        self.cards
            .push(Card::new(id.clone(), kind, metadata, producers, max_points));
        id
    }

    pub fn register_control(&mut self, metadata: WidgetMetadata, binding: ControlBinding) -> String {
        let id = format!("{}{}", binding.kind().id_prefix(), self.next_control_seq);
        self.next_control_seq += 1;
        self.controls.push(Control::new(id.clone(), metadata, binding));
        id
    }

    pub fn add_temperature_card<F>(&mut self, title: &str, reading: F) -> String
    where
        F: Fn() -> f32 + Send + Sync + 'static,
    {
        let reading = Arc::new(reading);
        let status_reading = reading.clone();
        let producers = CardProducers::new()
            .value(move || format!("{:.1}°C", reading()))
            .status(move || {
                let temp = status_reading();
                if temp > 30.0 {
                    "🔥 High temperature".to_string()
                } else if temp < 15.0 {
                    "❄️ Low temperature".to_string()
                } else {
                    "✅ Normal range".to_string()
                }
            });
        let metadata = WidgetMetadata::new(title, "Temperature")
            .color("orange")
            .icon("🌡️");
        self.register_card(CardKind::Temperature, metadata, producers)
    }

    pub fn add_humidity_card<F>(&mut self, title: &str, reading: F) -> String
    where
        F: Fn() -> f32 + Send + Sync + 'static,
    {
        let reading = Arc::new(reading);
        let status_reading = reading.clone();
        let producers = CardProducers::new()
            .value(move || format!("{:.1}%", reading()))
            .status(move || {
                let humidity = status_reading();
                if humidity > 70.0 {
                    "💧 High humidity".to_string()
                } else if humidity < 30.0 {
                    "🏜️ Low humidity".to_string()
                } else {
                    "✅ Optimal".to_string()
                }
            });
        let metadata = WidgetMetadata::new(title, "Humidity").color("blue").icon("💧");
        self.register_card(CardKind::Humidity, metadata, producers)
    }

    pub fn add_motor_rpm_card<F>(&mut self, title: &str, reading: F) -> String
    where
        F: Fn() -> i32 + Send + Sync + 'static,
    {
        let reading = Arc::new(reading);
        let status_reading = reading.clone();
        let producers = CardProducers::new()
            .value(move || reading().to_string())
            .status(move || {
                let rpm = status_reading();
                if rpm > 1400 {
                    "⚡ High speed".to_string()
                } else if rpm < 800 {
                    "🐌 Low speed".to_string()
                } else {
                    "✅ Normal speed".to_string()
                }
            });
        let metadata = WidgetMetadata::new(title, "Motor RPM").color("green").icon("⚙️");
        self.register_card(CardKind::MotorRpm, metadata, producers)
    }

    pub fn add_status_card<V, S>(
        &mut self,
        title: &str,
        description: &str,
        value: V,
        status: S,
        color: &str,
    ) -> String
    where
        V: Fn() -> String + Send + Sync + 'static,
        S: Fn() -> String + Send + Sync + 'static,
    {
        let producers = CardProducers::new().value(value).status(status);
        let metadata = WidgetMetadata::new(title, description).color(color).icon("ℹ️");
        self.register_card(CardKind::Status, metadata, producers)
    }

    pub fn add_percentage_card<F>(
        &mut self,
        title: &str,
        description: &str,
        reading: F,
        color: &str,
    ) -> String
    where
        F: Fn() -> i32 + Send + Sync + 'static,
    {
        let reading = Arc::new(reading);
        let status_reading = reading.clone();
        let producers = CardProducers::new()
            .value(move || format!("{}%", reading()))
            .status(move || {
                let pct = status_reading();
                if pct > 80 {
                    "🔋 Excellent".to_string()
                } else if pct > 50 {
                    "✅ Good".to_string()
                } else if pct > 20 {
                    "⚠️ Low".to_string()
                } else {
                    "🔴 Critical".to_string()
                }
            });
        let metadata = WidgetMetadata::new(title, description).color(color).icon("📊");
        self.register_card(CardKind::Percentage, metadata, producers)
    }

    pub fn add_custom_card<V, S>(
        &mut self,
        metadata: WidgetMetadata,
        value: V,
        status: S,
    ) -> String
    where
        V: Fn() -> String + Send + Sync + 'static,
        S: Fn() -> String + Send + Sync + 'static,
    {
        let metadata = if metadata.icon.is_empty() {
            metadata.icon("⭐")
        } else {
            metadata
        };
        let producers = CardProducers::new().value(value).status(status);
        self.register_card(CardKind::Custom, metadata, producers)
    }

    pub fn add_chart_card<F>(
        &mut self,
        title: &str,
        description: &str,
        reading: F,
        color: &str,
        max_points: usize,
    ) -> String
    where
        F: Fn() -> f64 + Send + Sync + 'static,
    {
        let reading = Arc::new(reading);
        let display_reading = reading.clone();
        let producers = CardProducers::new()
            .value(move || format!("{:.2}", display_reading()))
            .status(|| "Real-time data".to_string())
            .sample(move || reading());
        let metadata = WidgetMetadata::new(title, description).color(color).icon("📈");
        self.register_card_with_capacity(CardKind::Chart, metadata, producers, max_points)
    }

    pub fn add_switch<F>(&mut self, title: &str, description: &str, on_toggle: F, color: &str) -> String
    where
        F: FnMut(bool) + Send + 'static,
    {
        let metadata = WidgetMetadata::new(title, description).color(color);
        self.register_control(metadata, ControlBinding::switch(on_toggle))
    }

    pub fn add_button<F>(&mut self, title: &str, description: &str, on_click: F, color: &str) -> String
    where
        F: FnMut() + Send + 'static,
    {
        let metadata = WidgetMetadata::new(title, description).color(color);
        self.register_control(metadata, ControlBinding::button(on_click))
    }

    pub fn add_power_button<F>(&mut self, title: &str, description: &str, on_toggle: F) -> String
    where
        F: FnMut(bool) + Send + 'static,
    {
        let metadata = WidgetMetadata::new(title, description).color("green");
        self.register_control(metadata, ControlBinding::power_button(on_toggle))
    }

    pub fn add_slider<F>(
        &mut self,
        title: &str,
        description: &str,
        on_slide: F,
        min: i32,
        max: i32,
        color: &str,
    ) -> String
    where
        F: FnMut(i32) + Send + 'static,
    {
        let metadata = WidgetMetadata::new(title, description).color(color);
        self.register_control(metadata, ControlBinding::slider(min, max, on_slide))
    }

    // --- lookup and accessors ---------------------------------------------

    pub fn find_card(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id() == id)
    }

    pub fn find_card_mut(&mut self, id: &str) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id() == id)
    }

    pub fn find_control(&self, id: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.id() == id)
    }

    pub fn find_control_mut(&mut self, id: &str) -> Option<&mut Control> {
        self.controls.iter_mut().find(|c| c.id() == id)
    }

    /// Static update for cards without producers. Unknown ids are ignored.
    pub fn set_card_value(&mut self, id: &str, value: &str, status: &str) {
        if let Some(card) = self.find_card_mut(id) {
            card.set_static(value, status);
        }
    }

    pub fn get_control_state(&self, id: &str) -> bool {
        self.find_toggle(id).map(Control::state).unwrap_or(false)
    }

    /// Assigns the state and invokes the toggle callback.
    pub fn set_control_state(&mut self, id: &str, state: bool) {
        if let Some(control) = self.controls.iter_mut().find(|c| c.id() == id && is_toggle(c.kind())) {
            control.apply_state(state);
        }
    }

    pub fn get_slider_value(&self, id: &str) -> i32 {
        self.find_control(id)
            .filter(|c| c.kind() == ControlKind::Slider)
            .map(Control::value)
            .unwrap_or(0)
    }

    /// Assigns the value and invokes the slide callback.
    pub fn set_slider_value(&mut self, id: &str, value: i32) {
        if let Some(control) = self.find_control_mut(id) {
            control.apply_value(value);
        }
    }

    fn find_toggle(&self, id: &str) -> Option<&Control> {
        self.find_control(id).filter(|c| is_toggle(c.kind()))
    }

    // --- sync support -----------------------------------------------------

    /// Sample every chart card that has a producer. Returns how many
    /// samples were appended.
    pub fn sample_charts(&mut self, timestamp: u64) -> usize {
        self.cards
            .iter_mut()
            .filter_map(|card| card.record_sample(timestamp))
            .count()
    }

    pub fn full_snapshot(&self, timestamp: u64, connected_clients: usize) -> FullSnapshot {
        FullSnapshot {
            cards: self.cards.iter().map(Into::into).collect(),
            controls: self.controls.iter().map(Into::into).collect(),
            timestamp,
            connected_clients,
        }
    }

    pub fn compact_snapshot(&self, timestamp: u64, connected_clients: usize) -> CompactSnapshot {
        CompactSnapshot {
            cards: self.cards.iter().map(Into::into).collect(),
            controls: self.controls.iter().map(Into::into).collect(),
            timestamp,
            connected_clients,
        }
    }

    pub fn control_states(&self) -> Vec<ControlStateLine> {
        self.controls.iter().map(ControlStateLine::from).collect()
    }
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn is_toggle(kind: ControlKind) -> bool {
    matches!(kind, ControlKind::Switch | ControlKind::PowerButton)
}
