// Simulated device - Sensor readings and actuators for the demo binary
use crate::application::widget_registry::WidgetRegistry;
use crate::domain::widget::WidgetMetadata;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering};
use std::time::Instant;

const INITIAL_MOTOR_TARGET: i32 = 1000;

/// Actuator state mutated by control callbacks and read back by the
/// sensor producers.
#[derive(Debug, Default)]
pub struct DeviceState {
    pub relay: AtomicBool,
    pub powered: AtomicBool,
    pub motor_target: AtomicI32,
    pub resets: AtomicU32,
}

#[derive(Debug, Clone)]
pub struct SimulatedDevice {
    started: Instant,
    state: Arc<DeviceState>,
}

impl SimulatedDevice {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            state: Arc::new(DeviceState::default()),
        }
    }

    pub fn state(&self) -> Arc<DeviceState> {
        self.state.clone()
    }

    fn seconds(started: Instant) -> f64 {
        started.elapsed().as_secs_f64()
    }

    /// Register the demo cards and controls.
    pub fn install(&self, registry: &mut WidgetRegistry, chart_points: usize) {
        let started = self.started;

        registry.add_temperature_card("Room Temperature", move || {
            temperature_at(Self::seconds(started))
        });
        registry.add_humidity_card("Room Humidity", move || humidity_at(Self::seconds(started)));

        let state = self.state.clone();
        registry.add_motor_rpm_card("Motor Speed", move || {
            motor_rpm(&state, Self::seconds(started))
        });

        registry.add_percentage_card(
            "Battery",
            "Backup battery level",
            move || battery_at(Self::seconds(started)),
            "green",
        );

        let state = self.state.clone();
        registry.add_status_card(
            "Uptime",
            "Time since boot",
            move || format_uptime(Self::seconds(started) as u64),
            move || {
                let resets = state.resets.load(Ordering::Relaxed);
                format!("Counters reset {resets} times")
            },
            "blue",
        );

        let state = self.state.clone();
        registry.add_custom_card(
            WidgetMetadata::new("Relay", "Output relay").color("purple"),
            {
                let state = state.clone();
                move || on_off(state.relay.load(Ordering::Relaxed)).to_string()
            },
            move || {
                if state.powered.load(Ordering::Relaxed) {
                    "Motor powered".to_string()
                } else {
                    "Motor idle".to_string()
                }
            },
        );

        registry.add_chart_card(
            "CPU Load",
            "Processor utilisation",
            move || cpu_load_at(Self::seconds(started)),
            "blue",
            chart_points,
        );

        let state = self.state.clone();
        registry.add_switch(
            "Relay",
            "Toggle the output relay",
            move |on| state.relay.store(on, Ordering::Relaxed),
            "blue",
        );

        let state = self.state.clone();
        registry.add_power_button("Motor Power", "Energise the motor driver", move |on| {
            state.powered.store(on, Ordering::Relaxed)
        });

        let state = self.state.clone();
        registry.add_button(
            "Reset Counters",
            "Clear accumulated counters",
            move || {
                state.resets.fetch_add(1, Ordering::Relaxed);
            },
            "green",
        );

        let state = self.state.clone();
        let slider = registry.add_slider(
            "Motor Target",
            "Target speed in RPM",
            move |rpm| state.motor_target.store(rpm, Ordering::Relaxed),
            0,
            2000,
            "blue",
        );
        registry.set_slider_value(&slider, INITIAL_MOTOR_TARGET);
    }
}

impl Default for SimulatedDevice {
    fn default() -> Self {
        Self::new()
    }
}

fn temperature_at(t: f64) -> f32 {
    (22.0 + 6.0 * (t / 60.0).sin()) as f32
}

fn humidity_at(t: f64) -> f32 {
    (50.0 + 15.0 * (t / 90.0).sin()) as f32
}

fn battery_at(t: f64) -> i32 {
    100 - ((t / 36.0) as i32 % 100)
}

fn cpu_load_at(t: f64) -> f64 {
    50.0 + 30.0 * (t / 10.0).sin()
}

fn motor_rpm(state: &DeviceState, t: f64) -> i32 {
    if !state.powered.load(Ordering::Relaxed) {
        return 0;
    }
    let target = state.motor_target.load(Ordering::Relaxed);
    target + (15.0 * (t * 2.0).sin()) as i32
}

fn format_uptime(secs: u64) -> String {
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

fn on_off(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::widget::{CardKind, ControlKind};

    #[test]
    fn test_install_composition() {
        let device = SimulatedDevice::new();
        let mut registry = WidgetRegistry::new();
        device.install(&mut registry, 30);

        let kinds: Vec<CardKind> = registry.cards().iter().map(|c| c.kind()).collect();
        assert_eq!(
            kinds,
            [
                CardKind::Temperature,
                CardKind::Humidity,
                CardKind::MotorRpm,
                CardKind::Percentage,
                CardKind::Status,
                CardKind::Custom,
                CardKind::Chart,
            ]
        );
        let controls: Vec<ControlKind> = registry.controls().iter().map(|c| c.kind()).collect();
        assert_eq!(
            controls,
            [ControlKind::Switch, ControlKind::PowerButton, ControlKind::Button, ControlKind::Slider]
        );
        assert_eq!(registry.find_card("chart_6").and_then(|c| c.series()).map(|s| s.capacity()), Some(30));
        assert_eq!(registry.get_slider_value("slider_3"), INITIAL_MOTOR_TARGET);
    }

    #[test]
    fn test_controls_drive_device_state() {
        let device = SimulatedDevice::new();
        let state = device.state();
        let mut registry = WidgetRegistry::new();
        device.install(&mut registry, 10);

        assert_eq!(registry.find_card("rpm_2").unwrap().current_value(), "0");

        registry.set_control_state("power_1", true);
        registry.set_control_state("switch_0", true);
        registry.set_slider_value("slider_3", 1500);

        assert!(state.powered.load(Ordering::Relaxed));
        assert_eq!(state.motor_target.load(Ordering::Relaxed), 1500);
        assert_eq!(registry.find_card("custom_5").unwrap().current_value(), "ON");
        let rpm: i32 = registry.find_card("rpm_2").unwrap().current_value().parse().unwrap();
        assert!((1485..=1515).contains(&rpm));
    }

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(3725), "01:02:05");
        assert_eq!(format_uptime(0), "00:00:00");
    }
}
