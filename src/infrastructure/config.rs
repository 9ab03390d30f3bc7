use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::application::widget_registry::{DEFAULT_SUBTITLE, DEFAULT_TITLE};
use crate::domain::time_series::DEFAULT_MAX_POINTS;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_subtitle")]
    pub subtitle: String,
    #[serde(default = "default_update_interval_ms")]
    pub update_interval_ms: u64,
    #[serde(default = "default_chart_max_points")]
    pub chart_max_points: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    80
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_subtitle() -> String {
    DEFAULT_SUBTITLE.to_string()
}

fn default_update_interval_ms() -> u64 {
    1000
}

fn default_chart_max_points() -> usize {
    DEFAULT_MAX_POINTS
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            subtitle: default_subtitle(),
            update_interval_ms: default_update_interval_ms(),
            chart_max_points: default_chart_max_points(),
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let ip: IpAddr = self.host.parse()?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl DashboardSettings {
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }
}

impl DashboardConfig {
    pub fn validate(self) -> anyhow::Result<Self> {
        if self.dashboard.update_interval_ms == 0 {
            anyhow::bail!("dashboard.update_interval_ms must be greater than zero");
        }
        if self.dashboard.chart_max_points == 0 {
            anyhow::bail!("dashboard.chart_max_points must be greater than zero");
        }
        Ok(self)
    }
}

/// Load `config/dashboard.*` (optional), then `DASHBOARD__*` environment
/// overrides, e.g. `DASHBOARD__SERVER__PORT=8080`.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize::<DashboardConfig>()?.validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> anyhow::Result<DashboardConfig> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;
        settings.try_deserialize::<DashboardConfig>()?.validate()
    }

    #[test]
    fn test_defaults_when_empty() {
        let config = parse("").unwrap();
        assert_eq!(config.server.port, 80);
        assert_eq!(config.dashboard.title, "ESP32 Dashboard");
        assert_eq!(config.dashboard.update_interval(), Duration::from_millis(1000));
        assert_eq!(config.dashboard.chart_max_points, 20);
    }

    #[test]
    fn test_overrides() {
        let config = parse(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [dashboard]
            title = "Greenhouse"
            update_interval_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(
            config.server.socket_addr().unwrap(),
            "127.0.0.1:8080".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(config.dashboard.title, "Greenhouse");
        assert_eq!(config.dashboard.subtitle, "Real-time monitoring system");
        assert_eq!(config.dashboard.update_interval_ms, 250);
    }

    #[test]
    fn test_rejects_zero_interval() {
        assert!(parse("[dashboard]\nupdate_interval_ms = 0").is_err());
        assert!(parse("[dashboard]\nchart_max_points = 0").is_err());
    }
}
