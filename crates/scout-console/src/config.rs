//! Console configuration from environment.

use scout_sdk::{TelemetryConfig, TopicSpec};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub telemetry: TelemetryConfig,
    /// Wait between a finished AI run and the gallery refresh.
    pub ai_refresh_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:9080".to_string(),
            telemetry: TelemetryConfig::default(),
            ai_refresh_delay: Duration::from_millis(2000),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let telemetry = TelemetryConfig {
            url: env::var("SCOUT_ROSBRIDGE_URL").unwrap_or(defaults.telemetry.url),
            battery_topic: TopicSpec {
                name: env::var("SCOUT_BATTERY_TOPIC")
                    .unwrap_or(defaults.telemetry.battery_topic.name),
                ..defaults.telemetry.battery_topic
            },
            state_topic: TopicSpec {
                name: env::var("SCOUT_STATE_TOPIC").unwrap_or(defaults.telemetry.state_topic.name),
                ..defaults.telemetry.state_topic
            },
        };

        Self {
            api_url: env::var("SCOUT_API_URL").unwrap_or(defaults.api_url),
            telemetry,
            ai_refresh_delay: env::var("SCOUT_AI_REFRESH_DELAY_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.ai_refresh_delay),
        }
    }
}
