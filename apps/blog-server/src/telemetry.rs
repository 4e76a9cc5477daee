//! Tracing initialization.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info,blog_server=debug,blog_infra=debug";

#[derive(Debug, Clone, Default)]
pub struct TelemetryConfig {
    /// JSON logs instead of the pretty format.
    pub json_logs: bool,
}

impl TelemetryConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `LOG_FORMAT=json` (any case) switches to JSON output.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            json_logs: lookup("LOG_FORMAT")
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("json")),
        }
    }
}

pub fn init_telemetry(config: &TelemetryConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    if config.json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }

    tracing::info!(json_logs = config.json_logs, "Telemetry initialized");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_format(value: Option<&str>) -> TelemetryConfig {
        let value = value.map(str::to_string);
        TelemetryConfig::from_lookup(|key| (key == "LOG_FORMAT").then(|| value.clone()).flatten())
    }

    #[test]
    fn test_log_format_selects_json() {
        assert!(with_format(Some("json")).json_logs);
        assert!(with_format(Some(" JSON ")).json_logs);
        assert!(!with_format(Some("pretty")).json_logs);
        assert!(!with_format(None).json_logs);
    }
}
