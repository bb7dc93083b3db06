use crate::graphs::GraphMode;
use std::env;
use std::fmt;
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the scouting analytics tools.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub analytics: AnalyticsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("SCOUT_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("SCOUT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let default_metric =
            env::var("SCOUT_DEFAULT_METRIC").unwrap_or_else(|_| "total_points".to_string());

        let default_mode = match env::var("SCOUT_DEFAULT_MODE") {
            Ok(raw) => raw
                .parse::<GraphMode>()
                .map_err(|_| ConfigError::InvalidMode(raw))?,
            Err(_) => GraphMode::Averages,
        };

        let load_timeout_ms = env::var("SCOUT_LOAD_TIMEOUT_MS")
            .unwrap_or_else(|_| "5000".to_string())
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidTimeout)?;

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            analytics: AnalyticsConfig {
                default_metric,
                default_mode,
                load_timeout_ms,
            },
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Defaults applied when a command does not say otherwise.
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    pub default_metric: String,
    pub default_mode: GraphMode,
    pub load_timeout_ms: u64,
}

impl AnalyticsConfig {
    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidMode(String),
    InvalidTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidMode(value) => write!(
                f,
                "SCOUT_DEFAULT_MODE '{}' must be 'averages' or 'match_by_match'",
                value
            ),
            ConfigError::InvalidTimeout => {
                write!(f, "SCOUT_LOAD_TIMEOUT_MS must be a whole number of milliseconds")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("SCOUT_ENV");
        env::remove_var("SCOUT_LOG_LEVEL");
        env::remove_var("SCOUT_DEFAULT_METRIC");
        env::remove_var("SCOUT_DEFAULT_MODE");
        env::remove_var("SCOUT_LOAD_TIMEOUT_MS");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.analytics.default_metric, "total_points");
        assert_eq!(config.analytics.default_mode, GraphMode::Averages);
        assert_eq!(config.analytics.load_timeout(), Duration::from_millis(5000));
    }

    #[test]
    fn reads_overrides_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SCOUT_ENV", "CI");
        env::set_var("SCOUT_DEFAULT_MODE", "match-by-match");
        env::set_var("SCOUT_LOAD_TIMEOUT_MS", "250");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Test);
        assert_eq!(config.analytics.default_mode, GraphMode::MatchByMatch);
        assert_eq!(config.analytics.load_timeout_ms, 250);
        reset_env();
    }

    #[test]
    fn rejects_unknown_mode() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SCOUT_DEFAULT_MODE", "weekly");
        let err = AppConfig::load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMode(ref value) if value == "weekly"));
        reset_env();
    }
}
