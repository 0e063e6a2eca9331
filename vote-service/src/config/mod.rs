use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct VoteConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub ballot: BallotConfig,
    pub redis: RedisConfig,
    pub telemetry: TelemetryConfig,
    /// Shown on the page so users can tell which replica served them.
    pub hostname: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BallotConfig {
    pub option_a: String,
    pub option_b: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    /// Bounds connecting and every command sent to Redis.
    pub timeout_secs: u64,
}

impl RedisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub log_level: String,
    /// Span export is disabled when unset or empty.
    pub otlp_endpoint: Option<String>,
}

impl VoteConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        Ok(Self::from_lookup(common, |key| env::var(key).ok()))
    }

    /// Build the config from an arbitrary key lookup. Every setting has a
    /// default, so this never fails.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        VoteConfig {
            common,
            ballot: BallotConfig {
                option_a: get("OPTION_A", "Cats"),
                option_b: get("OPTION_B", "Dogs"),
            },
            redis: RedisConfig {
                url: get("REDIS_URL", "redis://redis:6379/0"),
                timeout_secs: get("REDIS_TIMEOUT_SECS", "5")
                    .parse()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .unwrap_or(5),
            },
            telemetry: TelemetryConfig {
                service_name: get("OTEL_SERVICE_NAME", "vote-app"),
                log_level: get("LOG_LEVEL", "info"),
                otlp_endpoint: Some(get("OTLP_ENDPOINT", "http://jaeger:4317"))
                    .filter(|endpoint| !endpoint.is_empty()),
            },
            hostname: lookup("HOSTNAME")
                .filter(|name| !name.is_empty())
                .unwrap_or_else(system_hostname),
        }
    }
}

fn system_hostname() -> String {
    std::fs::read_to_string("/etc/hostname")
        .ok()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}
