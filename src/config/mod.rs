use crate::classification::batch::{available_workers, DEFAULT_CHUNK_SIZE};
use crate::classification::{BatchConfig, ChunkFailurePolicy, RuleSource};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub rules: RulesConfig,
    pub batch: BatchConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let reload_secs = parse_var("RULES_RELOAD_INTERVAL_SECS", 300u64)?;
        if reload_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "RULES_RELOAD_INTERVAL_SECS",
                value: reload_secs.to_string(),
            });
        }

        let rules = RulesConfig {
            employment_path: path_var("RULES_EMPLOYMENT_PATH"),
            industry_path: path_var("RULES_INDUSTRY_PATH"),
            reload_interval: Duration::from_secs(reload_secs),
        };

        let chunk_size = parse_var("BATCH_CHUNK_SIZE", DEFAULT_CHUNK_SIZE)?;
        let workers = parse_var("BATCH_WORKERS", available_workers())?;
        for (key, value) in [("BATCH_CHUNK_SIZE", chunk_size), ("BATCH_WORKERS", workers)] {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    key,
                    value: value.to_string(),
                });
            }
        }

        let chunk_timeout = match env::var("BATCH_CHUNK_TIMEOUT_SECS") {
            Ok(raw) if !raw.trim().is_empty() => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| ConfigError::Invalid {
                        key: "BATCH_CHUNK_TIMEOUT_SECS",
                        value: raw.clone(),
                    })?;
                Some(Duration::from_secs(secs))
            }
            _ => None,
        };

        let failure_policy = match env::var("BATCH_CHUNK_FAILURE") {
            Ok(raw) => ChunkFailurePolicy::parse(&raw).ok_or(ConfigError::Invalid {
                key: "BATCH_CHUNK_FAILURE",
                value: raw,
            })?,
            Err(_) => ChunkFailurePolicy::default(),
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            rules,
            batch: BatchConfig {
                chunk_size,
                workers,
                chunk_timeout,
                failure_policy,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Location and refresh cadence of the external rule files.
#[derive(Debug, Clone)]
pub struct RulesConfig {
    pub employment_path: Option<PathBuf>,
    pub industry_path: Option<PathBuf>,
    pub reload_interval: Duration,
}

impl RulesConfig {
    pub fn source(&self) -> RuleSource {
        RuleSource::new(self.employment_path.clone(), self.industry_path.clone())
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

fn path_var(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}

fn parse_var<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
            key,
            value: raw.clone(),
        }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid { key, value } => {
                write!(f, "{key} has an invalid value '{value}'")
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
        for key in [
            "APP_ENV",
            "APP_LOG_LEVEL",
            "RULES_EMPLOYMENT_PATH",
            "RULES_INDUSTRY_PATH",
            "RULES_RELOAD_INTERVAL_SECS",
            "BATCH_CHUNK_SIZE",
            "BATCH_WORKERS",
            "BATCH_CHUNK_TIMEOUT_SECS",
            "BATCH_CHUNK_FAILURE",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.rules.employment_path.is_none());
        assert_eq!(config.rules.reload_interval, Duration::from_secs(300));
        assert_eq!(config.batch.chunk_size, DEFAULT_CHUNK_SIZE);
        assert!(config.batch.workers >= 1);
        assert!(config.batch.chunk_timeout.is_none());
        assert_eq!(config.batch.failure_policy, ChunkFailurePolicy::Substitute);
    }

    #[test]
    fn reads_rule_paths_and_batch_settings() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("RULES_EMPLOYMENT_PATH", "/etc/taxonomy/employment.json");
        env::set_var("RULES_RELOAD_INTERVAL_SECS", "60");
        env::set_var("BATCH_CHUNK_SIZE", "250");
        env::set_var("BATCH_WORKERS", "3");
        env::set_var("BATCH_CHUNK_TIMEOUT_SECS", "30");
        env::set_var("BATCH_CHUNK_FAILURE", "drop");

        let config = AppConfig::load().expect("config loads");
        let source = config.rules.source();
        assert_eq!(
            source.employment_path,
            Some(PathBuf::from("/etc/taxonomy/employment.json"))
        );
        assert!(source.industry_path.is_none());
        assert_eq!(config.rules.reload_interval, Duration::from_secs(60));
        assert_eq!(config.batch.chunk_size, 250);
        assert_eq!(config.batch.workers, 3);
        assert_eq!(config.batch.chunk_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.batch.failure_policy, ChunkFailurePolicy::Drop);
        reset_env();
    }

    #[test]
    fn rejects_zero_chunk_size() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("BATCH_CHUNK_SIZE", "0");
        let error = AppConfig::load().expect_err("zero chunk size rejected");
        match error {
            ConfigError::Invalid { key, .. } => assert_eq!(key, "BATCH_CHUNK_SIZE"),
        }
        reset_env();
    }

    #[test]
    fn rejects_zero_chunk_timeout() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("BATCH_CHUNK_TIMEOUT_SECS", "0");
        let error = AppConfig::load().expect_err("zero chunk timeout rejected");
        match error {
            ConfigError::Invalid { key, value } => {
                assert_eq!(key, "BATCH_CHUNK_TIMEOUT_SECS");
                assert_eq!(value, "0");
            }
        }
        reset_env();
    }

    #[test]
    fn rejects_unknown_failure_policy() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("BATCH_CHUNK_FAILURE", "retry");
        assert!(AppConfig::load().is_err());
        reset_env();
    }
}
