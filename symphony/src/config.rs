use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_env_nonzero(var: &str, default: u64) -> u64 {
    match parse_env_or(var, default) {
        0 => {
            tracing::warn!("{} must be greater than zero. Using default {}.", var, default);
            default
        }
        parsed => parsed,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub assistant: AssistantConfig,
    pub training: TrainingConfig,
    pub logging: LoggingConfig,
    /// JSON fixture document replacing the built-in dashboard data.
    pub fixtures_path: Option<PathBuf>,
}

/// Simulated latency of the response fetch and the caller-side timeout
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    pub response_latency_ms: u64,
    pub response_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrainingConfig {
    pub train_delay_ms: u64,
    pub learning_delay_ms: u64,
    pub learning_interval_secs: u64,
    // Start the repeating learning task when continuous learning is enabled
    pub auto_learning: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("expected 'text' or 'json', got '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl AssistantConfig {
    pub fn response_latency(&self) -> Duration {
        Duration::from_millis(self.response_latency_ms)
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }
}

impl TrainingConfig {
    pub fn train_delay(&self) -> Duration {
        Duration::from_millis(self.train_delay_ms)
    }

    pub fn learning_delay(&self) -> Duration {
        Duration::from_millis(self.learning_delay_ms)
    }

    pub fn learning_interval(&self) -> Duration {
        Duration::from_secs(self.learning_interval_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assistant: AssistantConfig {
                response_latency_ms: parse_env_or("SYMPHONY_RESPONSE_LATENCY_MS", 800),
                response_timeout_ms: parse_env_or("SYMPHONY_RESPONSE_TIMEOUT_MS", 10_000),
            },
            training: TrainingConfig {
                train_delay_ms: parse_env_or("SYMPHONY_TRAIN_DELAY_MS", 3000),
                learning_delay_ms: parse_env_or("SYMPHONY_LEARNING_DELAY_MS", 2000),
                learning_interval_secs: parse_env_nonzero("SYMPHONY_LEARNING_INTERVAL_SECS", 30),
                auto_learning: parse_env_or("SYMPHONY_AUTO_LEARNING", true),
            },
            logging: LoggingConfig {
                format: parse_env_or("SYMPHONY_LOG_FORMAT", LogFormat::Text),
            },
            fixtures_path: env::var("SYMPHONY_FIXTURES")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Near-zero delays for tests and one-shot queries.
    pub fn immediate() -> Self {
        Self {
            assistant: AssistantConfig {
                response_latency_ms: 0,
                response_timeout_ms: 1000,
            },
            training: TrainingConfig {
                train_delay_ms: 0,
                learning_delay_ms: 0,
                learning_interval_secs: 30,
                auto_learning: false,
            },
            logging: LoggingConfig {
                format: LogFormat::Text,
            },
            fixtures_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "SYMPHONY_RESPONSE_LATENCY_MS",
        "SYMPHONY_RESPONSE_TIMEOUT_MS",
        "SYMPHONY_TRAIN_DELAY_MS",
        "SYMPHONY_LEARNING_DELAY_MS",
        "SYMPHONY_LEARNING_INTERVAL_SECS",
        "SYMPHONY_AUTO_LEARNING",
        "SYMPHONY_LOG_FORMAT",
        "SYMPHONY_FIXTURES",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_config_defaults() {
        clear_env();

        let config = Config::default();
        assert_eq!(config.assistant.response_latency_ms, 800);
        assert_eq!(config.assistant.response_timeout_ms, 10_000);
        assert_eq!(config.training.train_delay_ms, 3000);
        assert_eq!(config.training.learning_delay_ms, 2000);
        assert_eq!(config.training.learning_interval_secs, 30);
        assert!(config.training.auto_learning);
        assert_eq!(config.logging.format, LogFormat::Text);
        assert!(config.fixtures_path.is_none());
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        clear_env();
        std::env::set_var("SYMPHONY_TRAIN_DELAY_MS", "150");
        std::env::set_var("SYMPHONY_AUTO_LEARNING", "false");
        std::env::set_var("SYMPHONY_LOG_FORMAT", "json");
        std::env::set_var("SYMPHONY_FIXTURES", "/tmp/dbs.json");

        let config = Config::from_env();
        assert_eq!(config.training.train_delay(), Duration::from_millis(150));
        assert!(!config.training.auto_learning);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.fixtures_path, Some(PathBuf::from("/tmp/dbs.json")));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_value_falls_back_to_default() {
        clear_env();
        std::env::set_var("SYMPHONY_LEARNING_INTERVAL_SECS", "soon");
        std::env::set_var("SYMPHONY_LOG_FORMAT", "xml");

        let config = Config::from_env();
        assert_eq!(config.training.learning_interval_secs, 30);
        assert_eq!(config.logging.format, LogFormat::Text);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_zero_learning_interval_falls_back_to_default() {
        clear_env();
        std::env::set_var("SYMPHONY_LEARNING_INTERVAL_SECS", "0");

        let config = Config::from_env();
        assert_eq!(config.training.learning_interval_secs, 30);
        assert_eq!(config.training.learning_interval(), Duration::from_secs(30));

        clear_env();
    }

    #[test]
    fn test_immediate_config_has_no_delays() {
        let config = Config::immediate();
        assert_eq!(config.assistant.response_latency(), Duration::ZERO);
        assert_eq!(config.training.train_delay(), Duration::ZERO);
        assert!(!config.training.auto_learning);
    }
}
