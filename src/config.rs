//! Settings for the rule-management tooling.

use serde::{Deserialize, Serialize};

use crate::error::{LimiterError, Result};

/// Prefix for environment overrides, e.g. `NEURAL__RULES__PATH`.
const ENV_PREFIX: &str = "NEURAL";

/// Main settings for the neural limiter tooling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeuralConfig {
    /// Rule document settings
    #[serde(default)]
    pub rules: RulesSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Where limiter rules come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesSettings {
    /// Path to the limiter rules document
    #[serde(default)]
    pub path: Option<String>,

    /// Rules reload interval in seconds
    #[serde(default = "default_reload_interval")]
    pub reload_interval_secs: u64,
}

impl Default for RulesSettings {
    fn default() -> Self {
        Self {
            path: None,
            reload_interval_secs: default_reload_interval(),
        }
    }
}

fn default_reload_interval() -> u64 {
    60
}

/// Logging output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl NeuralConfig {
    /// Load settings from an optional file, overridden by `NEURAL__*` environment variables.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::with_name(path));
        }

        builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|settings| settings.try_deserialize::<NeuralConfig>())
            .map_err(|e| LimiterError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::path::PathBuf;

    // Tests that call `load` read the process environment.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn settings_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "neural-settings-{}-{}.yaml",
            name,
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_default_settings() {
        let config = NeuralConfig::default();
        assert_eq!(config.rules.path, None);
        assert_eq!(config.rules.reload_interval_secs, 60);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_load_partial_settings_file() {
        let _guard = ENV_LOCK.lock();
        let path = settings_file(
            "partial",
            "rules:\n  path: /etc/neural/limiters.yaml\nlogging:\n  json: true\n",
        );

        let config = NeuralConfig::load(path.to_str()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.rules.path.as_deref(), Some("/etc/neural/limiters.yaml"));
        assert_eq!(config.rules.reload_interval_secs, 60);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.json);
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let _guard = ENV_LOCK.lock();
        let config = NeuralConfig::load(None).unwrap();
        assert_eq!(config, NeuralConfig::default());
    }

    #[test]
    fn test_environment_overrides_file() {
        let _guard = ENV_LOCK.lock();
        let path = settings_file(
            "env",
            "rules:\n  path: /etc/neural/limiters.yaml\n  reload_interval_secs: 30\n",
        );

        std::env::set_var("NEURAL__RULES__RELOAD_INTERVAL_SECS", "5");
        let result = NeuralConfig::load(path.to_str());
        std::env::remove_var("NEURAL__RULES__RELOAD_INTERVAL_SECS");
        std::fs::remove_file(&path).unwrap();

        let config = result.unwrap();
        assert_eq!(config.rules.reload_interval_secs, 5);
        assert_eq!(config.rules.path.as_deref(), Some("/etc/neural/limiters.yaml"));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let _guard = ENV_LOCK.lock();
        let err = NeuralConfig::load(Some("/nonexistent/neural-settings")).unwrap_err();
        assert!(matches!(err, LimiterError::Config(_)));
    }
}
