//! Configuration types for DecisionEngine

use crate::error::{Result, SdkError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use verdict_runtime::EvaluationOptions;

/// Prefix of the environment variables overriding file settings
pub const ENV_PREFIX: &str = "VERDICT";

/// Main engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Enable metrics collection
    pub enable_metrics: bool,

    /// Expression evaluation settings
    pub evaluation: EvaluationConfig,

    /// Maximum number of requests evaluated at once by `decide_batch`
    pub batch_concurrency: usize,

    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,

    /// Emit logs as JSON lines
    pub json_logs: bool,
}

/// Expression evaluation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Stop `And`/`Or` at the first deciding child
    pub short_circuit: bool,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self { short_circuit: true }
    }
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            enable_metrics: true,
            evaluation: EvaluationConfig::default(),
            batch_concurrency: 16,
            log_level: "info".to_string(),
            json_logs: false,
        }
    }

    /// Load configuration from an optional file and `VERDICT_*` variables.
    ///
    /// A `.env` file in the working directory is loaded first. The file format
    /// follows its extension (YAML, JSON or TOML); a missing file leaves the
    /// defaults in place. Nested keys use a double underscore, for example
    /// `VERDICT_EVALUATION__SHORT_CIRCUIT=false`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let config: Self = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        tracing::debug!(path = %path.as_ref().display(), "engine configuration loaded");
        Ok(config)
    }

    /// Parse a YAML document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_concurrency == 0 {
            return Err(SdkError::ConfigError(
                "batch_concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Enable metrics
    pub fn enable_metrics(mut self, enable: bool) -> Self {
        self.enable_metrics = enable;
        self
    }

    /// Set the batch concurrency
    pub fn with_batch_concurrency(mut self, concurrency: usize) -> Self {
        self.batch_concurrency = concurrency;
        self
    }

    /// Toggle `And`/`Or` short-circuiting
    pub fn with_short_circuit(mut self, enable: bool) -> Self {
        self.evaluation.short_circuit = enable;
        self
    }

    /// Options for live evaluations
    pub fn evaluation_options(&self) -> EvaluationOptions {
        EvaluationOptions {
            fake_values: false,
            short_circuit: self.evaluation.short_circuit,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_config_default() {
        let config = EngineConfig::default();

        assert!(config.enable_metrics);
        assert!(config.evaluation.short_circuit);
        assert_eq!(config.batch_concurrency, 16);
        assert_eq!(config.log_level, "info");
        assert!(!config.json_logs);
    }

    #[test]
    fn test_builder_methods() {
        let config = EngineConfig::new()
            .enable_metrics(false)
            .with_batch_concurrency(4)
            .with_short_circuit(false);

        assert!(!config.enable_metrics);
        assert_eq!(config.batch_concurrency, 4);
        assert_eq!(
            config.evaluation_options(),
            EvaluationOptions {
                fake_values: false,
                short_circuit: false
            }
        );
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = EngineConfig::from_yaml_str("batch_concurrency: 2\n").unwrap();
        assert_eq!(config.batch_concurrency, 2);
        assert!(config.enable_metrics);
        assert!(config.evaluation.short_circuit);
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let err = EngineConfig::from_yaml_str("batch_concurrency: 0\n").unwrap_err();
        assert!(matches!(err, SdkError::ConfigError(_)));
    }
}
