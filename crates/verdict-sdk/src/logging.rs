//! Tracing bootstrap

use crate::config::EngineConfig;
use crate::error::{Result, SdkError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the Verdict crates log at
/// `config.log_level`. Fails if a global subscriber is already set.
pub fn init_tracing(config: &EngineConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.log_level)));

    let json = config.json_logs;
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(fmt::layer))
        .try_init()
        .map_err(|e| SdkError::ConfigError(format!("Failed to initialize tracing: {}", e)))
}

fn default_directives(level: &str) -> String {
    format!(
        "verdict_sdk={level},verdict_runtime={level},verdict_core={level}",
        level = level
    )
}
