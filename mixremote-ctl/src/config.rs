use anyhow::{Context, Result};
use mixremote_connector::config::ClientConfig;
use mixremote_logger::LogConfig;
use serde::Deserialize;

/// The top-level configuration for the mixremote-ctl binary.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct CtlConfig {
    #[serde(default)]
    pub connector: ClientConfig,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

/// Loads the configuration from a TOML file, with `MIXREMOTE`-prefixed
/// environment variables taking precedence.
pub fn load_config(path: &str) -> Result<CtlConfig> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name(path))
        .add_source(config::Environment::with_prefix("MIXREMOTE").separator("__"));

    let settings: CtlConfig = builder
        .build()
        .context(format!("Failed to build configuration from '{}'", path))?
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    Ok(settings)
}
