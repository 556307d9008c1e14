//! Command handlers -- one module per subcommand

pub mod config;
pub mod merge;
pub mod policy;

use std::path::Path;

use tracing::debug;

use logcentral_core::config::LogCentralConfig;

use crate::cli::DEFAULT_CONFIG_PATH;
use crate::error::CliError;

/// Load the effective configuration for `merge` and `policy`.
///
/// An explicit path must exist. Without one, `logcentral.toml` is used when
/// present and built-in defaults (with env overrides) otherwise.
pub async fn load_config(explicit: Option<&Path>) -> Result<LogCentralConfig, CliError> {
    if let Some(path) = explicit {
        return Ok(LogCentralConfig::load(path).await?);
    }

    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    if tokio::fs::try_exists(default_path).await? {
        return Ok(LogCentralConfig::load(default_path).await?);
    }

    debug!("no config file found, using defaults");
    let mut config = LogCentralConfig::default();
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}
