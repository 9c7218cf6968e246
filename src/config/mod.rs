mod schema;
pub mod init;
pub mod validation;

pub use schema::Config;
pub use validation::validate_config;

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::source::{SourceSettings, DEFAULT_RETRIES, DEFAULT_TIMEOUT};

/// Environment variable naming the data source location
pub const DATA_URL_ENV: &str = "ARCHIVE_DATA_URL";

/// Get the config directory path (~/.config/prompt-archive/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("prompt-archive"))
}

/// Get the default config file path (~/.config/prompt-archive/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path.
///
/// A missing file at the default path yields an empty config, since the data
/// source may come from the environment alone. A missing file at an explicit
/// path is an error.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let (config_path, explicit) = match path {
        Some(p) => (p, true),
        None => (get_config_path()?, false),
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    Ok(config)
}

/// Read the data source location from the environment
pub fn data_url_from_env() -> Option<String> {
    std::env::var(DATA_URL_ENV).ok()
}

/// Combine the config file with command-line and environment overrides.
///
/// The data URL is the first non-blank value of `--data-url`,
/// `ARCHIVE_DATA_URL` and the file's `data_url`. When none is set the
/// settings carry no URL and every fetch reports the source as not configured.
pub fn resolve_settings(
    config: &Config,
    cli_url: Option<&str>,
    env_url: Option<&str>,
) -> Result<SourceSettings> {
    let data_url = [cli_url, env_url, config.data_url.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string);

    let timeout = match config.timeout.as_deref() {
        Some(t) => parse_timeout(t)?,
        None => DEFAULT_TIMEOUT,
    };

    Ok(SourceSettings {
        data_url,
        timeout,
        retries: config.retries.unwrap_or(DEFAULT_RETRIES),
    })
}

pub(crate) fn parse_timeout(s: &str) -> Result<Duration> {
    let timeout = humantime::parse_duration(s.trim())
        .with_context(|| format!("Invalid timeout '{}'", s))?;
    if timeout.is_zero() {
        anyhow::bail!("Invalid timeout '{}': must be greater than zero", s);
    }
    Ok(timeout)
}
