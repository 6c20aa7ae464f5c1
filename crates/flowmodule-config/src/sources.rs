// Configuration source loading.
//
// Priority order:
// 1. Environment variables (FLOWMODULE_* prefix)
// 2. Config file (explicit path, or config.<env>.json in a config directory)
// 3. Serde defaults

use crate::env_overrides::{self, EnvSource, ENV_PREFIX};
use crate::DeployConfig;
use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Path of the per-environment config file inside `dir`
pub fn env_config_path(dir: &Path, env_name: &str) -> PathBuf {
    dir.join(format!("config.{}.json", env_name))
}

pub fn load_for_env(dir: &Path, env_name: &str) -> Result<DeployConfig> {
    let config = read_for_env(dir, env_name)?;
    config.validate()?;
    Ok(config)
}

/// Like [`load_for_env`] without validation
pub fn read_for_env(dir: &Path, env_name: &str) -> Result<DeployConfig> {
    let path = env_config_path(dir, env_name);
    read_from_file_path(&path)
        .with_context(|| format!("Failed to load configuration for environment '{}'", env_name))
}

/// Load configuration from a specific file path.
/// Returns error if file doesn't exist, can't be parsed, or fails validation.
pub fn load_from_file_path(path: &Path) -> Result<DeployConfig> {
    let config = read_from_file_path(path)?;
    config.validate()?;
    Ok(config)
}

/// Parse a config file and apply environment overrides, without validation
pub fn read_from_file_path(path: &Path) -> Result<DeployConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let mut config = parse_config(&content, path)?;
    debug!(path = %path.display(), "Loaded configuration file");

    env_overrides::apply_env_overrides(&mut config, &StdEnvSource)?;
    Ok(config)
}

/// Parse file content; `.toml` files are TOML, everything else JSON
pub(crate) fn parse_config(content: &str, path: &Path) -> Result<DeployConfig> {
    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    if is_toml {
        toml::from_str(content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    } else {
        serde_json::from_str(content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

struct StdEnvSource;

impl EnvSource for StdEnvSource {
    fn get(&self, key: &str) -> Option<String> {
        env::var(format!("{}{}", ENV_PREFIX, key)).ok()
    }
}
