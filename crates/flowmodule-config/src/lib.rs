// flowmodule-config - Deployment configuration for the flow module toolkit
//
// Supports configuration from multiple sources:
// 1. Environment variables (highest priority, FLOWMODULE_* prefix)
// 2. Explicit config file path (--config, JSON or TOML by extension)
// 3. Per-environment file config.<env>.json in a config directory
// 4. Built-in defaults (lowest priority)

use anyhow::Result;
use flowmodule_core::{AttributeMapping, ConnectInstance, SpeakActionConvention, SsmlConversionRule};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

mod env_overrides;
mod sources;
mod validation;

pub use env_overrides::{apply_env_overrides, EnvSource, ENV_PREFIX};

pub const DEFAULT_OBJECT_PREFIX: &str = "generativeagent-quickstart-";

/// Main deployment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployConfig {
    #[serde(default)]
    pub account_id: String,

    #[serde(default)]
    pub region: String,

    #[serde(default)]
    pub connect_instance_arn: String,

    #[serde(default = "default_object_prefix")]
    pub object_prefix: String,

    /// Accepted so existing `config.<env>.json` files keep parsing; the
    /// rewriter does not use it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_existing_vpc_id: Option<String>,

    /// Contact attribute → engine input variable, rendered for the Engage Lambda
    #[serde(default)]
    pub attributes_to_input_variables_map: BTreeMap<String, String>,

    /// Engine output variable → contact attribute, injected into the flow module
    #[serde(default)]
    pub output_variables_to_attributes_map: AttributeMapping,

    #[serde(default)]
    pub ssml_conversions: Vec<SsmlConversionRule>,

    #[serde(flatten)]
    pub asapp: AsappConfig,

    #[serde(default)]
    pub speak_action: SpeakActionConvention,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_object_prefix() -> String {
    DEFAULT_OBJECT_PREFIX.to_string()
}

/// Credentials for the external conversational engine
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AsappConfig {
    #[serde(rename = "asapp-apiHost", default)]
    pub api_host: String,
    #[serde(rename = "asapp-apiId", default)]
    pub api_id: String,
    #[serde(rename = "asapp-apiSecret", default)]
    pub api_secret: String,
    #[serde(rename = "asapp-assumingRoleArn", default)]
    pub assuming_role_arn: String,
}

impl std::fmt::Debug for AsappConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsappConfig")
            .field("api_host", &self.api_host)
            .field("api_id", &self.api_id)
            .field("api_secret", &"<redacted>")
            .field("assuming_role_arn", &self.assuming_role_arn)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => anyhow::bail!("Unsupported log format: {}. Supported: text, json", s),
        }
    }
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            account_id: String::new(),
            region: String::new(),
            connect_instance_arn: String::new(),
            object_prefix: default_object_prefix(),
            use_existing_vpc_id: None,
            attributes_to_input_variables_map: BTreeMap::new(),
            output_variables_to_attributes_map: AttributeMapping::new(),
            ssml_conversions: Vec::new(),
            asapp: AsappConfig::default(),
            speak_action: SpeakActionConvention::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl DeployConfig {
    /// Load `config.<env_name>.json` from `dir`, then apply environment overrides
    pub fn load_for_env(dir: impl AsRef<Path>, env_name: &str) -> Result<Self> {
        sources::load_for_env(dir.as_ref(), env_name)
    }

    /// Load an explicit config file (JSON or TOML), then apply environment overrides
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        sources::load_from_file_path(path.as_ref())
    }

    /// Read `config.<env_name>.json` and apply environment overrides without
    /// validating. Callers run [`DeployConfig::validate`] once logging is up.
    pub fn read_for_env(dir: impl AsRef<Path>, env_name: &str) -> Result<Self> {
        sources::read_for_env(dir.as_ref(), env_name)
    }

    /// Read an explicit config file without validating
    pub fn read_from_path(path: impl AsRef<Path>) -> Result<Self> {
        sources::read_from_file_path(path.as_ref())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    /// The Connect instance named by `connectInstanceArn`
    pub fn connect_instance(&self) -> Result<ConnectInstance> {
        validation::parse_connect_instance(&self.connect_instance_arn)
    }

    /// Name of a deployed object: `<objectPrefix><suffix>`
    pub fn object_name(&self, suffix: &str) -> String {
        format!("{}{}", self.object_prefix, suffix)
    }

    /// Pretty JSON for logging, with the API secret redacted
    pub fn to_redacted_json(&self) -> Result<String> {
        let mut redacted = self.clone();
        if !redacted.asapp.api_secret.is_empty() {
            redacted.asapp.api_secret = "<redacted>".to_string();
        }
        Ok(serde_json::to_string_pretty(&redacted)?)
    }
}
