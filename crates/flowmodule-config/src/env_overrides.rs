use super::{DeployConfig, LogFormat};
use anyhow::{Context, Result};

pub const ENV_PREFIX: &str = "FLOWMODULE_";

/// Abstraction over environment-variable lookups so tests can supply their
/// own source of overrides.
pub trait EnvSource {
    /// Get an environment variable by its name without the FLOWMODULE_ prefix
    fn get(&self, key: &str) -> Option<String>;
}

/// Apply environment-variable overrides (highest priority) to the deployment config.
pub fn apply_env_overrides<E: EnvSource>(config: &mut DeployConfig, env: &E) -> Result<()> {
    // Deployment target
    if let Some(region) = get_env_string(env, "REGION") {
        config.region = region;
    }
    if let Some(account_id) = get_env_string(env, "ACCOUNT_ID") {
        config.account_id = account_id;
    }
    if let Some(arn) = get_env_string(env, "CONNECT_INSTANCE_ARN") {
        config.connect_instance_arn = arn;
    }
    if let Some(prefix) = get_env_string(env, "OBJECT_PREFIX") {
        config.object_prefix = prefix;
    }

    // Logging
    if let Some(level) = get_env_string(env, "LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(format) = get_env_string(env, "LOG_FORMAT") {
        config.logging.format = format
            .parse::<LogFormat>()
            .context("Invalid FLOWMODULE_LOG_FORMAT value")?;
    }

    Ok(())
}

fn get_env_string<E: EnvSource>(env: &E, key: &str) -> Option<String> {
    env.get(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapEnv(HashMap<&'static str, &'static str>);

    impl EnvSource for MapEnv {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key).map(|v| v.to_string())
        }
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config = DeployConfig {
            region: "us-east-1".to_string(),
            ..DeployConfig::default()
        };
        let env = MapEnv(HashMap::from([
            ("REGION", "eu-west-1"),
            ("ACCOUNT_ID", " 111122223333 "),
            ("OBJECT_PREFIX", "demo-"),
            ("LOG_FORMAT", "json"),
        ]));

        apply_env_overrides(&mut config, &env).unwrap();

        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.account_id, "111122223333");
        assert_eq!(config.object_prefix, "demo-");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let mut config = DeployConfig {
            region: "us-east-1".to_string(),
            ..DeployConfig::default()
        };
        let env = MapEnv(HashMap::from([("REGION", "  ")]));
        apply_env_overrides(&mut config, &env).unwrap();
        assert_eq!(config.region, "us-east-1");
    }

    #[test]
    fn test_invalid_log_format_is_rejected() {
        let mut config = DeployConfig::default();
        let env = MapEnv(HashMap::from([("LOG_FORMAT", "xml")]));
        let err = apply_env_overrides(&mut config, &env).unwrap_err();
        assert!(err.to_string().contains("FLOWMODULE_LOG_FORMAT"));
    }
}
