// Configuration validation
//
// Validates that required fields are present and values are sensible

use crate::*;
use anyhow::{anyhow, bail, Result};
use flowmodule_core::{Arn, ConnectInstance};
use tracing::warn;

pub fn validate_config(config: &DeployConfig) -> Result<()> {
    validate_target(config)?;
    validate_asapp_config(&config.asapp)?;
    validate_mappings(config)?;
    validate_ssml_conversions(&config.ssml_conversions)?;
    validate_speak_action(&config.speak_action)?;
    Ok(())
}

pub(crate) fn parse_connect_instance(arn: &str) -> Result<ConnectInstance> {
    let parsed = Arn::parse(arn)
        .map_err(|e| anyhow!("connectInstanceArn '{}' is not a valid ARN: {}", arn, e))?;
    ConnectInstance::from_arn(&parsed).ok_or_else(|| {
        anyhow!(
            "connectInstanceArn '{}' must name a Connect instance (arn:<partition>:connect:<region>:<account>:instance/<id>)",
            arn
        )
    })
}

fn validate_target(config: &DeployConfig) -> Result<()> {
    if config.account_id.is_empty() {
        bail!("accountId is required");
    }
    if !config.account_id.chars().all(|c| c.is_ascii_digit()) {
        bail!("accountId must contain only digits, got '{}'", config.account_id);
    }
    if config.region.is_empty() {
        bail!("region is required");
    }
    if config.connect_instance_arn.is_empty() {
        bail!("connectInstanceArn is required");
    }

    let instance = parse_connect_instance(&config.connect_instance_arn)?;
    if instance.region != config.region {
        warn!(
            instance_region = %instance.region,
            region = %config.region,
            "connectInstanceArn region differs from the deployment region"
        );
    }

    if config.object_prefix.is_empty() {
        warn!("objectPrefix is empty; deployed object names will have no prefix");
    }

    Ok(())
}

fn validate_asapp_config(config: &AsappConfig) -> Result<()> {
    if config.api_host.is_empty() {
        bail!("asapp-apiHost is required");
    }
    if config.api_id.is_empty() {
        bail!("asapp-apiId is required");
    }
    if config.api_secret.is_empty() {
        bail!("asapp-apiSecret is required");
    }
    if config.assuming_role_arn.is_empty() {
        bail!("asapp-assumingRoleArn is required");
    }
    Arn::parse(&config.assuming_role_arn).map_err(|e| {
        anyhow!(
            "asapp-assumingRoleArn '{}' is not a valid ARN: {}",
            config.assuming_role_arn,
            e
        )
    })?;
    Ok(())
}

fn validate_mappings(config: &DeployConfig) -> Result<()> {
    for (name, map) in [
        (
            "attributesToInputVariablesMap",
            &config.attributes_to_input_variables_map,
        ),
        (
            "outputVariablesToAttributesMap",
            &config.output_variables_to_attributes_map,
        ),
    ] {
        for (key, value) in map {
            if key.is_empty() || value.is_empty() {
                bail!("{} entries must have non-empty keys and values", name);
            }
        }
    }

    if config.output_variables_to_attributes_map.is_empty() {
        warn!("outputVariablesToAttributesMap is empty; no output variables will be persisted");
    }

    Ok(())
}

fn validate_ssml_conversions(rules: &[flowmodule_core::SsmlConversionRule]) -> Result<()> {
    for (index, rule) in rules.iter().enumerate() {
        if rule.search_for.is_empty() {
            bail!("ssmlConversions[{}].searchFor must not be empty", index);
        }
    }
    Ok(())
}

fn validate_speak_action(convention: &flowmodule_core::SpeakActionConvention) -> Result<()> {
    if convention.text_parameter.is_empty() || convention.ssml_parameter.is_empty() {
        bail!("speakAction.textParameter and speakAction.ssmlParameter must not be empty");
    }
    if convention.text_parameter == convention.ssml_parameter {
        bail!("speakAction.textParameter and speakAction.ssmlParameter must differ");
    }
    if convention.identifiers.is_empty() && convention.action_type.is_none() {
        warn!("speakAction matches no actions; SSML conversions will have no effect");
    }
    Ok(())
}
