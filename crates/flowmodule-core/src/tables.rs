//! Lookup tables fed to the rewriting passes

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::arn::{looks_like_arn, Arn, ConnectInstance};
use crate::error::{Result, TransformError};

/// Symbolic resource identifier → fully qualified ARN
pub type ArnRewriteTable = BTreeMap<String, String>;

/// Output variable name → contact attribute name
pub type AttributeMapping = BTreeMap<String, String>;

/// Which `Parameters` field an identifier binding writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Prompt,
    Lambda,
}

impl BindingKind {
    pub fn parameter(&self) -> &'static str {
        match self {
            BindingKind::Prompt => crate::field_names::PROMPT_ID,
            BindingKind::Lambda => crate::field_names::LAMBDA_FUNCTION_ARN,
        }
    }
}

/// Freshly provisioned prompt and Lambda ARNs, keyed by symbolic identifier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceTables {
    pub prompts: ArnRewriteTable,
    pub lambdas: ArnRewriteTable,
}

impl ResourceTables {
    pub fn new(prompts: ArnRewriteTable, lambdas: ArnRewriteTable) -> Self {
        Self { prompts, lambdas }
    }

    /// Reject identifiers bound in both tables before any traversal starts
    pub fn validate(&self) -> Result<()> {
        if let Some(identifier) = self.prompts.keys().find(|k| self.lambdas.contains_key(*k)) {
            return Err(TransformError::conflicting_identifier(identifier.as_str()));
        }
        Ok(())
    }

    /// Prompt bindings win over Lambda bindings
    pub fn resolve(&self, identifier: &str) -> Option<(BindingKind, &str)> {
        if let Some(arn) = self.prompts.get(identifier) {
            return Some((BindingKind::Prompt, arn.as_str()));
        }
        self.lambdas
            .get(identifier)
            .map(|arn| (BindingKind::Lambda, arn.as_str()))
    }
}

/// A literal search/replace applied to spoken text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SsmlConversionRule {
    pub search_for: String,
    pub replace_with: String,
}

impl SsmlConversionRule {
    pub fn new(search_for: impl Into<String>, replace_with: impl Into<String>) -> Self {
        Self {
            search_for: search_for.into(),
            replace_with: replace_with.into(),
        }
    }
}

/// Identifiers produced by a provisioning run.
///
/// Prompt values may be bare prompt ids (expanded against the Connect
/// instance) or complete ARNs. Lambda values are function ARNs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceManifest {
    #[serde(default)]
    pub prompts: BTreeMap<String, String>,
    #[serde(default)]
    pub lambdas: BTreeMap<String, String>,
}

impl ResourceManifest {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            TransformError::invalid_document(format!("failed to parse resource manifest: {}", e))
        })
    }

    /// Build the lookup tables for a deployment into `region`/`account_id`
    pub fn into_tables(
        self,
        instance: &ConnectInstance,
        region: &str,
        account_id: &str,
    ) -> Result<ResourceTables> {
        let prompts = self
            .prompts
            .into_iter()
            .map(|(name, value)| -> Result<(String, String)> {
                let arn = if looks_like_arn(&value) {
                    Arn::parse(&value)
                        .map_err(|e| {
                            TransformError::malformed_arn(format!("/prompts/{}", name), &value, e)
                        })?
                        .to_string()
                } else {
                    instance.prompt_arn(region, account_id, &value)
                };
                debug!(prompt = %name, arn = %arn, "Resolved prompt binding");
                Ok((name, arn))
            })
            .collect::<Result<ArnRewriteTable>>()?;

        let lambdas = self
            .lambdas
            .into_iter()
            .map(|(name, value)| -> Result<(String, String)> {
                Arn::parse(&value).map_err(|e| {
                    TransformError::malformed_arn(format!("/lambdas/{}", name), &value, e)
                })?;
                Ok((name, value))
            })
            .collect::<Result<ArnRewriteTable>>()?;

        Ok(ResourceTables::new(prompts, lambdas))
    }
}
