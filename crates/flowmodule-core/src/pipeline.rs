//! The three-pass rewrite applied to a contact-flow-module template

use std::fmt;

use thiserror::Error;
use tracing::{debug, info};

use crate::document::{parse_document, to_pretty_json, OrderedDocument};
use crate::error::TransformError;
use crate::tables::{AttributeMapping, ResourceTables, SsmlConversionRule};
use crate::transform::{
    inject_output_variable_attributes, inject_ssml_conversions, rewrite_resource_references,
    ResourceRewriteReport, SpeakActionConvention,
};

/// Everything a rewrite needs, supplied fresh for each run
#[derive(Debug, Clone, Default)]
pub struct RewritePlan {
    pub region: String,
    pub account_id: String,
    pub tables: ResourceTables,
    pub output_variables: AttributeMapping,
    pub ssml_rules: Vec<SsmlConversionRule>,
    pub speak_convention: SpeakActionConvention,
}

/// Rewrite phase, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Validation,
    ResourceReferences,
    OutputVariables,
    SsmlConversions,
    Serialization,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Validation => "validation",
            Phase::ResourceReferences => "resource-references",
            Phase::OutputVariables => "output-variables",
            Phase::SsmlConversions => "ssml-conversions",
            Phase::Serialization => "serialization",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Flow module rewrite failed during {phase} phase: {source}")]
pub struct PipelineError {
    pub phase: Phase,
    #[source]
    pub source: TransformError,
}

impl PipelineError {
    fn at(phase: Phase) -> impl FnOnce(TransformError) -> Self {
        move |source| Self { phase, source }
    }
}

/// What the passes changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteSummary {
    pub resources: ResourceRewriteReport,
    pub attributes_injected: usize,
    /// `None` when no SSML rules were configured and the pass was skipped
    pub ssml_actions_converted: Option<usize>,
}

/// Run the rewrite passes over `doc` in order:
/// resource references, output variables, then SSML (only with rules).
pub fn rewrite_flow_module(
    doc: &mut OrderedDocument,
    plan: &RewritePlan,
) -> Result<RewriteSummary, PipelineError> {
    plan.tables
        .validate()
        .map_err(PipelineError::at(Phase::Validation))?;

    let resources =
        rewrite_resource_references(doc, &plan.region, &plan.account_id, &plan.tables)
            .map_err(PipelineError::at(Phase::ResourceReferences))?;
    info!(
        prompts = resources.prompts_bound,
        lambdas = resources.lambdas_bound,
        arns = resources.arns_rewritten,
        region = %plan.region,
        "Rewrote resource references"
    );

    let attributes_injected = inject_output_variable_attributes(doc, &plan.output_variables)
        .map_err(PipelineError::at(Phase::OutputVariables))?;
    info!(attributes = attributes_injected, "Injected output variable attributes");

    let ssml_actions_converted = if plan.ssml_rules.is_empty() {
        debug!("No SSML conversions configured; skipping SSML pass");
        None
    } else {
        let converted = inject_ssml_conversions(doc, &plan.ssml_rules, &plan.speak_convention)
            .map_err(PipelineError::at(Phase::SsmlConversions))?;
        info!(
            actions = converted,
            rules = plan.ssml_rules.len(),
            "Converted speak responses to SSML"
        );
        Some(converted)
    };

    Ok(RewriteSummary {
        resources,
        attributes_injected,
        ssml_actions_converted,
    })
}

/// Parse `template`, rewrite it, and pretty-print the result with two-space indentation
pub fn render_flow_module(
    template: &str,
    plan: &RewritePlan,
) -> Result<(String, RewriteSummary), PipelineError> {
    let mut doc = parse_document(template).map_err(PipelineError::at(Phase::Validation))?;
    let summary = rewrite_flow_module(&mut doc, plan)?;
    let content = to_pretty_json(&doc).map_err(PipelineError::at(Phase::Serialization))?;
    Ok((content, summary))
}
