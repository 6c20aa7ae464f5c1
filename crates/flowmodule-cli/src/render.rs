//! Flow module rendering

use anyhow::{Context, Result};
use clap::Args;
use dialoguer::Confirm;
use flowmodule_config::DeployConfig;
use flowmodule_core::{render_flow_module, ResourceManifest, RewritePlan, RewriteSummary};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args)]
pub struct RenderArgs {
    /// Flow module template (Connect module content JSON)
    #[arg(long, value_name = "FILE")]
    pub template: PathBuf,

    /// Resource manifest mapping action identifiers to prompts and Lambda functions
    #[arg(long, value_name = "FILE")]
    pub resources: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Overwrite existing file without asking
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: RenderArgs, config: &DeployConfig) -> Result<()> {
    let manifest_json = fs::read_to_string(&args.resources).with_context(|| {
        format!("Failed to read resource manifest: {}", args.resources.display())
    })?;
    let manifest = ResourceManifest::from_json(&manifest_json)
        .with_context(|| format!("Invalid resource manifest: {}", args.resources.display()))?;

    let (content, summary) = render_file(&args.template, manifest, config)?;

    match &args.output {
        Some(path) => {
            if path.exists() && !args.force {
                let overwrite = Confirm::new()
                    .with_prompt(format!("{} already exists. Overwrite?", path.display()))
                    .default(false)
                    .interact()?;
                if !overwrite {
                    info!("Aborted.");
                    return Ok(());
                }
            }
            fs::write(path, &content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(
                output = %path.display(),
                name = %config.object_name("contact-flow-module"),
                "Wrote flow module"
            );
        }
        None => println!("{}", content),
    }

    log_summary(&summary);
    Ok(())
}

/// Build the rewrite plan for `config` from a resource manifest
pub fn build_plan(config: &DeployConfig, manifest: ResourceManifest) -> Result<RewritePlan> {
    let instance = config.connect_instance()?;
    let tables = manifest
        .into_tables(&instance, &config.region, &config.account_id)
        .context("Failed to build resource lookup tables")?;

    Ok(RewritePlan {
        region: config.region.clone(),
        account_id: config.account_id.clone(),
        tables,
        output_variables: config.output_variables_to_attributes_map.clone(),
        ssml_rules: config.ssml_conversions.clone(),
        speak_convention: config.speak_action.clone(),
    })
}

/// Read and rewrite the template at `template`
pub fn render_file(
    template: &Path,
    manifest: ResourceManifest,
    config: &DeployConfig,
) -> Result<(String, RewriteSummary)> {
    let source = fs::read_to_string(template)
        .with_context(|| format!("Failed to read flow module template: {}", template.display()))?;
    let plan = build_plan(config, manifest)?;
    let rendered = render_flow_module(&source, &plan)
        .with_context(|| format!("Failed to render {}", template.display()))?;
    Ok(rendered)
}

fn log_summary(summary: &RewriteSummary) {
    info!(
        prompts = summary.resources.prompts_bound,
        lambdas = summary.resources.lambdas_bound,
        arns = summary.resources.arns_rewritten,
        attributes = summary.attributes_injected,
        ssml_actions = summary.ssml_actions_converted.unwrap_or(0),
        "Render complete"
    );
}
