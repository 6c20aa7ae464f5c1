//! Lambda configuration modules generated from the deployment config

use anyhow::{Context, Result};
use clap::Args;
use flowmodule_config::DeployConfig;
use flowmodule_core::SsmlConversionRule;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const ATTRIBUTES_TEMPLATE: &str = include_str!("../templates/attributesToInputVariables.mjs.tmpl");
const SSML_TEMPLATE: &str = include_str!("../templates/ssmlConversions.mjs.tmpl");

/// Location of the attribute map inside a Lambda source tree
pub const ATTRIBUTES_MODULE_PATH: &str = "engage/attributesToInputVariables.mjs";
/// Location of the SSML rules inside a Lambda source tree
pub const SSML_MODULE_PATH: &str = "pullaction/ssmlConversions.mjs";

#[derive(Args)]
pub struct SnippetsArgs {
    /// Lambda source root to write the modules into
    #[arg(long, value_name = "DIR", default_value = "lambdas")]
    pub out_dir: PathBuf,
}

pub fn run(args: SnippetsArgs, config: &DeployConfig) -> Result<()> {
    write_snippets(&args.out_dir, config)?;
    Ok(())
}

/// Write both modules below `lambdas_dir`, returning the paths written
pub fn write_snippets(lambdas_dir: &Path, config: &DeployConfig) -> Result<Vec<PathBuf>> {
    let outputs = [
        (
            ATTRIBUTES_MODULE_PATH,
            render_attribute_map(&config.attributes_to_input_variables_map)?,
        ),
        (
            SSML_MODULE_PATH,
            render_ssml_conversions(&config.ssml_conversions)?,
        ),
    ];

    let mut written = Vec::with_capacity(outputs.len());
    for (relative, content) in outputs {
        let path = lambdas_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "Wrote Lambda snippet");
        written.push(path);
    }
    Ok(written)
}

/// `export default { "<attribute>": "<inputVariable>", ... }`
pub fn render_attribute_map(map: &BTreeMap<String, String>) -> Result<String> {
    let mut entries = String::new();
    for (attribute, variable) in map {
        entries.push_str(&format!(
            "    {}: {},\n",
            js_string(attribute)?,
            js_string(variable)?
        ));
    }
    Ok(ATTRIBUTES_TEMPLATE.replace("{{ENTRIES}}", &entries))
}

/// `export default [ { searchFor: "...", replaceWith: "..." }, ... ]`
pub fn render_ssml_conversions(rules: &[SsmlConversionRule]) -> Result<String> {
    let mut entries = String::new();
    for rule in rules {
        entries.push_str(&format!(
            "    {{\n        searchFor: {},\n        replaceWith: {},\n    }},\n",
            js_string(&rule.search_for)?,
            js_string(&rule.replace_with)?
        ));
    }
    Ok(SSML_TEMPLATE.replace("{{ENTRIES}}", &entries))
}

// JSON string literals are valid JavaScript string literals.
fn js_string(value: &str) -> Result<String> {
    serde_json::to_string(value).context("Failed to encode string literal")
}
