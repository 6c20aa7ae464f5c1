//! Staging directory preparation
//!
//! The staging directory is rebuilt from scratch on every run: the Lambda
//! source tree is copied to `<staging>/lambdas` and the generated snippets
//! are written into the copy, leaving the sources untouched.

use anyhow::{bail, Context, Result};
use clap::Args;
use flowmodule_config::DeployConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::snippets;

#[derive(Args)]
pub struct StageArgs {
    /// Lambda source tree to stage
    #[arg(long, value_name = "DIR", default_value = "lambdas")]
    pub source: PathBuf,

    /// Staging directory (removed and recreated)
    #[arg(long, value_name = "DIR", default_value = "staging")]
    pub staging_dir: PathBuf,
}

pub fn run(args: StageArgs, config: &DeployConfig) -> Result<()> {
    let staged = prepare_staging_directory(&args.source, &args.staging_dir, config)?;
    info!(staged = %staged.display(), "Staging directory ready");
    Ok(())
}

/// Recreate `staging_dir`, copy `source` into `staging_dir/lambdas`, and write
/// the snippets there. Returns the staged Lambda root.
pub fn prepare_staging_directory(
    source: &Path,
    staging_dir: &Path,
    config: &DeployConfig,
) -> Result<PathBuf> {
    if !source.is_dir() {
        bail!("Lambda source directory not found: {}", source.display());
    }

    let resolved_source = resolve_path(source)?;
    let resolved_staging = resolve_path(staging_dir)?;
    if resolved_staging.starts_with(&resolved_source)
        || resolved_source.starts_with(&resolved_staging)
    {
        bail!(
            "Staging directory {} overlaps the Lambda source directory {}",
            staging_dir.display(),
            source.display()
        );
    }

    if staging_dir.exists() {
        fs::remove_dir_all(staging_dir).with_context(|| {
            format!("Failed to remove staging directory {}", staging_dir.display())
        })?;
    }

    let lambdas_dir = staging_dir.join("lambdas");
    fs::create_dir_all(&lambdas_dir)
        .with_context(|| format!("Failed to create {}", lambdas_dir.display()))?;

    let copied = copy_tree(source, &lambdas_dir)?;
    debug!(files = copied, source = %source.display(), "Copied Lambda sources");

    snippets::write_snippets(&lambdas_dir, config)?;
    Ok(lambdas_dir)
}

/// Absolute form of `path` with symlinks resolved. Missing trailing
/// components are appended to the nearest existing ancestor.
fn resolve_path(path: &Path) -> Result<PathBuf> {
    let mut existing = path;
    let mut missing = Vec::new();
    while !existing.exists() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_owned());
                existing = parent;
            }
            _ => break,
        }
    }

    let base = if existing.as_os_str().is_empty() {
        Path::new(".")
    } else {
        existing
    };
    let mut resolved = fs::canonicalize(base)
        .with_context(|| format!("Failed to resolve path {}", path.display()))?;
    resolved.extend(missing.iter().rev());
    Ok(resolved)
}

fn copy_tree(source: &Path, destination: &Path) -> Result<usize> {
    let mut copied = 0;
    for entry in WalkDir::new(source).min_depth(1).follow_links(true) {
        let entry = entry.with_context(|| format!("Failed to walk {}", source.display()))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .context("Walked entry outside the source tree")?;
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create {}", target.display()))?;
        } else {
            fs::copy(entry.path(), &target).with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    entry.path().display(),
                    target.display()
                )
            })?;
            copied += 1;
        }
    }
    Ok(copied)
}
