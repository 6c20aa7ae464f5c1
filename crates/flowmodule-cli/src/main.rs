use anyhow::{bail, Context, Result};
use clap::Parser;
use flowmodule_cli::{init_tracing, Command};
use flowmodule_config::{DeployConfig, LogFormat};
use std::path::PathBuf;
use tracing::debug;

/// Rewrite Amazon Connect contact flow modules for a deployment
#[derive(Parser)]
#[command(name = "flowmodule")]
#[command(version)]
#[command(
    about = "Rewrite Amazon Connect contact flow modules for a deployment",
    long_about = None
)]
struct Cli {
    /// Path to configuration file (JSON, or TOML with a .toml extension)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Environment name; loads config.<ENV>.json from --config-dir
    #[arg(short, long, value_name = "ENV", global = true)]
    env: Option<String>,

    /// Directory holding the per-environment config files
    #[arg(long, value_name = "DIR", default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Log level: trace, debug, info, warn, error
    #[arg(short = 'v', long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,

    /// Log format: text or json
    #[arg(long, value_name = "FORMAT", global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = read_config(&cli)?;
    apply_cli_overrides(&mut config, &cli)?;

    // Validation logs warnings; install the subscriber first.
    init_tracing(&config.logging);
    config.validate().context("Invalid configuration")?;
    debug!("Resolved configuration:\n{}", config.to_redacted_json()?);

    cli.command.run(&config)
}

fn read_config(cli: &Cli) -> Result<DeployConfig> {
    match (&cli.config, &cli.env) {
        (Some(path), None) => DeployConfig::read_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        (None, Some(env_name)) => DeployConfig::read_for_env(&cli.config_dir, env_name),
        (Some(_), Some(_)) => bail!("--config and --env are mutually exclusive"),
        (None, None) => bail!(
            "No configuration given. Pass --env <ENV> to load config.<ENV>.json, or --config <FILE>"
        ),
    }
}

fn apply_cli_overrides(config: &mut DeployConfig, cli: &Cli) -> Result<()> {
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.logging.format = format
            .parse::<LogFormat>()
            .context("Invalid --log-format value")?;
    }
    Ok(())
}
