// flowmodule - Command line front end for the flow module rewriter
//
// Subcommands:
// - render:   rewrite a contact flow module template for the configured deployment
// - snippets: write the Lambda configuration modules derived from the config
// - stage:    prepare a staging copy of the Lambda sources with snippets applied

use anyhow::Result;
use clap::Subcommand;
use flowmodule_config::DeployConfig;

mod init;
pub mod render;
pub mod snippets;
pub mod staging;

pub use init::init_tracing;

#[derive(Subcommand)]
pub enum Command {
    /// Rewrite a flow module template into a deployable module
    Render(render::RenderArgs),

    /// Write the generated Lambda configuration modules
    Snippets(snippets::SnippetsArgs),

    /// Copy the Lambda sources into a fresh staging directory
    Stage(staging::StageArgs),
}

impl Command {
    pub fn run(self, config: &DeployConfig) -> Result<()> {
        match self {
            Command::Render(args) => render::run(args, config),
            Command::Snippets(args) => snippets::run(args, config),
            Command::Stage(args) => staging::run(args, config),
        }
    }
}
