//! Trellis - a static template expander producing preview and carrier documents.

mod build;
mod cli;
mod config;
mod data;
mod init;
mod logger;
mod serve;
mod template;
mod utils;
mod watch;

use anyhow::{Result, bail};
use build::build_project;
use clap::Parser;
use cli::{Cli, Commands};
use config::{ProjectConfig, cfg, init_config};
use init::new_project;
use serve::serve_project;
use watch::watch_for_changes_blocking;

fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));
    init_config(load_config(cli)?);

    match &cli.command {
        Commands::Init { name } => new_project(&cfg(), name.is_some()),
        Commands::Build { .. } => build_project(&cfg()).map(|_| ()),
        Commands::Watch { .. } => {
            build_project(&cfg())?;
            watch_for_changes_blocking()
        }
        Commands::Serve { .. } => {
            build_project(&cfg())?;
            serve_project()
        }
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &'static Cli) -> Result<ProjectConfig> {
    let config = ProjectConfig::load(cli)?;

    // Validate config state based on command
    let config_exists = config.config_path.exists();
    match (cli.is_init(), config_exists) {
        (true, true) => {
            bail!("Config file already exists. Remove it manually or init in a different path.")
        }
        (false, false) => bail!("Config file not found."),
        _ => {}
    }

    if !cli.is_init() {
        config.validate()?;
    }

    Ok(config)
}
