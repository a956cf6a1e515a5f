use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use codetime_cli::commands::{analyze, init};
use codetime_cli::{Cli, Config, DEFAULT_CONFIG_FILE};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let mut stdout = std::io::stdout().lock();

    if cli.init {
        let path = cli
            .config
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let project = init::project_from_flags(
            cli.user.as_deref(),
            cli.repo.as_deref(),
            cli.mode.as_deref(),
            cli.all,
        )?;
        return init::run(&mut stdout, path, &project);
    }

    let mut config =
        Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply_to(&mut config);
    tracing::debug!(?config, "loaded configuration");

    analyze::run(
        &mut stdout,
        &config,
        analyze::RunFlags {
            seed: cli.seed,
            json: cli.json,
            no_report: cli.no_report,
        },
    )
}
