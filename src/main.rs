// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! meshcfg - reconcile staged mesh radio configuration
//!
//! Entry point for the meshcfg CLI application.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use meshcfg::cli::{Cli, Commands};
use meshcfg::config::Settings;

#[path = "main/commands.rs"]
mod commands;

use commands::{run_combine, run_inspect, run_settings_command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings_path = cli
        .settings
        .clone()
        .unwrap_or_else(Settings::default_path);
    let settings = Settings::load_from(&settings_path)?;

    init_tracing(&settings, cli.verbose);
    tracing::debug!(path = %settings_path.display(), "loaded settings");

    match cli.command {
        Commands::Combine(args) => run_combine(args, &settings, cli.format).await?,
        Commands::Inspect(args) => run_inspect(args, cli.format).await?,
        Commands::Settings(args) => {
            run_settings_command(args, settings, &settings_path, cli.format)?
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise the settings filter, raised by `-v`.
fn init_tracing(settings: &Settings, verbose: u8) {
    let mut env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(settings.effective_log_filter()))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let directive = match verbose {
        0 => None,
        1 => Some("meshcfg=debug"),
        _ => Some("meshcfg=trace"),
    };
    if let Some(directive) = directive {
        if let Ok(parsed) = directive.parse() {
            env_filter = env_filter.add_directive(parsed);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
