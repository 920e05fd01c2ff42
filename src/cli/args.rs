// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! CLI argument definitions using Clap
//!
//! Defines all command-line arguments and subcommands for meshcfg.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::reconcile::{ConfigDomain, InclusionFlags};

/// meshcfg - reconcile staged mesh radio configuration
#[derive(Parser, Debug)]
#[command(name = "meshcfg")]
#[command(version, about = "Reconcile staged mesh radio configuration")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Settings file path (defaults to ~/.meshcfg/settings.json)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merge staged edits onto a device snapshot and print or save the bundle
    Combine(CombineArgs),

    /// Summarize an exported configuration bundle
    Inspect(InspectArgs),

    /// Manage meshcfg settings
    #[command(alias = "config")]
    Settings(SettingsArgs),
}

/// Arguments for the combine subcommand
#[derive(clap::Args, Debug)]
pub struct CombineArgs {
    /// Device snapshot file (JSON)
    #[arg(short, long)]
    pub current: PathBuf,

    /// Staged edits file (JSON)
    #[arg(short, long)]
    pub edits: PathBuf,

    /// Domains to include (radio, module, channel)
    #[arg(short, long, value_delimiter = ',', num_args = 1.., required = true)]
    pub include: Vec<ConfigDomain>,

    /// Write the bundle here instead of printing it (.toml selects TOML)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

impl CombineArgs {
    pub fn flags(&self) -> InclusionFlags {
        self.include.iter().copied().collect()
    }
}

/// Arguments for the inspect subcommand
#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    /// Bundle file to read (.toml or JSON)
    pub path: PathBuf,
}

/// Arguments for the settings subcommand
#[derive(clap::Args, Debug)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: Option<SettingsCommands>,
}

/// Settings subcommands
#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show current settings
    Show,

    /// Set a settings value
    Set {
        /// Settings key (e.g., "export.format", "logging.filter")
        key: String,

        /// Value to set
        value: String,
    },

    /// Get a settings value
    Get {
        /// Settings key
        key: String,
    },

    /// Reset settings to defaults
    Reset,

    /// Print the settings file path
    Path,
}

/// Output format for command results
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Text,

    /// JSON output
    Json,
}
