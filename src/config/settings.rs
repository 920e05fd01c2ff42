// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Settings management for meshcfg
//!
//! Handles loading and saving settings from ~/.meshcfg/settings.json

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::MeshcfgError;

mod io;
mod migration;
mod validation;

pub use validation::{LOG_FILTER_ENV, SETTABLE_KEYS};

/// Main settings structure, stored in ~/.meshcfg/settings.json
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Settings {
    /// Configuration file export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// File format used when exporting a configuration bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Toml,
}

impl ExportFormat {
    /// File extension without the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Toml => "toml",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = MeshcfgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "toml" => Ok(ExportFormat::Toml),
            other => Err(MeshcfgError::InvalidInput(format!(
                "Invalid export format '{}'. Valid formats: json, toml",
                other
            ))),
        }
    }
}

/// Configuration export settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportConfig {
    /// Directory exported bundles are written to (defaults to ~/.meshcfg/exports)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,

    /// Export file format
    #[serde(default)]
    pub format: ExportFormat,

    /// Pretty-print JSON exports
    #[serde(default = "default_true")]
    pub pretty: bool,

    /// File name used when the device has no long name
    #[serde(default = "default_file_name")]
    pub default_file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: None,
            format: ExportFormat::default(),
            pretty: true,
            default_file_name: default_file_name(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` filter directive, overridden by MESHCFG_LOG
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_file_name() -> String {
    "meshcfg-config".to_string()
}

fn default_log_filter() -> String {
    "warn".to_string()
}
