// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::path::PathBuf;

use crate::error::{MeshcfgError, Result};

use super::{ExportFormat, Settings};

/// Environment variable that overrides `logging.filter`
pub const LOG_FILTER_ENV: &str = "MESHCFG_LOG";

/// Keys accepted by [`Settings::set_key`]
pub const SETTABLE_KEYS: &[&str] = &[
    "export.directory",
    "export.format",
    "export.pretty",
    "export.default_file_name",
    "logging.filter",
];

impl Settings {
    /// Get the log filter, checking env var first.
    pub fn effective_log_filter(&self) -> String {
        std::env::var(LOG_FILTER_ENV)
            .ok()
            .filter(|filter| !filter.trim().is_empty())
            .unwrap_or_else(|| self.logging.filter.clone())
    }

    /// Directory exports are written to.
    pub fn export_directory(&self) -> PathBuf {
        self.export
            .directory
            .clone()
            .unwrap_or_else(Self::exports_dir)
    }

    /// Set a single dotted key from its string form.
    pub fn set_key(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "export.directory" => {
                self.export.directory = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            "export.format" => {
                self.export.format = value.parse::<ExportFormat>()?;
            }
            "export.pretty" => {
                self.export.pretty = value.parse::<bool>().map_err(|_| {
                    MeshcfgError::InvalidInput(format!(
                        "Invalid value '{}' for export.pretty. Expected true or false",
                        value
                    ))
                })?;
            }
            "export.default_file_name" => {
                if value.trim().is_empty() {
                    return Err(MeshcfgError::InvalidInput(
                        "export.default_file_name cannot be empty".to_string(),
                    ));
                }
                self.export.default_file_name = value.to_string();
            }
            "logging.filter" => {
                tracing_subscriber::EnvFilter::try_new(value).map_err(|e| {
                    MeshcfgError::InvalidInput(format!("Invalid log filter '{}': {}", value, e))
                })?;
                self.logging.filter = value.to_string();
            }
            other => {
                return Err(MeshcfgError::Config(format!(
                    "Unknown setting '{}'. Valid keys: {}",
                    other,
                    SETTABLE_KEYS.join(", ")
                )));
            }
        }
        Ok(())
    }
}
