// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Error types for meshcfg
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

use crate::reconcile::ConfigDomain;

/// Main error type for meshcfg operations
#[derive(Error, Debug)]
pub enum MeshcfgError {
    /// A merge was requested for a domain whose current snapshot is absent
    #[error("Current {0} configuration is not available")]
    PreconditionMissing(ConfigDomain),

    /// A channel edit form could not be reshaped into a channel edit
    #[error("Channel edit field `{field}` does not match the channel shape: {reason}")]
    AdaptationShapeMismatch { field: &'static str, reason: String },

    /// The requested operation includes no configuration domain
    #[error("No configuration domains included")]
    NoDomainsIncluded,

    /// No device is connected to the session
    #[error("No active device port")]
    NoActiveDevice,

    /// Another apply operation is still running for the device
    #[error("Operation already in progress: {0}")]
    OperationInProgress(String),

    /// Device write-back errors
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Errors reported by a device link while writing configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The device went away before the write completed
    #[error("Device disconnected")]
    Disconnected,

    /// The device refused the configuration
    #[error("Configuration rejected by device: {0}")]
    Rejected(String),

    /// Timeout waiting for the device to acknowledge
    #[error("Device write timed out")]
    Timeout,

    /// Transport-level failure
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Result type alias for meshcfg operations
pub type Result<T> = std::result::Result<T, MeshcfgError>;

impl From<toml::de::Error> for MeshcfgError {
    fn from(err: toml::de::Error) -> Self {
        MeshcfgError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for MeshcfgError {
    fn from(err: toml::ser::Error) -> Self {
        MeshcfgError::Toml(err.to_string())
    }
}
