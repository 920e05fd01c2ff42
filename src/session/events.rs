// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Device notifications
//!
//! Events flow from the device transport into the [`DeviceSession`], which
//! applies them to its held state and fans them out to subscribers over a
//! tokio broadcast channel.
//!
//! [`DeviceSession`]: super::DeviceSession

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::reconcile::CurrentConfig;

/// Everything a device reports about itself that the session keeps
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeviceState {
    /// User-visible long name of the node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,
    #[serde(default)]
    pub config: CurrentConfig,
}

/// Notifications emitted by a connected device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeviceEvent {
    /// The device sent a fresh view of itself
    DeviceUpdate(DeviceState),
    /// The transport lost the device
    Disconnected { port_name: String },
    /// Result of the initial configuration handshake
    ConfigurationStatus {
        port_name: String,
        successful: bool,
        #[serde(default)]
        message: Option<String>,
    },
    /// The device scheduled a reboot
    Reboot { at: DateTime<Utc> },
}

impl DeviceEvent {
    /// Short event name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            DeviceEvent::DeviceUpdate(_) => "device_update",
            DeviceEvent::Disconnected { .. } => "device_disconnect",
            DeviceEvent::ConfigurationStatus { .. } => "configuration_status",
            DeviceEvent::Reboot { .. } => "reboot",
        }
    }

    /// Build a reboot event from a Unix timestamp in seconds
    pub fn reboot_at_unix(timestamp_secs: i64) -> Option<Self> {
        DateTime::from_timestamp(timestamp_secs, 0).map(|at| DeviceEvent::Reboot { at })
    }
}
