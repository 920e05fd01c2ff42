// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Channel configuration
//!
//! Channels are addressed by slot index. The slot index always comes from
//! the device, so [`EditedChannel`] has no index of its own.

use serde::{Deserialize, Serialize};

use super::{Edit, Reconcile, StagedEdit};

/// How a channel slot is used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelRole {
    #[default]
    Disabled,
    Primary,
    Secondary,
}

config_section! {
    /// Per-channel module behaviour
    pub struct ModuleSettings / EditedModuleSettings {
        /// Bits of position precision shared on this channel
        position_precision: u32,
        is_client_muted: bool,
    }
}

config_section! {
    /// Channel parameters shared between nodes
    pub struct ChannelSettings / EditedChannelSettings {
        channel_num: u32,
        /// Pre-shared key bytes. Replaced as a whole by an edit.
        psk: Vec<u8>,
        name: String,
        id: u32,
        uplink_enabled: bool,
        downlink_enabled: bool,
    }
    sections {
        module_settings: ModuleSettings,
    }
}

/// Canonical channel configuration for one slot
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Channel {
    /// Slot index on the device
    pub index: u32,
    pub role: ChannelRole,
    pub settings: ChannelSettings,
}

/// Sparse staged edits for a [`Channel`]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct EditedChannel {
    #[serde(skip_serializing_if = "crate::model::is_untouched")]
    pub role: Edit<ChannelRole>,
    #[serde(skip_serializing_if = "crate::model::is_untouched")]
    pub settings: EditedChannelSettings,
}

impl Reconcile for Channel {
    type Edit = EditedChannel;

    fn reconcile(&self, edit: &EditedChannel) -> Self {
        Self {
            index: self.index,
            role: edit.role.resolve(&self.role),
            settings: self.settings.reconcile(&edit.settings),
        }
    }
}

impl StagedEdit for EditedChannel {
    fn is_untouched(&self) -> bool {
        self.role.is_untouched() && self.settings.is_untouched()
    }

    fn has_overrides(&self) -> bool {
        self.role.has_overrides() || self.settings.has_overrides()
    }
}

/// A channel slot as held by the device session
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MeshChannel {
    pub config: Channel,
    /// Unix seconds of the last packet seen on this channel
    pub last_interaction: u64,
}

impl MeshChannel {
    pub fn new(config: Channel) -> Self {
        Self {
            config,
            last_interaction: 0,
        }
    }
}
