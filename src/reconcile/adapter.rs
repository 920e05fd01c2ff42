// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Edit-to-canonical adapter for channel forms
//!
//! Channel forms are flat and carry the key as base64 text. The merger works
//! on [`EditedChannel`], which mirrors [`Channel`] exactly.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::{MeshcfgError, Result};
use crate::model::{
    is_untouched, Channel, ChannelRole, Edit, EditedChannel, EditedChannelSettings,
    EditedModuleSettings,
};

/// Key sizes the firmware accepts: none, a default-key index, AES-128, AES-256
const VALID_PSK_LENGTHS: [usize; 4] = [0, 1, 16, 32];

/// A channel edit as produced by a settings form
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ChannelEditForm {
    #[serde(skip_serializing_if = "is_untouched")]
    pub role: Edit<ChannelRole>,
    #[serde(skip_serializing_if = "is_untouched")]
    pub name: Edit<String>,
    /// Base64 encoded pre-shared key
    #[serde(skip_serializing_if = "is_untouched")]
    pub psk: Edit<String>,
    #[serde(skip_serializing_if = "is_untouched")]
    pub channel_num: Edit<u32>,
    #[serde(skip_serializing_if = "is_untouched")]
    pub id: Edit<u32>,
    #[serde(skip_serializing_if = "is_untouched")]
    pub uplink_enabled: Edit<bool>,
    #[serde(skip_serializing_if = "is_untouched")]
    pub downlink_enabled: Edit<bool>,
    #[serde(skip_serializing_if = "is_untouched")]
    pub position_precision: Edit<u32>,
    #[serde(skip_serializing_if = "is_untouched")]
    pub is_client_muted: Edit<bool>,
}

impl ChannelEditForm {
    /// A form pre-filled with every value of `channel`
    pub fn from_channel(channel: &Channel) -> Self {
        let settings = &channel.settings;
        Self {
            role: Edit::Set(channel.role),
            name: Edit::Set(settings.name.clone()),
            psk: Edit::Set(BASE64_STANDARD.encode(&settings.psk)),
            channel_num: Edit::Set(settings.channel_num),
            id: Edit::Set(settings.id),
            uplink_enabled: Edit::Set(settings.uplink_enabled),
            downlink_enabled: Edit::Set(settings.downlink_enabled),
            position_precision: Edit::Set(settings.module_settings.position_precision),
            is_client_muted: Edit::Set(settings.module_settings.is_client_muted),
        }
    }
}

/// Reshape a channel form into a canonical channel edit.
///
/// `None` passes through. The unset/inherit/set state of every field is
/// preserved; only the key changes representation.
pub fn adapt_channel_edit(form: Option<&ChannelEditForm>) -> Result<Option<EditedChannel>> {
    let Some(form) = form else {
        return Ok(None);
    };

    let psk = form.psk.clone().try_map(|text| decode_psk(&text))?;

    Ok(Some(EditedChannel {
        role: form.role.clone(),
        settings: EditedChannelSettings {
            channel_num: form.channel_num.clone(),
            psk,
            name: form.name.clone(),
            id: form.id.clone(),
            uplink_enabled: form.uplink_enabled.clone(),
            downlink_enabled: form.downlink_enabled.clone(),
            module_settings: EditedModuleSettings {
                position_precision: form.position_precision.clone(),
                is_client_muted: form.is_client_muted.clone(),
            },
        },
    }))
}

fn decode_psk(text: &str) -> Result<Vec<u8>> {
    let key = BASE64_STANDARD
        .decode(text.trim())
        .map_err(|e| MeshcfgError::AdaptationShapeMismatch {
            field: "psk",
            reason: e.to_string(),
        })?;

    if !VALID_PSK_LENGTHS.contains(&key.len()) {
        return Err(MeshcfgError::AdaptationShapeMismatch {
            field: "psk",
            reason: format!("key is {} bytes, expected 0, 1, 16 or 32", key.len()),
        });
    }

    Ok(key)
}
