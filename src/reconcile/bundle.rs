// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Composition of the three merged domains into one outgoing bundle

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{
    Channel, EditedModuleConfig, EditedRadioConfig, MeshChannel, ModuleConfig, RadioConfig,
    StagedEdit,
};

use super::adapter::ChannelEditForm;
use super::channel::{merge_channel_config, ChannelEditState};
use super::scalar::merge_scalar_config;
use super::{ConfigDomain, InclusionFlags};

/// The single payload handed to a device write or a file export.
///
/// A `None` domain was not requested by the operation; it does not mean the
/// domain is empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CombinedConfigBundle {
    pub radio: Option<RadioConfig>,
    pub module: Option<ModuleConfig>,
    pub channels: Option<Vec<Channel>>,
}

impl CombinedConfigBundle {
    /// Domains carried by this bundle
    pub fn included_domains(&self) -> InclusionFlags {
        InclusionFlags {
            radio: self.radio.is_some(),
            module: self.module.is_some(),
            channel: self.channels.is_some(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.included_domains().is_empty()
    }
}

/// Last configuration known to reflect the device
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CurrentConfig {
    pub radio: Option<RadioConfig>,
    pub module: Option<ModuleConfig>,
    pub channels: Option<BTreeMap<u32, MeshChannel>>,
}

/// Locally staged edits for all three domains
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StagedEdits {
    pub radio: EditedRadioConfig,
    pub module: EditedModuleConfig,
    pub channels: ChannelEditState,
}

impl StagedEdits {
    /// Stage a channel form for `index`; `None` drops the slot's edits
    pub fn stage_channel(&mut self, index: u32, form: Option<ChannelEditForm>) {
        self.channels.insert(index, form);
    }

    /// Clear the flagged domains, keeping anything staged after `sent` was taken.
    ///
    /// Radio and module edits are dropped only if they still equal what was
    /// sent. Channel slots are compared one by one, so a slot edited in the
    /// meantime keeps its newer form.
    pub fn clear_sent(&mut self, flags: InclusionFlags, sent: &StagedEdits) {
        if flags.radio && self.radio == sent.radio {
            self.radio = EditedRadioConfig::default();
        }
        if flags.module && self.module == sent.module {
            self.module = EditedModuleConfig::default();
        }
        if flags.channel {
            self.channels
                .retain(|index, form| sent.channels.get(index) != Some(&*form));
        }
    }

    /// Whether anything is staged for `domain`
    pub fn has_edits(&self, domain: ConfigDomain) -> bool {
        match domain {
            ConfigDomain::Radio => !self.radio.is_untouched(),
            ConfigDomain::Module => !self.module.is_untouched(),
            ConfigDomain::Channel => !self.channels.is_empty(),
        }
    }

    pub fn is_empty(&self) -> bool {
        !ConfigDomain::ALL
            .into_iter()
            .any(|domain| self.has_edits(domain))
    }
}

/// Merge every flagged domain and assemble the outgoing bundle.
///
/// Unflagged domains stay `None` whatever data exists for them. The first
/// failing merge aborts the call, so a bundle is either complete or not
/// produced at all.
pub fn combine(
    flags: InclusionFlags,
    current: &CurrentConfig,
    edited: &StagedEdits,
) -> Result<CombinedConfigBundle> {
    let mut bundle = CombinedConfigBundle::default();

    if flags.radio {
        bundle.radio = Some(merge_scalar_config(current.radio.as_ref(), &edited.radio)?);
    }

    if flags.module {
        bundle.module = Some(merge_scalar_config(current.module.as_ref(), &edited.module)?);
    }

    if flags.channel {
        bundle.channels = Some(merge_channel_config(
            current.channels.as_ref(),
            &edited.channels,
        )?);
    }

    tracing::debug!(domains = %flags.file_tag(), "combined configuration bundle");
    Ok(bundle)
}
