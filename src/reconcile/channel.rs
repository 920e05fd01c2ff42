// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Collection-domain merger for channel slots

use std::collections::BTreeMap;

use crate::error::{MeshcfgError, Result};
use crate::model::{Channel, MeshChannel, Reconcile};

use super::adapter::{adapt_channel_edit, ChannelEditForm};
use super::ConfigDomain;

/// Staged channel forms by slot index; `None` drops the slot's staged edits
pub type ChannelEditState = BTreeMap<u32, Option<ChannelEditForm>>;

/// Merge staged channel edits onto the device's channel slots.
///
/// The result holds one [`Channel`] per current slot, in ascending slot
/// order. Slots without a staged form are carried through unchanged; staged
/// slots the device does not have are ignored. Any form that fails to adapt
/// aborts the whole merge.
pub fn merge_channel_config(
    current: Option<&BTreeMap<u32, MeshChannel>>,
    edited: &ChannelEditState,
) -> Result<Vec<Channel>> {
    let current = current.ok_or(MeshcfgError::PreconditionMissing(ConfigDomain::Channel))?;

    for index in edited.keys().filter(|index| !current.contains_key(*index)) {
        tracing::debug!(index, "ignoring staged edit for channel slot missing on device");
    }

    current
        .iter()
        .map(|(index, slot)| {
            let form = edited.get(index).and_then(Option::as_ref);
            match adapt_channel_edit(form)? {
                Some(edit) => {
                    tracing::debug!(index, "merging staged channel edit");
                    Ok(slot.config.reconcile(&edit))
                }
                None => Ok(slot.config.clone()),
            }
        })
        .collect()
}
