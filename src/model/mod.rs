// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Configuration data model
//!
//! Full configuration structs for the radio, module and channel domains,
//! each paired with a sparse `Edited*` mirror.

#[macro_use]
mod macros;

pub mod channel;
pub mod edit;
pub mod module;
pub mod radio;

pub use channel::{
    Channel, ChannelRole, ChannelSettings, EditedChannel, EditedChannelSettings,
    EditedModuleSettings, MeshChannel, ModuleSettings,
};
pub use edit::{is_untouched, Edit, Reconcile, StagedEdit};
pub use module::{EditedModuleConfig, ModuleConfig};
pub use radio::{EditedRadioConfig, RadioConfig};
