// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Scalar-domain merger for radio and module configuration

use crate::error::{MeshcfgError, Result};
use crate::model::{ModuleConfig, RadioConfig, Reconcile, StagedEdit};

use super::ConfigDomain;

/// A top-level configuration that is merged field by field
pub trait ScalarDomain: Reconcile {
    const DOMAIN: ConfigDomain;
}

impl ScalarDomain for RadioConfig {
    const DOMAIN: ConfigDomain = ConfigDomain::Radio;
}

impl ScalarDomain for ModuleConfig {
    const DOMAIN: ConfigDomain = ConfigDomain::Module;
}

/// Merge a sparse edit onto the current configuration.
///
/// Staged overrides replace the current value; untouched and inherited
/// fields keep it. Fails with [`MeshcfgError::PreconditionMissing`] when
/// there is no current configuration to merge onto.
pub fn merge_scalar_config<T: ScalarDomain>(current: Option<&T>, edited: &T::Edit) -> Result<T> {
    let current = current.ok_or(MeshcfgError::PreconditionMissing(T::DOMAIN))?;

    if !edited.has_overrides() {
        tracing::debug!(domain = %T::DOMAIN, "no staged overrides, using current config");
        return Ok(current.clone());
    }

    tracing::debug!(domain = %T::DOMAIN, "merging staged overrides");
    Ok(current.reconcile(edited))
}
