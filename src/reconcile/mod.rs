// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Configuration reconciliation engine
//!
//! Merges a device's current configuration with locally staged edits into a
//! single outgoing [`CombinedConfigBundle`]:
//! - `scalar`: radio and module domains, field by field
//! - `channel`: channel slots, in ascending slot order
//! - `adapter`: form-shaped channel edits into canonical channel edits
//! - `bundle`: inclusion flags and the composing [`combine`]
//!
//! Everything here is pure: inputs are borrowed, outputs are new values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MeshcfgError;

pub mod adapter;
pub mod bundle;
pub mod channel;
pub mod scalar;

pub use adapter::{adapt_channel_edit, ChannelEditForm};
pub use bundle::{combine, CombinedConfigBundle, CurrentConfig, StagedEdits};
pub use channel::{merge_channel_config, ChannelEditState};
pub use scalar::{merge_scalar_config, ScalarDomain};

/// One independently staged configuration category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigDomain {
    Radio,
    Module,
    Channel,
}

impl ConfigDomain {
    /// All domains in bundle order
    pub const ALL: [ConfigDomain; 3] = [
        ConfigDomain::Radio,
        ConfigDomain::Module,
        ConfigDomain::Channel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigDomain::Radio => "radio",
            ConfigDomain::Module => "module",
            ConfigDomain::Channel => "channel",
        }
    }
}

impl fmt::Display for ConfigDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigDomain {
    type Err = MeshcfgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "radio" => Ok(ConfigDomain::Radio),
            "module" => Ok(ConfigDomain::Module),
            "channel" | "channels" => Ok(ConfigDomain::Channel),
            other => Err(MeshcfgError::InvalidInput(format!(
                "Unknown configuration domain '{}'. Valid domains: radio, module, channel",
                other
            ))),
        }
    }
}

/// Which domains an operation acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InclusionFlags {
    pub radio: bool,
    pub module: bool,
    pub channel: bool,
}

impl InclusionFlags {
    /// Every domain included
    pub fn all() -> Self {
        Self {
            radio: true,
            module: true,
            channel: true,
        }
    }

    pub fn from_domains(domains: &[ConfigDomain]) -> Self {
        let mut flags = Self::default();
        for domain in domains {
            flags.insert(*domain);
        }
        flags
    }

    pub fn insert(&mut self, domain: ConfigDomain) {
        match domain {
            ConfigDomain::Radio => self.radio = true,
            ConfigDomain::Module => self.module = true,
            ConfigDomain::Channel => self.channel = true,
        }
    }

    pub fn contains(&self, domain: ConfigDomain) -> bool {
        match domain {
            ConfigDomain::Radio => self.radio,
            ConfigDomain::Module => self.module,
            ConfigDomain::Channel => self.channel,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.radio || self.module || self.channel)
    }

    /// Included domains in radio, module, channel order
    pub fn domains(&self) -> impl Iterator<Item = ConfigDomain> + '_ {
        ConfigDomain::ALL
            .into_iter()
            .filter(move |domain| self.contains(*domain))
    }

    /// Included domain names joined with `-`, used in export file names
    pub fn file_tag(&self) -> String {
        self.domains()
            .map(|domain| domain.as_str())
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl FromIterator<ConfigDomain> for InclusionFlags {
    fn from_iter<I: IntoIterator<Item = ConfigDomain>>(iter: I) -> Self {
        let mut flags = Self::default();
        for domain in iter {
            flags.insert(domain);
        }
        flags
    }
}
