// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! meshcfg - configuration reconciliation for mesh radio devices.
//!
//! This crate exposes the engine used by the `meshcfg` CLI (`src/main.rs`)
//! and by any host application that stages configuration edits for a
//! connected node.
//!
//! Architecture highlights:
//! - `model`: radio, module and channel configuration types with their sparse edit mirrors
//! - `reconcile`: pure mergers for each domain and the bundle orchestrator
//! - `session`: the connected device's latest snapshot and its event stream
//! - `workflow`: upload, export, import and commit of combined bundles
//! - `config`, `cli`: user settings and command-line surface

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod reconcile;
pub mod session;
pub mod workflow;

pub use error::{MeshcfgError, Result};
