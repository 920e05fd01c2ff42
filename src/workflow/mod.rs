// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Apply workflows
//!
//! A [`ConfigWorkflow`] drives the operations that take staged edits out of
//! the application: writing a combined bundle to the device, exporting it to
//! a file, loading a file back onto the device, or both at once. The merge
//! engine stays pure; every side effect happens here.
//!
//! At most one operation runs at a time per workflow. Staged edits for the
//! included domains are dropped only once the external step has succeeded,
//! and only the edits that went into the bundle.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{DeviceError, MeshcfgError, Result};
use crate::reconcile::{combine, CombinedConfigBundle, InclusionFlags, StagedEdits};
use crate::session::DeviceSession;

pub mod request;
pub mod store;

pub use request::{
    RequestState, RequestStatus, RequestTracker, COMMIT_CONFIG, LOAD_CONFIG_FROM_FILE,
    SAVE_CONFIG_TO_FILE, UPLOAD_CONFIG_TO_DEVICE,
};
pub use store::FileConfigStore;

/// Write-back path to a physical device
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceLink: Send + Sync {
    /// Send a bundle to the device on `port_name`
    async fn write_config(
        &self,
        port_name: &str,
        bundle: &CombinedConfigBundle,
    ) -> std::result::Result<(), DeviceError>;
}

/// Persistent storage for exported bundles
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Persist a bundle, returning where it was written
    async fn export(
        &self,
        bundle: &CombinedConfigBundle,
        starting_file_name: Option<&str>,
    ) -> Result<PathBuf>;

    /// Read a previously exported bundle
    async fn import(&self, path: &Path) -> Result<CombinedConfigBundle>;
}

/// Apply operations for one device session
pub struct ConfigWorkflow<L, S> {
    session: Arc<DeviceSession>,
    link: L,
    store: S,
    staged: Mutex<StagedEdits>,
    in_flight: Mutex<()>,
    requests: RequestTracker,
}

impl<L: DeviceLink, S: ConfigStore> ConfigWorkflow<L, S> {
    pub fn new(session: Arc<DeviceSession>, link: L, store: S) -> Self {
        Self {
            session,
            link,
            store,
            staged: Mutex::new(StagedEdits::default()),
            in_flight: Mutex::new(()),
            requests: RequestTracker::new(),
        }
    }

    /// Start from already staged edits
    pub fn with_staged(mut self, staged: StagedEdits) -> Self {
        self.staged = Mutex::new(staged);
        self
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn session(&self) -> &Arc<DeviceSession> {
        &self.session
    }

    pub fn requests(&self) -> &RequestTracker {
        &self.requests
    }

    /// Copy of the staged edits
    pub async fn staged(&self) -> StagedEdits {
        self.staged.lock().await.clone()
    }

    /// Change staged edits in place
    pub async fn stage<F>(&self, f: F)
    where
        F: FnOnce(&mut StagedEdits),
    {
        f(&mut *self.staged.lock().await);
    }

    /// Merge the flagged domains and write them to the device
    pub async fn upload(&self, flags: InclusionFlags) -> Result<()> {
        self.run(UPLOAD_CONFIG_TO_DEVICE, async {
            Self::require_domains(flags)?;
            let port = self.active_port().await?;
            let (bundle, sent) = self.combined(flags).await?;
            self.write(&port, &bundle).await?;
            self.staged.lock().await.clear_sent(flags, &sent);
            Ok(())
        })
        .await
    }

    /// Merge the flagged domains and export them to the store
    pub async fn save_to_file(&self, flags: InclusionFlags) -> Result<PathBuf> {
        self.run(SAVE_CONFIG_TO_FILE, async {
            Self::require_domains(flags)?;
            let (bundle, sent) = self.combined(flags).await?;
            let path = self.export(&bundle, flags).await?;
            self.staged.lock().await.clear_sent(flags, &sent);
            Ok(path)
        })
        .await
    }

    /// Read an exported bundle and write it to the device as-is
    pub async fn load_from_file(&self, path: &Path) -> Result<()> {
        self.run(LOAD_CONFIG_FROM_FILE, async {
            let port = self.active_port().await?;
            let bundle = self.store.import(path).await?;
            if bundle.is_empty() {
                return Err(MeshcfgError::NoDomainsIncluded);
            }
            self.write(&port, &bundle).await
        })
        .await
    }

    /// Write the flagged domains to the device, then export the same bundle
    pub async fn commit(&self, flags: InclusionFlags) -> Result<PathBuf> {
        self.run(COMMIT_CONFIG, async {
            Self::require_domains(flags)?;
            let port = self.active_port().await?;
            let (bundle, sent) = self.combined(flags).await?;
            self.write(&port, &bundle).await?;
            let path = self.export(&bundle, flags).await?;
            self.staged.lock().await.clear_sent(flags, &sent);
            Ok(path)
        })
        .await
    }

    /// Serialize operations and record the outcome under `name`
    async fn run<T, F>(&self, name: &str, operation: F) -> Result<T>
    where
        F: std::future::Future<Output = Result<T>>,
    {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| MeshcfgError::OperationInProgress(name.to_string()))?;

        self.requests.pending(name).await;
        match operation.await {
            Ok(value) => {
                tracing::info!(request = name, "operation completed");
                self.requests.succeeded(name).await;
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(request = name, error = %err, "operation failed");
                self.requests.failed(name, err.to_string()).await;
                Err(err)
            }
        }
    }

    fn require_domains(flags: InclusionFlags) -> Result<()> {
        if flags.is_empty() {
            return Err(MeshcfgError::NoDomainsIncluded);
        }
        Ok(())
    }

    async fn active_port(&self) -> Result<String> {
        self.session
            .port_name()
            .await
            .ok_or(MeshcfgError::NoActiveDevice)
    }

    /// Merged bundle plus the staged edits it was built from
    async fn combined(
        &self,
        flags: InclusionFlags,
    ) -> Result<(CombinedConfigBundle, StagedEdits)> {
        let current = self.session.snapshot().await;
        let staged = self.staged.lock().await.clone();
        let bundle = combine(flags, &current, &staged)?;
        Ok((bundle, staged))
    }

    async fn write(&self, port: &str, bundle: &CombinedConfigBundle) -> Result<()> {
        tracing::info!(
            port,
            domains = %bundle.included_domains().file_tag(),
            "writing configuration to device"
        );
        self.link.write_config(port, bundle).await?;
        Ok(())
    }

    async fn export(&self, bundle: &CombinedConfigBundle, flags: InclusionFlags) -> Result<PathBuf> {
        let name = self
            .session
            .long_name()
            .await
            .map(|long_name| starting_file_name(&long_name, flags));
        self.store.export(bundle, name.as_deref()).await
    }
}

/// `<long name lowercased without spaces>-<domain tag>`
pub fn starting_file_name(long_name: &str, flags: InclusionFlags) -> String {
    let base: String = long_name
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    format!("{}-{}", base, flags.file_tag())
}
