// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Status tracking for named apply operations

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

pub const UPLOAD_CONFIG_TO_DEVICE: &str = "upload-config-to-device";
pub const SAVE_CONFIG_TO_FILE: &str = "save-config-to-file";
pub const LOAD_CONFIG_FROM_FILE: &str = "load-config-from-file";
pub const COMMIT_CONFIG: &str = "commit-config";

/// Lifecycle of one operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RequestState {
    Pending,
    Successful,
    Failed { message: String },
}

impl RequestState {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestState::Pending)
    }
}

/// Latest state of an operation and when it was entered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestStatus {
    pub state: RequestState,
    pub updated_at: DateTime<Utc>,
}

/// Last known status per operation name
#[derive(Debug, Default)]
pub struct RequestTracker {
    requests: RwLock<HashMap<String, RequestStatus>>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn pending(&self, name: &str) {
        self.set(name, RequestState::Pending).await;
    }

    pub async fn succeeded(&self, name: &str) {
        self.set(name, RequestState::Successful).await;
    }

    pub async fn failed(&self, name: &str, message: impl Into<String>) {
        self.set(
            name,
            RequestState::Failed {
                message: message.into(),
            },
        )
        .await;
    }

    /// Status of `name`, `None` if it never ran
    pub async fn status(&self, name: &str) -> Option<RequestStatus> {
        self.requests.read().await.get(name).cloned()
    }

    async fn set(&self, name: &str, state: RequestState) {
        let status = RequestStatus {
            state,
            updated_at: Utc::now(),
        };
        self.requests.write().await.insert(name.to_string(), status);
    }
}
