// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Connected-device session
//!
//! Holds the current configuration snapshot of one device and keeps it fresh
//! from device events. The merge engine only ever reads snapshots from here.

use tokio::sync::{broadcast, RwLock};
use tokio_stream::wrappers::BroadcastStream;

use crate::reconcile::CurrentConfig;

pub mod events;

pub use events::{DeviceEvent, DeviceState};

/// Buffered events per subscriber before lagging receivers drop old ones
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Identifies a device by the port it is connected on
pub type DeviceKey = String;

/// State held for one connected device
#[derive(Debug)]
pub struct DeviceSession {
    port_name: RwLock<Option<DeviceKey>>,
    state: RwLock<DeviceState>,
    events: broadcast::Sender<DeviceEvent>,
}

impl DeviceSession {
    /// Create a session for a device connected on `port_name`
    pub fn new(port_name: impl Into<DeviceKey>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            port_name: RwLock::new(Some(port_name.into())),
            state: RwLock::new(DeviceState::default()),
            events,
        }
    }

    /// Create a session that already holds a device state
    pub fn with_state(port_name: impl Into<DeviceKey>, state: DeviceState) -> Self {
        let session = Self::new(port_name);
        Self {
            state: RwLock::new(state),
            ..session
        }
    }

    /// Port of the connected device, `None` once disconnected
    pub async fn port_name(&self) -> Option<DeviceKey> {
        self.port_name.read().await.clone()
    }

    pub async fn long_name(&self) -> Option<String> {
        self.state.read().await.long_name.clone()
    }

    /// Copy of the current configuration snapshot
    pub async fn snapshot(&self) -> CurrentConfig {
        self.state.read().await.config.clone()
    }

    /// Apply a device event to the held state and forward it to subscribers
    pub async fn publish(&self, event: DeviceEvent) {
        tracing::debug!(event = event.kind(), "device event");

        match &event {
            DeviceEvent::DeviceUpdate(state) => {
                *self.state.write().await = state.clone();
            }
            DeviceEvent::Disconnected { port_name } => {
                self.disconnect(port_name).await;
            }
            DeviceEvent::ConfigurationStatus {
                port_name,
                successful,
                message,
            } => {
                if !successful {
                    tracing::warn!(
                        port = %port_name,
                        reason = message.as_deref().unwrap_or(""),
                        "device configuration failed"
                    );
                    self.disconnect(port_name).await;
                }
            }
            DeviceEvent::Reboot { at } => {
                tracing::info!(at = %at, "device rebooting");
            }
        }

        if self.events.send(event).is_err() {
            tracing::trace!("no device event subscribers");
        }
    }

    /// Receive every event published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.events.subscribe()
    }

    /// [`DeviceSession::subscribe`] as a stream
    pub fn events(&self) -> BroadcastStream<DeviceEvent> {
        BroadcastStream::new(self.subscribe())
    }

    async fn disconnect(&self, port_name: &str) {
        let mut current = self.port_name.write().await;
        if current.as_deref() == Some(port_name) {
            tracing::info!(port = %port_name, "device disconnected");
            *current = None;
        }
    }
}
