// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::Notify;

use meshcfg::error::DeviceError;
use meshcfg::model::{Channel, ChannelRole, ChannelSettings, Edit, MeshChannel, ModuleConfig, RadioConfig};
use meshcfg::reconcile::{
    ChannelEditForm, CombinedConfigBundle, ConfigDomain, CurrentConfig, InclusionFlags,
    StagedEdits,
};
use meshcfg::session::{DeviceEvent, DeviceSession, DeviceState};
use meshcfg::workflow::{
    ConfigWorkflow, DeviceLink, FileConfigStore, RequestState, LOAD_CONFIG_FROM_FILE,
    SAVE_CONFIG_TO_FILE, UPLOAD_CONFIG_TO_DEVICE,
};
use meshcfg::MeshcfgError;

const PORT: &str = "/dev/ttyUSB0";

/// Records every bundle it is asked to write
#[derive(Default, Clone)]
struct RecordingLink {
    writes: Arc<Mutex<Vec<(String, CombinedConfigBundle)>>>,
}

impl RecordingLink {
    fn writes(&self) -> Vec<(String, CombinedConfigBundle)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeviceLink for RecordingLink {
    async fn write_config(
        &self,
        port_name: &str,
        bundle: &CombinedConfigBundle,
    ) -> Result<(), DeviceError> {
        self.writes
            .lock()
            .unwrap()
            .push((port_name.to_string(), bundle.clone()));
        Ok(())
    }
}

/// Always fails with the configured error
struct FailingLink(DeviceError);

#[async_trait]
impl DeviceLink for FailingLink {
    async fn write_config(&self, _: &str, _: &CombinedConfigBundle) -> Result<(), DeviceError> {
        Err(self.0.clone())
    }
}

/// Blocks inside the write until released
#[derive(Default)]
struct GatedLink {
    started: Notify,
    release: Notify,
}

#[async_trait]
impl DeviceLink for GatedLink {
    async fn write_config(&self, _: &str, _: &CombinedConfigBundle) -> Result<(), DeviceError> {
        self.started.notify_one();
        self.release.notified().await;
        Ok(())
    }
}

fn session() -> Arc<DeviceSession> {
    let mut radio = RadioConfig::default();
    radio.lora.tx_power = 10;
    radio.network.wifi_ssid = "A".to_string();

    let channels = BTreeMap::from([
        (
            0,
            MeshChannel::new(Channel {
                index: 0,
                role: ChannelRole::Primary,
                settings: ChannelSettings {
                    psk: vec![1, 2],
                    name: "main".to_string(),
                    ..Default::default()
                },
            }),
        ),
        (
            1,
            MeshChannel::new(Channel {
                index: 1,
                role: ChannelRole::Secondary,
                settings: ChannelSettings {
                    psk: vec![3],
                    ..Default::default()
                },
            }),
        ),
    ]);

    Arc::new(DeviceSession::with_state(
        PORT,
        DeviceState {
            long_name: Some("Ridge Relay".to_string()),
            config: CurrentConfig {
                radio: Some(radio),
                module: Some(ModuleConfig::default()),
                channels: Some(channels),
            },
        },
    ))
}

fn staged() -> StagedEdits {
    let mut staged = StagedEdits::default();
    staged.radio.lora.tx_power = Edit::Set(20);
    staged.module.telemetry.device_update_interval = Edit::Set(900);
    staged.stage_channel(
        0,
        Some(ChannelEditForm {
            psk: Edit::Set("CQ==".to_string()),
            ..Default::default()
        }),
    );
    staged
}

fn radio_and_channel() -> InclusionFlags {
    InclusionFlags::from_domains(&[ConfigDomain::Radio, ConfigDomain::Channel])
}

#[tokio::test]
async fn test_upload_sends_merged_bundle_and_clears_only_flagged() {
    let temp_dir = TempDir::new().unwrap();
    let link = RecordingLink::default();
    let workflow = ConfigWorkflow::new(session(), link.clone(), FileConfigStore::new(temp_dir.path()))
        .with_staged(staged());

    workflow.upload(radio_and_channel()).await.unwrap();

    let writes = link.writes();
    assert_eq!(writes.len(), 1);
    let (port, bundle) = &writes[0];
    assert_eq!(port, PORT);
    assert_eq!(bundle.radio.as_ref().unwrap().lora.tx_power, 20);
    assert_eq!(bundle.radio.as_ref().unwrap().network.wifi_ssid, "A");
    assert!(bundle.module.is_none());
    let psks: Vec<Vec<u8>> = bundle
        .channels
        .as_ref()
        .unwrap()
        .iter()
        .map(|c| c.settings.psk.clone())
        .collect();
    assert_eq!(psks, vec![vec![9], vec![3]]);

    let remaining = workflow.staged().await;
    assert!(!remaining.has_edits(ConfigDomain::Radio));
    assert!(!remaining.has_edits(ConfigDomain::Channel));
    assert!(remaining.has_edits(ConfigDomain::Module));
}

#[tokio::test]
async fn test_failed_write_leaves_staged_edits() {
    let temp_dir = TempDir::new().unwrap();
    let workflow = ConfigWorkflow::new(
        session(),
        FailingLink(DeviceError::Disconnected),
        FileConfigStore::new(temp_dir.path()),
    )
    .with_staged(staged());

    let err = workflow.upload(InclusionFlags::all()).await.unwrap_err();
    assert!(matches!(err, MeshcfgError::Device(DeviceError::Disconnected)));
    assert_eq!(workflow.staged().await, staged());

    let status = workflow
        .requests()
        .status(UPLOAD_CONFIG_TO_DEVICE)
        .await
        .unwrap();
    assert_eq!(
        status.state,
        RequestState::Failed {
            message: "Device error: Device disconnected".to_string()
        }
    );
}

#[tokio::test]
async fn test_bad_channel_form_fails_before_write() {
    let temp_dir = TempDir::new().unwrap();
    let link = RecordingLink::default();
    let mut staged = staged();
    staged.stage_channel(
        1,
        Some(ChannelEditForm {
            psk: Edit::Set("not base64!".to_string()),
            ..Default::default()
        }),
    );
    let workflow = ConfigWorkflow::new(session(), link.clone(), FileConfigStore::new(temp_dir.path()))
        .with_staged(staged.clone());

    let err = workflow.upload(radio_and_channel()).await.unwrap_err();
    assert!(matches!(err, MeshcfgError::AdaptationShapeMismatch { .. }));
    assert!(link.writes().is_empty());
    assert_eq!(workflow.staged().await, staged);
}

#[tokio::test]
async fn test_concurrent_operation_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let workflow = ConfigWorkflow::new(session(), GatedLink::default(), FileConfigStore::new(temp_dir.path()))
        .with_staged(staged());
    let link_gate = async {
        // The second operation starts while the first is parked inside the write.
        workflow.link().started.notified().await;
        let second = workflow.save_to_file(InclusionFlags::all()).await;
        workflow.link().release.notify_one();
        second
    };

    let (first, second) = tokio::join!(workflow.upload(InclusionFlags::all()), link_gate);

    first.unwrap();
    assert!(matches!(
        second.unwrap_err(),
        MeshcfgError::OperationInProgress(name) if name == SAVE_CONFIG_TO_FILE
    ));
    assert!(workflow.staged().await.is_empty());
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_edits_staged_during_write_survive_upload() {
    let temp_dir = TempDir::new().unwrap();
    let workflow = ConfigWorkflow::new(session(), GatedLink::default(), FileConfigStore::new(temp_dir.path()))
        .with_staged(staged());
    let edit_while_writing = async {
        workflow.link().started.notified().await;
        workflow
            .stage(|staged| {
                staged.radio.lora.hop_limit = Edit::Set(5);
                staged.stage_channel(
                    1,
                    Some(ChannelEditForm {
                        name: Edit::Set("ops".to_string()),
                        ..Default::default()
                    }),
                );
            })
            .await;
        workflow.link().release.notify_one();
    };

    let (result, ()) = tokio::join!(workflow.upload(radio_and_channel()), edit_while_writing);
    result.unwrap();

    let left = workflow.staged().await;
    assert_eq!(left.radio.lora.hop_limit, Edit::Set(5));
    assert_eq!(left.radio.lora.tx_power, Edit::Set(20));
    assert!(!left.channels.contains_key(&0));
    assert!(left.channels[&1].is_some());
    assert!(left.has_edits(ConfigDomain::Module));
}

#[tokio::test]
async fn test_unchanged_domains_clear_after_gated_upload() {
    let temp_dir = TempDir::new().unwrap();
    let workflow = ConfigWorkflow::new(session(), GatedLink::default(), FileConfigStore::new(temp_dir.path()))
        .with_staged(staged());
    let edit_while_writing = async {
        workflow.link().started.notified().await;
        workflow
            .stage(|staged| staged.module.telemetry.device_update_interval = Edit::Set(60))
            .await;
        workflow.link().release.notify_one();
    };

    let (result, ()) = tokio::join!(workflow.upload(InclusionFlags::all()), edit_while_writing);
    result.unwrap();

    let left = workflow.staged().await;
    assert!(!left.has_edits(ConfigDomain::Radio));
    assert!(!left.has_edits(ConfigDomain::Channel));
    assert_eq!(left.module.telemetry.device_update_interval, Edit::Set(60));
}

#[tokio::test]
async fn test_no_active_device_after_disconnect() {
    let temp_dir = TempDir::new().unwrap();
    let session = session();
    let link = RecordingLink::default();
    let workflow = ConfigWorkflow::new(session.clone(), link.clone(), FileConfigStore::new(temp_dir.path()))
        .with_staged(staged());

    session
        .publish(DeviceEvent::Disconnected {
            port_name: PORT.to_string(),
        })
        .await;

    let err = workflow.upload(radio_and_channel()).await.unwrap_err();
    assert!(matches!(err, MeshcfgError::NoActiveDevice));
    assert!(link.writes().is_empty());

    // Saving to a file needs no device.
    let path = workflow.save_to_file(radio_and_channel()).await.unwrap();
    assert!(path.exists());
}

#[tokio::test]
async fn test_empty_flags_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let workflow = ConfigWorkflow::new(session(), RecordingLink::default(), FileConfigStore::new(temp_dir.path()))
        .with_staged(staged());

    assert!(matches!(
        workflow.upload(InclusionFlags::default()).await,
        Err(MeshcfgError::NoDomainsIncluded)
    ));
    assert!(matches!(
        workflow.save_to_file(InclusionFlags::default()).await,
        Err(MeshcfgError::NoDomainsIncluded)
    ));
    assert_eq!(workflow.staged().await, staged());
}

#[tokio::test]
async fn test_save_then_load_round_trip_through_device() {
    let temp_dir = TempDir::new().unwrap();
    let link = RecordingLink::default();
    let workflow = ConfigWorkflow::new(session(), link.clone(), FileConfigStore::new(temp_dir.path()))
        .with_staged(staged());

    let path = workflow.save_to_file(radio_and_channel()).await.unwrap();
    assert_eq!(path.file_name().unwrap(), "ridgerelay-radio-channel.json");

    workflow.stage(|staged| staged.radio.lora.hop_limit = Edit::Set(5)).await;
    workflow.load_from_file(&path).await.unwrap();

    let writes = link.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].1.radio.as_ref().unwrap().lora.tx_power, 20);
    assert!(writes[0].1.module.is_none());

    // Loading never touches staged edits.
    let remaining = workflow.staged().await;
    assert_eq!(remaining.radio.lora.hop_limit, Edit::Set(5));
    assert_eq!(
        workflow
            .requests()
            .status(LOAD_CONFIG_FROM_FILE)
            .await
            .unwrap()
            .state,
        RequestState::Successful
    );
}

#[tokio::test]
async fn test_save_without_long_name_uses_default_file_name() {
    let temp_dir = TempDir::new().unwrap();
    let session = Arc::new(DeviceSession::with_state(
        PORT,
        DeviceState {
            long_name: None,
            config: CurrentConfig {
                module: Some(ModuleConfig::default()),
                ..Default::default()
            },
        },
    ));
    let workflow = ConfigWorkflow::new(session, RecordingLink::default(), FileConfigStore::new(temp_dir.path()));

    let path = workflow
        .save_to_file(InclusionFlags::from_domains(&[ConfigDomain::Module]))
        .await
        .unwrap();
    assert_eq!(path.file_name().unwrap(), "meshcfg-config.json");
}
