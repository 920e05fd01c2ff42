// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Module configuration
//!
//! Settings for the optional firmware modules (MQTT bridge, serial bridge,
//! telemetry and so on).

use serde::{Deserialize, Serialize};

/// Serial bridge protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SerialMode {
    #[default]
    Default,
    Simple,
    Proto,
    Textmsg,
    Nmea,
    Caltopo,
}

config_section! {
    /// MQTT uplink/downlink bridge
    pub struct MqttConfig / EditedMqttConfig {
        enabled: bool,
        address: String,
        username: String,
        password: String,
        encryption_enabled: bool,
        json_enabled: bool,
        tls_enabled: bool,
        /// Topic root
        root: String,
        proxy_to_client_enabled: bool,
    }
}

config_section! {
    /// Serial bridge
    pub struct SerialConfig / EditedSerialConfig {
        enabled: bool,
        echo: bool,
        rxd: u32,
        txd: u32,
        baud: u32,
        timeout: u32,
        mode: SerialMode,
    }
}

config_section! {
    /// Buzzer, LED and vibration alerts
    pub struct ExternalNotificationConfig / EditedExternalNotificationConfig {
        enabled: bool,
        output_ms: u32,
        output: u32,
        active: bool,
        alert_message: bool,
        alert_bell: bool,
        use_pwm: bool,
    }
}

config_section! {
    /// Store and forward message cache
    pub struct StoreForwardConfig / EditedStoreForwardConfig {
        enabled: bool,
        heartbeat: bool,
        records: u32,
        history_return_max: u32,
        history_return_window: u32,
    }
}

config_section! {
    pub struct RangeTestConfig / EditedRangeTestConfig {
        enabled: bool,
        sender: u32,
        save: bool,
    }
}

config_section! {
    /// Telemetry intervals and sensors
    pub struct TelemetryConfig / EditedTelemetryConfig {
        device_update_interval: u32,
        environment_update_interval: u32,
        environment_measurement_enabled: bool,
        environment_screen_enabled: bool,
        environment_display_fahrenheit: bool,
        air_quality_enabled: bool,
        air_quality_interval: u32,
        power_measurement_enabled: bool,
    }
}

config_section! {
    pub struct CannedMessageConfig / EditedCannedMessageConfig {
        enabled: bool,
        allow_input_source: String,
        send_bell: bool,
        rotary1_enabled: bool,
    }
}

config_section! {
    pub struct AudioConfig / EditedAudioConfig {
        codec2_enabled: bool,
        ptt_pin: u32,
        bitrate: u32,
    }
}

config_section! {
    pub struct RemoteHardwareConfig / EditedRemoteHardwareConfig {
        enabled: bool,
        allow_undefined_pin_access: bool,
    }
}

config_section! {
    pub struct NeighborInfoConfig / EditedNeighborInfoConfig {
        enabled: bool,
        update_interval: u32,
    }
}

config_section! {
    /// Complete module configuration as reported by a connected device
    pub struct ModuleConfig / EditedModuleConfig {}
    sections {
        mqtt: MqttConfig,
        serial: SerialConfig,
        external_notification: ExternalNotificationConfig,
        store_forward: StoreForwardConfig,
        range_test: RangeTestConfig,
        telemetry: TelemetryConfig,
        canned_message: CannedMessageConfig,
        audio: AudioConfig,
        remote_hardware: RemoteHardwareConfig,
        neighbor_info: NeighborInfoConfig,
    }
}
