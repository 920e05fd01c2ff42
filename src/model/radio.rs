// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Radio configuration
//!
//! The device's local radio settings, grouped by section the way the device
//! reports them. Every section has a generated `Edited*` mirror.

use serde::{Deserialize, Serialize};

/// Role the node plays in the mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceRole {
    #[default]
    Client,
    ClientMute,
    ClientHidden,
    Router,
    RouterClient,
    Repeater,
    Tracker,
    Sensor,
    Tak,
    TakTracker,
    LostAndFound,
}

/// Which packets the node rebroadcasts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RebroadcastMode {
    #[default]
    All,
    AllSkipDecoding,
    LocalOnly,
    KnownOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisplayUnits {
    #[default]
    Metric,
    Imperial,
}

/// LoRa modem presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModemPreset {
    #[default]
    LongFast,
    LongSlow,
    LongModerate,
    VeryLongSlow,
    MediumSlow,
    MediumFast,
    ShortSlow,
    ShortFast,
}

/// Regulatory region, selects the frequency plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegionCode {
    #[default]
    Unset,
    Us,
    #[serde(rename = "EU_433")]
    Eu433,
    #[serde(rename = "EU_868")]
    Eu868,
    Cn,
    Jp,
    Anz,
    Kr,
    Tw,
    Ru,
    In,
    #[serde(rename = "NZ_865")]
    Nz865,
    Th,
    #[serde(rename = "LORA_24")]
    Lora24,
    #[serde(rename = "UA_433")]
    Ua433,
    #[serde(rename = "UA_868")]
    Ua868,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PairingMode {
    #[default]
    RandomPin,
    FixedPin,
    NoPin,
}

config_section! {
    /// Device-level behaviour
    pub struct DeviceConfig / EditedDeviceConfig {
        role: DeviceRole,
        serial_enabled: bool,
        button_gpio: u32,
        buzzer_gpio: u32,
        rebroadcast_mode: RebroadcastMode,
        /// Seconds between node info broadcasts
        node_info_broadcast_secs: u32,
        double_tap_as_button_press: bool,
        /// POSIX timezone definition
        tzdef: String,
    }
}

config_section! {
    /// Position reporting
    pub struct PositionConfig / EditedPositionConfig {
        position_broadcast_secs: u32,
        position_broadcast_smart_enabled: bool,
        fixed_position: bool,
        gps_update_interval: u32,
        /// Bitmask of optional position fields
        position_flags: u32,
        rx_gpio: u32,
        tx_gpio: u32,
    }
}

config_section! {
    /// Power management
    pub struct PowerConfig / EditedPowerConfig {
        is_power_saving: bool,
        on_battery_shutdown_after_secs: u32,
        adc_multiplier_override: f32,
        wait_bluetooth_secs: u32,
        sds_secs: u32,
        ls_secs: u32,
        min_wake_secs: u32,
    }
}

config_section! {
    /// WiFi and Ethernet networking
    pub struct NetworkConfig / EditedNetworkConfig {
        wifi_enabled: bool,
        wifi_ssid: String,
        wifi_psk: String,
        ntp_server: String,
        eth_enabled: bool,
        rsyslog_server: String,
    }
}

config_section! {
    /// On-device screen
    pub struct DisplayConfig / EditedDisplayConfig {
        screen_on_secs: u32,
        auto_screen_carousel_secs: u32,
        compass_north_top: bool,
        flip_screen: bool,
        units: DisplayUnits,
        heading_bold: bool,
        wake_on_tap_or_motion: bool,
    }
}

config_section! {
    /// LoRa radio parameters
    pub struct LoraConfig / EditedLoraConfig {
        use_preset: bool,
        modem_preset: ModemPreset,
        bandwidth: u32,
        spread_factor: u32,
        coding_rate: u32,
        frequency_offset: f32,
        region: RegionCode,
        hop_limit: u32,
        tx_enabled: bool,
        /// Transmit power in dBm, 0 selects the region maximum
        tx_power: i32,
        channel_num: u32,
        override_duty_cycle: bool,
        sx126x_rx_boosted_gain: bool,
        override_frequency: f32,
        /// Node numbers whose packets are dropped
        ignore_incoming: Vec<u32>,
    }
}

config_section! {
    pub struct BluetoothConfig / EditedBluetoothConfig {
        enabled: bool,
        mode: PairingMode,
        fixed_pin: u32,
    }
}

config_section! {
    /// Complete radio configuration as reported by a connected device
    pub struct RadioConfig / EditedRadioConfig {}
    sections {
        device: DeviceConfig,
        position: PositionConfig,
        power: PowerConfig,
        network: NetworkConfig,
        display: DisplayConfig,
        lora: LoraConfig,
        bluetooth: BluetoothConfig,
    }
}
