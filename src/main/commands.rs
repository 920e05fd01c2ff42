// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde_json::json;

use meshcfg::cli::{CombineArgs, InspectArgs, OutputFormat, SettingsArgs, SettingsCommands};
use meshcfg::config::{ExportFormat, Settings};
use meshcfg::reconcile::{combine, CombinedConfigBundle, CurrentConfig, StagedEdits};
use meshcfg::workflow::store::{format_for_path, parse_bundle, render_bundle};

/// Merge a snapshot file with an edits file and print or write the bundle
pub(super) async fn run_combine(
    args: CombineArgs,
    settings: &Settings,
    format: OutputFormat,
) -> Result<()> {
    let current: CurrentConfig = read_json(&args.current).await?;
    let staged: StagedEdits = read_json(&args.edits).await?;

    let bundle = combine(args.flags(), &current, &staged).context("Failed to combine configuration")?;

    match args.out {
        Some(out) => {
            let content = render_bundle(&bundle, format_for_path(&out), settings.export.pretty)?;
            if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&out, content)
                .await
                .with_context(|| format!("Failed to write {}", out.display()))?;

            match format {
                OutputFormat::Json => println!("{}", json!({ "path": out })),
                OutputFormat::Text => println!("Wrote {}", out.display()),
            }
        }
        None => {
            let rendered = match format {
                OutputFormat::Json => render_bundle(&bundle, ExportFormat::Json, false)?,
                OutputFormat::Text => {
                    render_bundle(&bundle, settings.export.format, settings.export.pretty)?
                }
            };
            println!("{}", rendered);
        }
    }

    Ok(())
}

/// Print a summary of an exported bundle
pub(super) async fn run_inspect(args: InspectArgs, format: OutputFormat) -> Result<()> {
    let content = tokio::fs::read_to_string(&args.path)
        .await
        .with_context(|| format!("Failed to read {}", args.path.display()))?;
    let bundle = parse_bundle(&content, format_for_path(&args.path))
        .with_context(|| format!("{} is not a configuration bundle", args.path.display()))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary(&bundle))?),
        OutputFormat::Text => print_summary(&bundle),
    }
    Ok(())
}

fn summary(bundle: &CombinedConfigBundle) -> serde_json::Value {
    let domains: Vec<&str> = bundle
        .included_domains()
        .domains()
        .map(|domain| domain.as_str())
        .collect();
    let channels: Vec<serde_json::Value> = bundle
        .channels
        .iter()
        .flatten()
        .map(|channel| {
            json!({
                "index": channel.index,
                "role": channel.role,
                "name": channel.settings.name,
                "pskBytes": channel.settings.psk.len(),
            })
        })
        .collect();
    json!({ "domains": domains, "channels": channels })
}

fn print_summary(bundle: &CombinedConfigBundle) {
    if bundle.is_empty() {
        println!("Bundle contains no configuration domains");
        return;
    }

    println!("Domains: {}", bundle.included_domains().file_tag());
    if let Some(radio) = &bundle.radio {
        println!(
            "Radio: region {:?}, preset {:?}, tx power {} dBm",
            radio.lora.region, radio.lora.modem_preset, radio.lora.tx_power
        );
    }
    if let Some(module) = &bundle.module {
        println!(
            "Module: mqtt {}, telemetry interval {}s",
            if module.mqtt.enabled { "on" } else { "off" },
            module.telemetry.device_update_interval
        );
    }
    if let Some(channels) = &bundle.channels {
        println!("Channels ({}):", channels.len());
        for channel in channels {
            println!(
                "  [{}] {:?} {:?} ({} byte key)",
                channel.index,
                channel.role,
                channel.settings.name,
                channel.settings.psk.len()
            );
        }
    }
}

/// Run settings subcommands
pub(super) fn run_settings_command(
    args: SettingsArgs,
    mut settings: Settings,
    path: &Path,
    format: OutputFormat,
) -> Result<()> {
    match args.command.unwrap_or(SettingsCommands::Show) {
        SettingsCommands::Show => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        SettingsCommands::Set { key, value } => {
            settings.set_key(&key, &value)?;
            settings
                .save_to(path)
                .with_context(|| format!("Failed to save {}", path.display()))?;
            if format == OutputFormat::Text {
                println!("Set {} = {}", key, value);
            }
        }
        SettingsCommands::Get { key } => {
            let value = serde_json::to_value(&settings)?;
            let pointer = format!("/{}", key.replace('.', "/"));
            match value.pointer(&pointer) {
                Some(serde_json::Value::String(s)) if format == OutputFormat::Text => {
                    println!("{}", s)
                }
                Some(found) => println!("{}", found),
                None => bail!("Unknown setting: {}", key),
            }
        }
        SettingsCommands::Reset => {
            Settings::default()
                .save_to_clean(path)
                .with_context(|| format!("Failed to reset {}", path.display()))?;
            if format == OutputFormat::Text {
                println!("Settings reset to defaults");
            }
        }
        SettingsCommands::Path => match format {
            OutputFormat::Json => println!("{}", json!({ "path": path })),
            OutputFormat::Text => println!("{}", path.display()),
        },
    }
    Ok(())
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
