// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Filesystem-backed configuration store
//!
//! Bundles are written as JSON or TOML into one export directory. Import picks
//! the parser from the file extension so exports from either format load back.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::config::{ExportFormat, Settings};
use crate::error::Result;
use crate::reconcile::CombinedConfigBundle;

use super::ConfigStore;

/// Writes and reads bundles under a single directory
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    directory: PathBuf,
    format: ExportFormat,
    pretty: bool,
    default_file_name: String,
}

impl FileConfigStore {
    /// Store writing JSON into `directory`
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        let defaults = Settings::default().export;
        Self {
            directory: directory.into(),
            format: defaults.format,
            pretty: defaults.pretty,
            default_file_name: defaults.default_file_name,
        }
    }

    /// Store configured from the user's export settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            directory: settings.export_directory(),
            format: settings.export.format,
            pretty: settings.export.pretty,
            default_file_name: settings.export.default_file_name.clone(),
        }
    }

    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Render a bundle in the store's format
    pub fn render(&self, bundle: &CombinedConfigBundle) -> Result<String> {
        render_bundle(bundle, self.format, self.pretty)
    }

    /// Create the first free `stem[-n].ext` file in the export directory
    async fn create_target(&self, stem: &str) -> Result<(PathBuf, tokio::fs::File)> {
        let ext = self.format.extension();
        let mut n = 0u32;
        loop {
            let name = match n {
                0 => format!("{}.{}", stem, ext),
                _ => format!("{}-{}.{}", stem, n, ext),
            };
            let path = self.directory.join(name);
            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => n += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn export(
        &self,
        bundle: &CombinedConfigBundle,
        starting_file_name: Option<&str>,
    ) -> Result<PathBuf> {
        let stem = starting_file_name
            .map(sanitize_file_stem)
            .filter(|stem| !stem.is_empty())
            .unwrap_or_else(|| self.default_file_name.clone());

        let content = self.render(bundle)?;
        tokio::fs::create_dir_all(&self.directory).await?;

        let (path, mut file) = self.create_target(&stem).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        tracing::info!(path = %path.display(), format = %self.format, "exported configuration");
        Ok(path)
    }

    async fn import(&self, path: &Path) -> Result<CombinedConfigBundle> {
        let content = tokio::fs::read_to_string(path).await?;
        let bundle = parse_bundle(&content, format_for_path(path))?;
        tracing::info!(
            path = %path.display(),
            domains = %bundle.included_domains().file_tag(),
            "imported configuration"
        );
        Ok(bundle)
    }
}

/// Serialize a bundle as JSON or TOML
pub fn render_bundle(
    bundle: &CombinedConfigBundle,
    format: ExportFormat,
    pretty: bool,
) -> Result<String> {
    match format {
        ExportFormat::Json if pretty => Ok(serde_json::to_string_pretty(bundle)?),
        ExportFormat::Json => Ok(serde_json::to_string(bundle)?),
        ExportFormat::Toml => Ok(toml::to_string_pretty(bundle)?),
    }
}

/// Parse a bundle from JSON or TOML text
pub fn parse_bundle(content: &str, format: ExportFormat) -> Result<CombinedConfigBundle> {
    match format {
        ExportFormat::Json => Ok(serde_json::from_str(content)?),
        ExportFormat::Toml => Ok(toml::from_str(content)?),
    }
}

/// `.toml` files are TOML, anything else is read as JSON
pub fn format_for_path(path: &Path) -> ExportFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("toml") => ExportFormat::Toml,
        _ => ExportFormat::Json,
    }
}

fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':' | '\0'))
        .collect::<String>()
        .trim_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeshcfgError;
    use crate::model::{Channel, RadioConfig};
    use tempfile::TempDir;

    fn bundle() -> CombinedConfigBundle {
        let mut radio = RadioConfig::default();
        radio.lora.tx_power = 20;
        CombinedConfigBundle {
            radio: Some(radio),
            module: None,
            channels: Some(vec![Channel::default()]),
        }
    }

    #[tokio::test]
    async fn test_export_uses_starting_name() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileConfigStore::new(temp_dir.path());

        let path = store
            .export(&bundle(), Some("basecamp-radio-channel"))
            .await
            .unwrap();
        assert_eq!(path, temp_dir.path().join("basecamp-radio-channel.json"));
    }

    #[tokio::test]
    async fn test_export_without_name_uses_default() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileConfigStore::new(temp_dir.path());

        let path = store.export(&bundle(), None).await.unwrap();
        assert_eq!(path.file_name().unwrap(), "meshcfg-config.json");
    }

    #[tokio::test]
    async fn test_export_does_not_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileConfigStore::new(temp_dir.path());

        let first = store.export(&bundle(), Some("node")).await.unwrap();
        let second = store.export(&bundle(), Some("node")).await.unwrap();
        assert_ne!(first, second);
        assert_eq!(second.file_name().unwrap(), "node-1.json");
    }

    #[tokio::test]
    async fn test_export_leaves_existing_files_untouched() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("node.json"), "keep").unwrap();
        std::fs::write(temp_dir.path().join("node-1.json"), "keep too").unwrap();
        let store = FileConfigStore::new(temp_dir.path());

        let path = store.export(&bundle(), Some("node")).await.unwrap();
        assert_eq!(path.file_name().unwrap(), "node-2.json");
        assert_eq!(std::fs::read_to_string(temp_dir.path().join("node.json")).unwrap(), "keep");
        assert_eq!(
            std::fs::read_to_string(temp_dir.path().join("node-1.json")).unwrap(),
            "keep too"
        );
        assert_eq!(store.import(&path).await.unwrap(), bundle());
    }

    #[tokio::test]
    async fn test_concurrent_exports_get_distinct_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileConfigStore::new(temp_dir.path());

        let (bundle_a, bundle_b) = (bundle(), bundle());
        let (a, b) = tokio::join!(
            store.export(&bundle_a, Some("node")),
            store.export(&bundle_b, Some("node"))
        );
        let (a, b) = (a.unwrap(), b.unwrap());
        assert_ne!(a, b);
        assert_eq!(store.import(&a).await.unwrap(), bundle());
        assert_eq!(store.import(&b).await.unwrap(), bundle());
    }

    #[tokio::test]
    async fn test_export_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileConfigStore::new(temp_dir.path().join("nested").join("exports"));

        let path = store.export(&bundle(), Some("node")).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_json_export_imports_back() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileConfigStore::new(temp_dir.path()).with_pretty(false);

        let path = store.export(&bundle(), Some("node")).await.unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains('\n'));

        let imported = store.import(&path).await.unwrap();
        assert_eq!(imported, bundle());
    }

    #[tokio::test]
    async fn test_toml_export_imports_back() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileConfigStore::new(temp_dir.path()).with_format(ExportFormat::Toml);

        let path = store.export(&bundle(), Some("node")).await.unwrap();
        assert_eq!(path.extension().unwrap(), "toml");

        let imported = store.import(&path).await.unwrap();
        assert_eq!(imported.radio.unwrap().lora.tx_power, 20);
        assert!(imported.module.is_none());
        assert_eq!(imported.channels.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_import_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileConfigStore::new(temp_dir.path());

        let err = store
            .import(&temp_dir.path().join("absent.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, MeshcfgError::Io(_)));
    }

    #[tokio::test]
    async fn test_import_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = FileConfigStore::new(temp_dir.path())
            .import(&path)
            .await
            .unwrap_err();
        assert!(matches!(err, MeshcfgError::Json(_)));
    }

    #[test]
    fn test_format_for_path() {
        assert_eq!(format_for_path(Path::new("a.TOML")), ExportFormat::Toml);
        assert_eq!(format_for_path(Path::new("a.json")), ExportFormat::Json);
        assert_eq!(format_for_path(Path::new("a")), ExportFormat::Json);
    }

    #[test]
    fn test_sanitize_file_stem() {
        assert_eq!(sanitize_file_stem("../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize_file_stem("node:1"), "node1");
    }

    #[test]
    fn test_from_settings() {
        let mut settings = Settings::default();
        settings.export.directory = Some(PathBuf::from("/srv/exports"));
        settings.export.format = ExportFormat::Toml;

        let store = FileConfigStore::from_settings(&settings);
        assert_eq!(store.directory(), Path::new("/srv/exports"));
        assert!(store.render(&bundle()).unwrap().contains("[radio"));
    }
}
