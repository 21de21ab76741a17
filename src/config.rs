//! Pipeline configuration describing search roots and output conventions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration surface consumed by the asset pipeline.
///
/// Captured once at pipeline construction; the search roots and flags are
/// immutable for the lifetime of a pipeline instance.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Ordered list of directories scanned for asset files. Order defines
    /// resolution priority.
    pub search_roots: Vec<PathBuf>,
    /// Whether script content is passed through the compressor.
    pub compress_scripts: bool,
    /// Prefix applied to all generated request URLs.
    pub serve_prefix: String,
    /// Locale assumed when a request does not specify one.
    pub default_locale: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            search_roots: Vec::new(),
            compress_scripts: false,
            serve_prefix: String::new(),
            default_locale: "en".into(),
        }
    }
}

impl PipelineConfig {
    /// Read configuration from a specific JSON file.
    pub fn from_path(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Attempt to load configuration from a JSON file, falling back to
    /// default values when the file is absent or fails to parse.
    pub fn discover(path: &Path) -> Self {
        Self::from_path(path).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_to_english_locale_and_no_compression() {
        let config = PipelineConfig::default();
        assert!(config.search_roots.is_empty());
        assert!(!config.compress_scripts);
        assert_eq!(config.serve_prefix, "");
        assert_eq!(config.default_locale, "en");
    }

    #[test]
    fn from_path_reads_configuration() {
        let temp = tempdir().expect("failed to create temp dir");
        let path = temp.path().join("pipeline.config.json");
        std::fs::write(
            &path,
            r#"{
              "search_roots": ["app/assets", "vendor/assets"],
              "compress_scripts": true,
              "serve_prefix": "/static"
            }"#,
        )
        .expect("failed to write config file");

        let config = PipelineConfig::from_path(&path).expect("configuration should load");
        assert_eq!(
            config.search_roots,
            vec![PathBuf::from("app/assets"), PathBuf::from("vendor/assets")]
        );
        assert!(config.compress_scripts);
        assert_eq!(config.serve_prefix, "/static");
        assert_eq!(config.default_locale, "en");
    }

    #[test]
    fn discover_falls_back_to_defaults_for_missing_file() {
        let temp = tempdir().expect("failed to create temp dir");
        let config = PipelineConfig::discover(&temp.path().join("absent.json"));
        assert!(config.search_roots.is_empty());
    }
}
