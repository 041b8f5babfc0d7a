// config.rs - Presentation settings for the domain model.
//
// Loaded from `.grc/config.toml`. Every field has a default, so a missing
// file, an empty file, or a file with only some sections all work.
//
// ```toml
// [labels]
// locale = "ja"
// ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::label::{Label, LabelLocale};

/// Conventional location of the config file relative to a project root.
pub const DEFAULT_CONFIG_PATH: &str = ".grc/config.toml";

/// Errors from reading `.grc/config.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config file is not valid TOML for `GrcConfig`.
    #[error("invalid config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GrcConfig {
    #[serde(default)]
    pub labels: LabelConfig,
}

/// How state labels are rendered.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelConfig {
    #[serde(default)]
    pub locale: LabelLocale,
}

impl GrcConfig {
    /// Config file path for a project rooted at `project_root`.
    pub fn path_for_project(project_root: impl AsRef<Path>) -> PathBuf {
        project_root.as_ref().join(DEFAULT_CONFIG_PATH)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Read and parse a config file. Errors if it is missing or malformed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from file if it exists, otherwise use defaults. A file that
    /// exists but cannot be read or parsed is reported and ignored.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("falling back to default config: {}", e);
                Self::default()
            }
        }
    }

    /// Render `value` in the configured locale.
    pub fn label(&self, value: &impl Label) -> String {
        value.label(self.labels.locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::ControlStatus;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn empty_config_uses_defaults() {
        let config = GrcConfig::from_toml_str("").unwrap();
        assert_eq!(config, GrcConfig::default());
        assert_eq!(config.labels.locale, LabelLocale::English);
    }

    #[test]
    fn parses_locale() {
        let config = GrcConfig::from_toml_str("[labels]\nlocale = \"ja\"\n").unwrap();
        assert_eq!(config.labels.locale, LabelLocale::Japanese);
    }

    #[test]
    fn unknown_locale_is_a_parse_error() {
        let parsed = GrcConfig::from_toml_str("[labels]\nlocale = \"fr\"\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn label_uses_configured_locale() {
        let status = ControlStatus::NotImplemented;
        let ja = GrcConfig {
            labels: LabelConfig {
                locale: LabelLocale::Japanese,
            },
        };
        assert_eq!(ja.label(&status), "未実装");
        assert_eq!(GrcConfig::default().label(&status), "Not Implemented");
    }

    #[test]
    fn load_reads_file_from_project_layout() {
        let dir = tempdir().unwrap();
        let path = GrcConfig::path_for_project(dir.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[labels]\nlocale = \"ja\"\n").unwrap();

        let config = GrcConfig::load(&path).unwrap();
        assert_eq!(config.labels.locale, LabelLocale::Japanese);
        assert!(path.ends_with(".grc/config.toml"));
    }

    #[test]
    fn load_reports_missing_and_malformed_files() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(matches!(
            GrcConfig::load(&missing),
            Err(ConfigError::Io { .. })
        ));

        let broken = dir.path().join("broken.toml");
        fs::write(&broken, "[labels\nlocale = ").unwrap();
        let err = GrcConfig::load(&broken).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn load_or_default_falls_back() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert_eq!(GrcConfig::load_or_default(&missing), GrcConfig::default());

        let broken = dir.path().join("broken.toml");
        fs::write(&broken, "labels = 3").unwrap();
        assert_eq!(GrcConfig::load_or_default(&broken), GrcConfig::default());

        let good = dir.path().join("good.toml");
        fs::write(&good, "[labels]\nlocale = \"ja\"\n").unwrap();
        assert_eq!(
            GrcConfig::load_or_default(&good).labels.locale,
            LabelLocale::Japanese
        );
    }
}
