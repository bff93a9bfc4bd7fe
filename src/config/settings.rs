//! Tool settings persisted as JSON
//!
//! The file is optional: a missing file means defaults, and nothing is ever
//! written back.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::common::constants::config;

fn default_property_chunk_len() -> u32 {
    config::PROPERTY_CHUNK_LEN
}

fn default_max_property_chunks() -> u32 {
    config::MAX_PROPERTY_CHUNKS
}

fn default_title_fallback() -> bool {
    true
}

fn default_log_level() -> String {
    config::LOG_LEVEL.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    /// X display to connect to; `None` uses `$DISPLAY`
    #[serde(default)]
    pub display: Option<String>,

    /// Length of each property read, in 32-bit units
    #[serde(default = "default_property_chunk_len")]
    pub property_chunk_len: u32,

    /// Reads per property before the value is truncated
    #[serde(default = "default_max_property_chunks")]
    pub max_property_chunks: u32,

    /// Use `_NET_WM_NAME` when `WM_NAME` is missing or empty
    #[serde(default = "default_title_fallback")]
    pub title_fallback_net_wm_name: bool,

    /// Tracing filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            display: None,
            property_chunk_len: default_property_chunk_len(),
            max_property_chunks: default_max_property_chunks(),
            title_fallback_net_wm_name: default_title_fallback(),
            log_level: default_log_level(),
        }
    }
}

impl ToolConfig {
    /// `$XWT_CONFIG`, else `<config dir>/xwindowtools/config.json`
    pub fn path() -> PathBuf {
        if let Some(path) = std::env::var_os(config::PATH_ENV) {
            return PathBuf::from(path);
        }
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(config::APP_DIR);
        path.push(config::FILENAME);
        path
    }

    /// Load from [`ToolConfig::path`]
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    /// Load from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        let config: ToolConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse JSON from {:?}", path))?;

        config
            .validate()
            .with_context(|| format!("Invalid config in {:?}", path))?;

        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Like [`ToolConfig::load`] but never fails; problems are logged
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                warn!("Falling back to default config: {:#}", e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.property_chunk_len == 0 {
            anyhow::bail!("property_chunk_len must be greater than zero");
        }
        if self.max_property_chunks == 0 {
            anyhow::bail!("max_property_chunks must be greater than zero");
        }
        Ok(())
    }

    /// Apply a `--display` style override
    pub fn with_display(mut self, display: Option<String>) -> Self {
        if display.is_some() {
            self.display = display;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_is_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = ToolConfig::load_from(&temp_dir.path().join("config.json")).unwrap();
        assert_eq!(config, ToolConfig::default());
        assert!(!temp_dir.path().join("config.json").exists());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(br#"{"display": ":1", "title_fallback_net_wm_name": false}"#)
            .unwrap();

        let config = ToolConfig::load_from(&path).unwrap();
        assert_eq!(config.display.as_deref(), Some(":1"));
        assert!(!config.title_fallback_net_wm_name);
        assert_eq!(config.property_chunk_len, config::PROPERTY_CHUNK_LEN);
        assert_eq!(config.max_property_chunks, config::MAX_PROPERTY_CHUNKS);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_invalid_json_reports_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = ToolConfig::load_from(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("config.json"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"dispaly": ":0"}"#).unwrap();

        assert!(ToolConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_zero_chunk_len_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"property_chunk_len": 0}"#).unwrap();

        let err = ToolConfig::load_from(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("property_chunk_len"));
    }

    #[test]
    fn test_display_override_precedence() {
        let config = ToolConfig {
            display: Some(":0".to_string()),
            ..ToolConfig::default()
        };
        assert_eq!(
            config.clone().with_display(Some(":2".to_string())).display.as_deref(),
            Some(":2")
        );
        assert_eq!(config.with_display(None).display.as_deref(), Some(":0"));
    }
}
