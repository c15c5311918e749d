//! Settings file
//!
//! `settings.json` under the platform config directory. Every field has a
//! default, so a partial or missing file is fine.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use placedesk_core::DEFAULT_PAGE_SIZE;
use placedesk_table::DEFAULT_SKELETON_ROWS;
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "placedesk";
const SETTINGS_FILE: &str = "settings.json";

pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .context("Could not determine config directory")
        .map(|p| p.join(APP_DIR))
}

pub fn settings_file() -> Result<PathBuf> {
    config_dir().map(|p| p.join(SETTINGS_FILE))
}

/// The file named on the command line, or the default location
pub fn resolve_settings_file(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => settings_file(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Page size used when the location does not specify one
    pub default_page_size: usize,
    pub skeleton_rows: usize,
    /// Where downloads are saved; defaults to the user's download directory
    pub export_dir: Option<PathBuf>,
    /// Filter used when `RUST_LOG` is not set
    pub log_filter: String,
    /// Also write JSON logs to `log_dir`
    pub json_logs: bool,
    pub log_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            skeleton_rows: DEFAULT_SKELETON_ROWS,
            export_dir: None,
            log_filter: "warn,placedesk_app=info,placedesk_table=info,placedesk_export=info"
                .to_string(),
            json_logs: false,
            log_dir: None,
        }
    }
}

impl Settings {
    /// Load from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {:?}", path))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file: {:?}", path))
    }

    /// Write the settings as pretty JSON, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write settings file: {:?}", path))?;
        tracing::info!(path = %path.display(), "Saved settings");
        Ok(())
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
                .join("logs")
        })
    }
}
