//! Tracker configuration.
//!
//! Selects the category, game version and tracking mode, and where the
//! tracker reads and writes its files. Loaded from a TOML file; a missing or
//! unreadable file yields the defaults, and a missing file at the default
//! location is written out on first start.

use aatrack_common::Category;
use aatrack_core::TrackingMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration file name.
const CONFIG_FILE: &str = "aatrack.toml";

/// Directory name under the platform config dir.
const APP_DIR: &str = "aatrack";

/// Tracker configuration parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    // === Tracking ===
    /// Category display name
    pub category: Category,
    /// Game version string, e.g. "1.21" or a snapshot name
    pub game_version: String,
    /// Read progress from snapshots or from the manual checklist
    pub tracking_mode: TrackingMode,

    // === Files ===
    /// RON manifest of the advancements to track
    pub manifest_path: PathBuf,
    /// JSON snapshot written by the save reader
    pub snapshot_path: PathBuf,
    /// Folder holding `checklist_{version}.txt` files
    pub checklist_folder: PathBuf,
    /// JSON file with pinned objective lists
    pub pinned_path: PathBuf,

    // === Loop ===
    /// Milliseconds between ticks
    pub poll_interval_ms: u64,
    /// Stop after this many ticks (None = run until killed)
    pub max_ticks: Option<u64>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        let data = data_dir();
        Self {
            category: Category::AllAdvancements,
            game_version: "1.21".to_string(),
            tracking_mode: TrackingMode::Automatic,

            manifest_path: PathBuf::from("assets/advancements.ron"),
            snapshot_path: PathBuf::from("snapshot.json"),
            checklist_folder: data.join("checklists"),
            pinned_path: data.join("pinned.json"),

            poll_interval_ms: 1000,
            max_ticks: None,
        }
    }
}

impl TrackerConfig {
    /// Load configuration from a specific path.
    /// Returns default config if the file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            },
        };

        match toml::from_str::<Self>(&contents) {
            Ok(mut config) => {
                config.validate();
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to parse config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Default configuration file path.
    #[must_use]
    pub fn config_path() -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from(CONFIG_FILE),
            |dir| dir.join(APP_DIR).join(CONFIG_FILE),
        )
    }

    /// Clamp values to sensible ranges.
    pub fn validate(&mut self) {
        self.poll_interval_ms = self.poll_interval_ms.clamp(50, 60_000);
        self.game_version = self.game_version.trim().to_string();
        if self.game_version.is_empty() {
            self.game_version = Self::default().game_version;
        }
    }
}

/// Platform data directory for tracker files.
fn data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from("."), |dir| dir.join(APP_DIR))
}
