//! Caseboard Configuration Module
//!
//! Persistent configuration for the canvas. Stored in
//! `~/.config/caseboard/config.toml`; defaults are used when the file does
//! not exist, a malformed file is an error.
//!
//! The canvas exclusion list lives here on purpose: which tools are hidden
//! from the canvas palette is policy data owned by deployment, not logic
//! baked into the core.

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{CaseboardError, Result};

/// Grid spacing used by auto-layout.
///
/// The node box itself is fixed at [`crate::geometry::NODE_WIDTH`] x
/// [`crate::geometry::NODE_HEIGHT`]; only the gaps around it are
/// configurable, so anchors and grid placement can never disagree about
/// the box size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutSettings {
    /// Horizontal gap between grid columns
    pub h_spacing: f64,
    /// Vertical gap between grid rows
    pub v_spacing: f64,
    /// Nodes per row in auto-layout
    pub row_width: usize,
    /// Margin from the canvas origin
    pub margin: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            h_spacing: 80.0,
            v_spacing: 60.0,
            row_width: 3,
            margin: 50.0,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CanvasConfig {
    /// Tool ids hidden from the canvas palette (collaboration/CMS-style
    /// tools that make no sense as pipeline stages)
    pub excluded_tool_ids: Vec<String>,

    /// Layout constants
    pub layout: LayoutSettings,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            excluded_tool_ids: [
                "ai-assistant",
                "mattermost",
                "nextcloud",
                "webtop",
                "meedan-check",
                "ushahidi",
                "n8n",
                "superdesk",
                "ghost-ye",
                "erpnext",
                "openproject",
                "moodle",
                "bigbluebutton",
                "tooljet",
                "chatwoot",
                "nocodb",
                "civicrm",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            layout: LayoutSettings::default(),
        }
    }
}

impl CanvasConfig {
    /// Get the config directory path
    ///
    /// Returns `~/.config/caseboard/` on Unix, `%APPDATA%/caseboard/` on Windows
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("caseboard")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from the default path
    ///
    /// Returns default config if the file doesn't exist.
    /// Returns error if the file exists but is malformed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| CaseboardError::ConfigError {
            reason: format!("Failed to read config file: {}", e),
        })?;

        toml::from_str(&content).map_err(|e| CaseboardError::ConfigError {
            reason: format!("Failed to parse config file: {}", e),
        })
    }

    /// Save configuration to the default path, creating the directory if needed
    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir();
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| CaseboardError::ConfigError {
                reason: format!("Failed to create config directory: {}", e),
            })?;
        }
        self.save_to(&Self::config_path())
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| CaseboardError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(path, content).map_err(|e| CaseboardError::ConfigError {
            reason: format!("Failed to write config file: {}", e),
        })?;

        Ok(())
    }

    /// The exclusion list as a lookup set
    pub fn excluded_set(&self) -> FxHashSet<String> {
        self.excluded_tool_ids.iter().cloned().collect()
    }
}
