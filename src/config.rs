//! Configuration persistence for editor defaults

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::{ImageSaveLocation, ShapeColor};

/// Editor defaults persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Color for new shapes
    pub stroke_color: ShapeColor,
    /// Stroke width for arrows, rectangles and ellipses (backing pixels)
    pub line_width: f32,
    /// Font size for new text, in display pixels
    pub font_size: f32,
    /// Color of the dashed selection indicator
    pub selection_color: ShapeColor,
    /// Font used to draw text annotations (system fonts when unset)
    pub font_path: Option<PathBuf>,
    /// Where exported images are saved
    pub save_location: ImageSaveLocation,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            stroke_color: ShapeColor::RED,
            line_width: 3.0,
            font_size: 24.0,
            selection_color: ShapeColor::rgb(0x00, 0x66, 0xFF),
            font_path: None,
            save_location: ImageSaveLocation::Pictures,
        }
    }
}

impl EditorConfig {
    /// Directory name under the platform config dir
    pub const APP_DIR: &'static str = "snipmark";

    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::APP_DIR).join("config.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            log::warn!("No config directory available, using defaults");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:#}", err);
                Self::default()
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self) {
        let Some(path) = Self::default_path() else {
            log::error!("No config directory available for saving");
            return;
        };
        if let Err(err) = self.save_to(&path) {
            log::error!("Failed to save config: {:#}", err);
        }
    }

    /// Read a config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = serde_json::from_str(&json)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Write a config file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}
