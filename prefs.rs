/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Editor preferences loaded from TOML.
//!
//! Every field has a default, so a file only needs the keys it changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::inp::{DEFAULT_PLACEHOLDER_EXTENT, ExportOptions, export::DEFAULT_TITLE};
use crate::store::DEFAULT_MAX_DEPTH;

const APP_DIR: &str = "hydranet";
const PREFS_FILE: &str = "editor.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorPreferences {
    /// Undo steps kept.
    pub history_depth: usize,
    pub grid_size: f64,
    pub snap_to_grid: bool,
    pub show_grid: bool,
    /// Click/placement snap tolerance, canvas units.
    pub snap_radius: f64,
    pub hover_radius: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub fit_padding: f64,
    /// Side of the square that imported nodes without coordinates land in.
    pub placeholder_extent: f64,
    pub export_title: String,
    pub export_coordinates: bool,
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            history_depth: DEFAULT_MAX_DEPTH,
            grid_size: 10.0,
            snap_to_grid: true,
            show_grid: true,
            snap_radius: 25.0,
            hover_radius: 30.0,
            min_zoom: 0.1,
            max_zoom: 5.0,
            fit_padding: 50.0,
            placeholder_extent: DEFAULT_PLACEHOLDER_EXTENT,
            export_title: DEFAULT_TITLE.to_string(),
            export_coordinates: false,
        }
    }
}

/// Errors from loading or saving preferences
#[derive(Debug)]
pub enum PrefsError {
    Io(String),
    Parse(String),
    Invalid(String),
}

impl std::fmt::Display for PrefsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrefsError::Io(e) => write!(f, "IO error: {e}"),
            PrefsError::Parse(e) => write!(f, "Parse error: {e}"),
            PrefsError::Invalid(e) => write!(f, "Invalid preferences: {e}"),
        }
    }
}

impl std::error::Error for PrefsError {}

impl EditorPreferences {
    pub fn from_toml_str(content: &str) -> Result<Self, PrefsError> {
        let prefs: Self = toml::from_str(content).map_err(|e| PrefsError::Parse(e.to_string()))?;
        prefs.validate()?;
        Ok(prefs)
    }

    pub fn to_toml_string(&self) -> Result<String, PrefsError> {
        toml::to_string_pretty(self).map_err(|e| PrefsError::Parse(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, PrefsError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PrefsError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Load from [`EditorPreferences::default_path`], falling back to
    /// defaults when there is no config directory or no file yet.
    pub fn load_or_default() -> Result<Self, PrefsError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PrefsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PrefsError::Io(e.to_string()))?;
        }
        std::fs::write(path, self.to_toml_string()?).map_err(|e| PrefsError::Io(e.to_string()))
    }

    pub fn default_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join(APP_DIR).join(PREFS_FILE))
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            title: self.export_title.clone(),
            coordinates: self.export_coordinates,
        }
    }

    fn validate(&self) -> Result<(), PrefsError> {
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom) {
            return Err(PrefsError::Invalid(format!(
                "zoom range {}..{} is empty or non-positive",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.grid_size < 0.0 || self.snap_radius < 0.0 || self.hover_radius < 0.0 {
            return Err(PrefsError::Invalid(
                "grid size and radii must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
