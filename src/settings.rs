//! User settings and preferences
//!
//! Persisted as JSON, separately from the puzzle (puzzle state itself is
//! never saved).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Restricts which screen axes a puzzle drag may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DragMode {
    /// Use the full drag vector
    #[default]
    Auto,
    /// Only horizontal movement counts
    Horizontal,
    /// Only vertical movement counts
    Vertical,
}

impl DragMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DragMode::Auto => "auto",
            DragMode::Horizontal => "horizontal",
            DragMode::Vertical => "vertical",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(DragMode::Auto),
            "horizontal" | "h" => Some(DragMode::Horizontal),
            "vertical" | "v" => Some(DragMode::Vertical),
            _ => None,
        }
    }

    /// Apply the restriction to a screen-space drag delta
    pub fn constrain(&self, dx: f32, dy: f32) -> (f32, f32) {
        match self {
            DragMode::Auto => (dx, dy),
            DragMode::Horizontal => (dx, 0.0),
            DragMode::Vertical => (0.0, dy),
        }
    }
}

/// Puzzle settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Input ===
    /// Drag restriction for puzzle turns
    pub drag_mode: DragMode,
    /// Pointer travel (pixels) before a drag becomes a turn
    pub drag_threshold: f32,

    // === Camera ===
    /// Arcball rotation multiplier (0.05 - 5)
    pub camera_sensitivity: f32,
    /// Zoom velocity per wheel unit
    pub zoom_speed: f32,

    // === Puzzle ===
    /// Layer turn speed (radians/sec)
    pub turn_speed: f32,
    /// Turns per scramble
    pub scramble_length: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            drag_mode: DragMode::Auto,
            drag_threshold: DRAG_THRESHOLD,

            camera_sensitivity: 1.0,
            zoom_speed: ZOOM_SPEED,

            turn_speed: TURN_SPEED,
            scramble_length: SCRAMBLE_LENGTH,
        }
    }
}

impl Settings {
    /// Effective camera sensitivity (clamped to the supported range)
    pub fn effective_camera_sensitivity(&self) -> f32 {
        if self.camera_sensitivity.is_finite() {
            self.camera_sensitivity.clamp(MIN_SENSITIVITY, MAX_SENSITIVITY)
        } else {
            1.0
        }
    }

    /// Effective turn speed (non-positive speeds would never finish a turn)
    pub fn effective_turn_speed(&self) -> f32 {
        if self.turn_speed.is_finite() && self.turn_speed > 0.0 {
            self.turn_speed
        } else {
            TURN_SPEED
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::info!("Using default settings ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings as JSON
    pub fn save_to(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
