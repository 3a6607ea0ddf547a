use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{PerpendicularRule, Result, TrackError};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub track: TrackConfig,
    pub editor: EditorConfig,
    pub export: ExportConfig,
}

impl AppConfig {
    /// Reads a JSON configuration file. Missing fields fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would make track generation meaningless.
    pub fn validate(&self) -> Result<()> {
        self.track.validate()?;
        self.editor.validate()
    }
}

/// Parameters that shape the generated track.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    pub width: f32,
    pub points_per_segment: u32,
    pub perpendicular: PerpendicularRule,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            width: 1.0,
            points_per_segment: 50,
            perpendicular: PerpendicularRule::Quadrant,
        }
    }
}

impl TrackConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(TrackError::invalid(format!(
                "track width must be positive, got {}",
                self.width
            )));
        }
        if self.points_per_segment == 0 {
            return Err(TrackError::invalid("points_per_segment must be at least 1"));
        }
        Ok(())
    }
}

/// Height controls of the sketch editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub max_height: f32,
    pub height_step: f32,
    pub initial_height: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_height: 5.0,
            height_step: 0.3,
            initial_height: 0.5,
        }
    }
}

impl EditorConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.max_height.is_finite() || self.max_height < 0.0 {
            return Err(TrackError::invalid(format!(
                "max_height must be non-negative, got {}",
                self.max_height
            )));
        }
        Ok(())
    }
}

/// Where generated artefacts land.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub animation_file: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            animation_file: "animation.txt".to_string(),
        }
    }
}
