use crate::error::{GaraponError, Result};
use crate::palette::ROTATIONS;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Pacing and randomness knobs for a game process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Maximum animation frames shown per pick before the drum stops by itself.
    pub patience: u32,
    pub frame_interval_ms: u64,
    pub closing_frames: u32,
    pub closing_frame_ms: u64,
    pub closing_lead_in_ms: u64,
    pub closing_pause_ms: u64,
    /// Pins the colour rotation (1..=10). Chosen at random when unset.
    pub palette: Option<u8>,
    /// Seeds the shuffle generator. Drawn from entropy when unset.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            patience: 108,
            frame_interval_ms: 30,
            closing_frames: 30,
            closing_frame_ms: 150,
            closing_lead_in_ms: 1000,
            closing_pause_ms: 500,
            palette: None,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.patience == 0 {
            return Err(GaraponError::config("Patience must be at least one frame"));
        }

        if self.frame_interval_ms == 0 {
            return Err(GaraponError::config(
                "Frame interval must be greater than 0",
            ));
        }

        if let Some(rotation) = self.palette {
            if rotation == 0 || usize::from(rotation) > ROTATIONS.len() {
                return Err(GaraponError::config(format!(
                    "Palette must be between 1 and {}, got {}",
                    ROTATIONS.len(),
                    rotation
                )));
            }
        }

        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn closing_frame(&self) -> Duration {
        Duration::from_millis(self.closing_frame_ms)
    }

    pub fn closing_lead_in(&self) -> Duration {
        Duration::from_millis(self.closing_lead_in_ms)
    }

    pub fn closing_pause(&self) -> Duration {
        Duration::from_millis(self.closing_pause_ms)
    }
}
