//! Volume settings
//!
//! The volume-settings screen only flips the state machine; the actual
//! levels live here and are read by the audio layer. This is the only thing
//! the crate persists - game state itself is never saved.

use serde::{Deserialize, Serialize};

/// Volume step used by the up/down buttons
const VOLUME_STEP: f32 = 0.1;

/// Audio preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Master volume (0.0 - 1.0), applied to every sound
    pub master_volume: f32,
    /// Sound effects volume (hit, death, pickup cues)
    pub sfx_volume: f32,
    /// Background music volume
    pub music_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.4,
            sfx_volume: 0.8,
            music_volume: 0.45,
        }
    }
}

impl Settings {
    pub fn volume_up(&mut self) {
        self.master_volume = (self.master_volume + VOLUME_STEP).min(1.0);
    }

    pub fn volume_down(&mut self) {
        self.master_volume = (self.master_volume - VOLUME_STEP).max(0.0);
    }

    /// Master volume as a whole percentage for HUD display
    pub fn master_percent(&self) -> u32 {
        (self.master_volume * 100.0).round() as u32
    }

    /// Load settings from a JSON file, falling back to defaults if the file
    /// is missing or malformed. Bad preferences must never block gameplay.
    pub fn load(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("malformed settings file {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self, path: &std::path::Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }
}
