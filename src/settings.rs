//! Optional tuning knobs for the trainer.
//!
//! Loaded from settings.json next to the executable. Every field has a
//! default, so a missing or partial file is fine.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ocr::DEFAULT_THRESHOLD;
use crate::trainer::TrainerTiming;

/// Settings that are not part of the calibrated region.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerSettings {
    /// Explicit Tesseract executable; searched for when unset
    pub tesseract_path: Option<PathBuf>,
    /// Explicit tessdata directory; searched for when unset
    pub tessdata_dir: Option<PathBuf>,
    /// Luma below this becomes black before OCR
    pub binarize_threshold: u8,
    /// Pause between capture cycles (milliseconds)
    pub poll_interval_ms: u64,
    /// Pause after a correct match before polling again (milliseconds)
    pub match_cooldown_ms: u64,
    /// How long the success feedback stays before the next prompt (milliseconds)
    pub advance_delay_ms: u64,
}

impl Default for TrainerSettings {
    fn default() -> Self {
        Self {
            tesseract_path: None,
            tessdata_dir: None,
            binarize_threshold: DEFAULT_THRESHOLD,
            poll_interval_ms: 100,
            match_cooldown_ms: 1000,
            advance_delay_ms: 1000,
        }
    }
}

impl TrainerSettings {
    pub fn timing(&self) -> TrainerTiming {
        TrainerTiming {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            match_cooldown: Duration::from_millis(self.match_cooldown_ms),
            advance_delay: Duration::from_millis(self.advance_delay_ms),
            binarize_threshold: self.binarize_threshold,
        }
    }
}

/// Loads settings from `path`, falling back to defaults on any problem.
pub fn load_settings(path: &Path) -> TrainerSettings {
    crate::log(&format!("Looking for settings at: {}", path.display()));

    if !path.exists() {
        crate::log("settings.json not found. Using default settings.");
        return TrainerSettings::default();
    }

    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(settings) => {
                crate::log("Settings loaded from settings.json");
                settings
            }
            Err(e) => {
                crate::log(&format!(
                    "Failed to parse settings.json: {}. Using defaults.",
                    e
                ));
                TrainerSettings::default()
            }
        },
        Err(e) => {
            crate::log(&format!(
                "Failed to read settings.json: {}. Using defaults.",
                e
            ));
            TrainerSettings::default()
        }
    }
}
