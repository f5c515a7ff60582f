//! The drill session: background sampling loop and the state machine the UI drives.
//!
//! This module provides:
//! - `TrainerController`, the Idle/Calibrating/Running/PausedOnCorrect state machine
//! - The capture → binarize → recognize → match loop on a worker thread
//! - The worker → controller event channel

pub mod controller;
pub mod events;
pub mod runner;
pub mod state;

#[cfg(test)]
mod testing;

pub use controller::{Backends, Notice, NoticeLevel, StatusTone, TrainerController};
pub use state::TrainerState;

use std::time::Duration;

/// Timing and preprocessing parameters shared by the loop and the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrainerTiming {
    /// Sleep between capture cycles
    pub poll_interval: Duration,
    /// Extra sleep after a correct match so the same overlay is not matched twice
    pub match_cooldown: Duration,
    /// Time the success feedback stays up before the next prompt
    pub advance_delay: Duration,
    /// Binarization cut-off passed to the preprocessor
    pub binarize_threshold: u8,
}

impl Default for TrainerTiming {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            match_cooldown: Duration::from_millis(1000),
            advance_delay: Duration::from_millis(1000),
            binarize_threshold: crate::ocr::DEFAULT_THRESHOLD,
        }
    }
}
