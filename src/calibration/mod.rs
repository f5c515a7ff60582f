//! Calibration of the screen region the tuner renders its note name into.
//!
//! The user drags a rectangle on a full-screen overlay; the rectangle is
//! normalized, validated against a minimum size and persisted so later runs
//! can skip straight to the drill.

pub mod overlay;
pub mod region;
pub mod store;

pub use overlay::{DragSelection, ScreenPoint};
pub use region::{CaptureRegion, RegionError};
pub use store::RegionStore;

use anyhow::Result;

/// Why a calibration attempt did not produce a region.
#[derive(Debug)]
pub enum CalibrationFailure {
    /// The dragged rectangle was smaller than `MIN_DIM` on some axis.
    Rejected(RegionError),
    /// The region was valid but could not be written to disk.
    Persist(anyhow::Error),
}

impl std::fmt::Display for CalibrationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalibrationFailure::Rejected(e) => write!(f, "{}", e),
            CalibrationFailure::Persist(e) => write!(f, "Failed to save capture region: {}", e),
        }
    }
}

impl std::error::Error for CalibrationFailure {}

/// Completes a drag: normalizes and validates the rectangle, then persists it.
///
/// A rejected rectangle never touches the store, so a previously saved region
/// stays in place.
pub fn finish_calibration(
    store: &RegionStore,
    start: ScreenPoint,
    end: ScreenPoint,
) -> Result<CaptureRegion, CalibrationFailure> {
    let region = CaptureRegion::from_drag(start, end).map_err(CalibrationFailure::Rejected)?;
    store.save(&region).map_err(CalibrationFailure::Persist)?;
    crate::log(&format!("Calibration: region saved {}", region));
    Ok(region)
}
