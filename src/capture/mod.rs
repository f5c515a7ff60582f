//! Screen capture of the tuner region.
//!
//! This module provides:
//! - The capture seam (`CaptureBackend` opens a session, `FrameSource` grabs frames)
//! - The error kinds the trainer loop branches on
//! - The production screen backend (`ScreenCapture`)

pub mod screen;

pub use screen::ScreenCapture;

use image::RgbaImage;

use crate::calibration::CaptureRegion;

/// Why a capture did not produce a frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaptureError {
    /// The backend cannot capture at all (no display, unsupported platform).
    /// Ends the trainer loop.
    Unavailable(String),
    /// This one frame failed. The loop skips the iteration.
    Frame(String),
}

impl std::fmt::Display for CaptureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureError::Unavailable(msg) => write!(f, "Screen capture unavailable: {}", msg),
            CaptureError::Frame(msg) => write!(f, "Frame capture failed: {}", msg),
        }
    }
}

impl std::error::Error for CaptureError {}

/// An open capture session. Resources are released on drop.
pub trait FrameSource {
    /// Captures `region` of the screen as RGBA. Blocks for the capture latency.
    fn capture(&mut self, region: &CaptureRegion) -> Result<RgbaImage, CaptureError>;
}

/// Opens capture sessions; one session is opened per trainer loop.
pub trait CaptureBackend: Send + Sync {
    fn open(&self) -> Result<Box<dyn FrameSource>, CaptureError>;
}
