//! The validated screen rectangle sampled by the trainer.

use serde::{Deserialize, Serialize};

use super::overlay::ScreenPoint;

/// Minimum width and height of a capture region, in pixels.
pub const MIN_DIM: u32 = 10;

/// A screen rectangle in physical pixels.
///
/// Always at least `MIN_DIM` wide and tall; the only ways to build one are
/// `new`, `from_drag` and deserialization, all of which validate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRegion")]
pub struct CaptureRegion {
    top: u32,
    left: u32,
    width: u32,
    height: u32,
}

/// Unvalidated on-disk form.
#[derive(Deserialize)]
struct RawRegion {
    top: u32,
    left: u32,
    width: u32,
    height: u32,
}

impl TryFrom<RawRegion> for CaptureRegion {
    type Error = RegionError;

    fn try_from(raw: RawRegion) -> Result<Self, Self::Error> {
        CaptureRegion::new(raw.top, raw.left, raw.width, raw.height)
    }
}

/// A rectangle that cannot be used as a capture region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegionError {
    TooSmall { width: u32, height: u32 },
}

impl std::fmt::Display for RegionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionError::TooSmall { width, height } => write!(
                f,
                "Region {}x{} is too small (minimum {}x{})",
                width, height, MIN_DIM, MIN_DIM
            ),
        }
    }
}

impl std::error::Error for RegionError {}

impl CaptureRegion {
    pub fn new(top: u32, left: u32, width: u32, height: u32) -> Result<Self, RegionError> {
        if width < MIN_DIM || height < MIN_DIM {
            return Err(RegionError::TooSmall { width, height });
        }
        Ok(Self {
            top,
            left,
            width,
            height,
        })
    }

    /// Builds a region from the two corners of a drag, in either direction.
    ///
    /// Points are physical pixels; negative coordinates are clamped to 0 and
    /// fractions truncated.
    pub fn from_drag(start: ScreenPoint, end: ScreenPoint) -> Result<Self, RegionError> {
        let (x0, y0) = (to_pixel(start.0), to_pixel(start.1));
        let (x1, y1) = (to_pixel(end.0), to_pixel(end.1));

        Self::new(y0.min(y1), x0.min(x1), x0.abs_diff(x1), y0.abs_diff(y1))
    }

    pub fn top(&self) -> u32 {
        self.top
    }

    pub fn left(&self) -> u32 {
        self.left
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl std::fmt::Display for CaptureRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{} at ({}, {})",
            self.width, self.height, self.left, self.top
        )
    }
}

fn to_pixel(value: f32) -> u32 {
    // `as` saturates: NaN and negatives become 0.
    value as u32
}
