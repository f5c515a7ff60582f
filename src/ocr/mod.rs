pub mod engine;
pub mod preprocess;
pub mod setup;

pub use engine::TesseractRecognizer;
pub use preprocess::{binarize, DEFAULT_THRESHOLD};

use image::GrayImage;

/// Why recognition produced no text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecognizeError {
    /// The OCR engine is missing or unusable. Ends the drill session.
    EngineNotFound(String),
    /// This one image could not be recognized.
    Failed(String),
}

impl std::fmt::Display for RecognizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecognizeError::EngineNotFound(msg) => write!(f, "OCR engine not found: {}", msg),
            RecognizeError::Failed(msg) => write!(f, "OCR failed: {}", msg),
        }
    }
}

impl std::error::Error for RecognizeError {}

/// Converts a binarized image into a short line of text.
pub trait TextRecognizer: Send + Sync {
    /// Returns the trimmed recognized text, possibly empty.
    fn recognize(&self, img: &GrayImage) -> Result<String, RecognizeError>;
}
