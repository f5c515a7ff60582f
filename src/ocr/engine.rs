use image::GrayImage;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tempfile::NamedTempFile;

use super::setup::{resolve_tesseract, tesseract_command, TesseractPaths};
use super::{RecognizeError, TextRecognizer};

/// Characters a tuner can show for a note name, including the `/` of
/// combined renderings such as `A#/Bb`.
pub const NOTE_WHITELIST: &str = "ABCDEFG#b/";

/// Tesseract stderr fragment printed when language data is missing.
const MISSING_DATA_MARKER: &str = "Error opening data file";

/// Recognizes note names by running the Tesseract CLI once per image.
pub struct TesseractRecognizer {
    configured_exe: Option<PathBuf>,
    configured_tessdata: Option<PathBuf>,
    resolved: OnceLock<TesseractPaths>,
}

impl TesseractRecognizer {
    pub fn new(configured_exe: Option<PathBuf>, configured_tessdata: Option<PathBuf>) -> Self {
        Self {
            configured_exe,
            configured_tessdata,
            resolved: OnceLock::new(),
        }
    }

    /// Resolves the engine on first use and caches the result.
    /// A failed lookup is retried on the next call.
    fn paths(&self) -> Result<&TesseractPaths, RecognizeError> {
        if let Some(paths) = self.resolved.get() {
            return Ok(paths);
        }

        let paths = resolve_tesseract(
            self.configured_exe.as_deref(),
            self.configured_tessdata.as_deref(),
        )
        .ok_or_else(|| {
            RecognizeError::EngineNotFound(
                "Tesseract-OCR is not installed or could not be located".to_string(),
            )
        })?;

        Ok(self.resolved.get_or_init(|| paths))
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, img: &GrayImage) -> Result<String, RecognizeError> {
        let paths = self.paths()?;

        let temp_input = NamedTempFile::with_suffix(".png")
            .map_err(|e| RecognizeError::Failed(format!("Failed to create temp file: {}", e)))?;
        img.save(temp_input.path())
            .map_err(|e| RecognizeError::Failed(format!("Failed to write image: {}", e)))?;

        let output = tesseract_command(&paths.executable)
            .args(build_args(temp_input.path(), paths.tessdata.as_deref()))
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RecognizeError::EngineNotFound(format!(
                        "{} could not be started: {}",
                        paths.executable.display(),
                        e
                    ))
                } else {
                    RecognizeError::Failed(format!("Failed to run Tesseract: {}", e))
                }
            })?;

        if !output.status.success() {
            return Err(classify_failure(&String::from_utf8_lossy(&output.stderr)));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Command line for single-line recognition restricted to note characters.
fn build_args(input: &Path, tessdata: Option<&Path>) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![input.into(), "stdout".into()];

    if let Some(dir) = tessdata {
        args.push("--tessdata-dir".into());
        args.push(dir.into());
    }

    args.extend(
        [
            "-l".to_string(),
            "eng".to_string(),
            "--oem".to_string(),
            "3".to_string(),
            // Treat the image as a single text line
            "--psm".to_string(),
            "7".to_string(),
            "-c".to_string(),
            format!("tessedit_char_whitelist={}", NOTE_WHITELIST),
        ]
        .into_iter()
        .map(OsString::from),
    );

    args
}

/// Maps a non-zero Tesseract exit to an error kind.
///
/// Missing language data means the installation is unusable, which is as
/// fatal as a missing executable.
fn classify_failure(stderr: &str) -> RecognizeError {
    let stderr = stderr.trim();
    if stderr.contains(MISSING_DATA_MARKER) {
        RecognizeError::EngineNotFound(format!("Tesseract language data missing: {}", stderr))
    } else {
        RecognizeError::Failed(format!("Tesseract failed: {}", stderr))
    }
}
