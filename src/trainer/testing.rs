//! Fake capture and recognition backends for loop and controller tests.

use image::{GrayImage, RgbaImage};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::calibration::CaptureRegion;
use crate::capture::{CaptureBackend, CaptureError, FrameSource};
use crate::ocr::{RecognizeError, TextRecognizer};

use super::TrainerTiming;

/// Capture backend producing blank frames, or failing in a chosen way.
pub struct FakeCapture {
    pub open_error: Option<CaptureError>,
    pub frame_error: Option<CaptureError>,
}

impl FakeCapture {
    pub fn working() -> Self {
        Self {
            open_error: None,
            frame_error: None,
        }
    }
}

impl CaptureBackend for FakeCapture {
    fn open(&self) -> Result<Box<dyn FrameSource>, CaptureError> {
        match &self.open_error {
            Some(e) => Err(e.clone()),
            None => Ok(Box::new(FakeFrames {
                error: self.frame_error.clone(),
            })),
        }
    }
}

pub struct FakeFrames {
    pub error: Option<CaptureError>,
}

impl FrameSource for FakeFrames {
    fn capture(&mut self, region: &CaptureRegion) -> Result<RgbaImage, CaptureError> {
        match &self.error {
            Some(e) => Err(e.clone()),
            None => Ok(RgbaImage::new(region.width(), region.height())),
        }
    }
}

/// Recognizer returning a settable result and counting calls.
pub struct ScriptedRecognizer {
    result: Mutex<Result<String, RecognizeError>>,
    calls: AtomicUsize,
    delay: Duration,
}

impl ScriptedRecognizer {
    pub fn returning(result: Result<String, RecognizeError>) -> Self {
        Self {
            result: Mutex::new(result),
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    /// Makes every call block for `delay`, like a slow OCR run.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn text(text: &str) -> Self {
        Self::returning(Ok(text.to_string()))
    }

    pub fn set(&self, result: Result<String, RecognizeError>) {
        *self.result.lock().unwrap() = result;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextRecognizer for ScriptedRecognizer {
    fn recognize(&self, _img: &GrayImage) -> Result<String, RecognizeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(self.delay);
        self.result.lock().unwrap().clone()
    }
}

pub fn fast_timing() -> TrainerTiming {
    TrainerTiming {
        poll_interval: Duration::from_millis(5),
        match_cooldown: Duration::from_millis(200),
        advance_delay: Duration::from_millis(50),
        binarize_threshold: 128,
    }
}

pub fn test_region() -> CaptureRegion {
    CaptureRegion::new(0, 0, 40, 20).unwrap()
}

/// Polls `check` until it returns true or five seconds pass.
pub fn wait_until(mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    check()
}
