//! Trainer loop - the background capture → recognize → match cycle.
//!
//! One loop runs per drill session on its own thread. It never touches
//! controller state: it reads the current target through `SharedTarget`
//! and reports through the event channel. The thread is detached; stopping
//! clears the running flag, which the loop checks every cycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crate::calibration::CaptureRegion;
use crate::capture::{CaptureBackend, CaptureError, FrameSource};
use crate::drill::{is_correct, PitchClass};
use crate::ocr::{binarize, RecognizeError, TextRecognizer};

use super::events::{SessionEvent, TrainerEvent};
use super::TrainerTiming;

/// The pitch class the loop matches against. Written only by the controller;
/// `None` while no answer should be accepted.
pub type SharedTarget = Arc<Mutex<Option<PitchClass>>>;

/// Longest single sleep, so a stop request is seen promptly.
const SLEEP_SLICE: Duration = Duration::from_millis(20);

/// Everything a loop needs, moved onto the worker thread.
pub struct LoopConfig {
    pub session: u64,
    pub region: CaptureRegion,
    pub timing: TrainerTiming,
    pub target: SharedTarget,
    pub events: Sender<SessionEvent>,
    pub capture: Arc<dyn CaptureBackend>,
    pub recognizer: Arc<dyn TextRecognizer>,
}

/// Controller-side handle to a running loop.
pub struct LoopHandle {
    pub(super) running: Arc<AtomicBool>,
    pub(super) finished: Arc<AtomicBool>,
}

impl LoopHandle {
    /// Asks the loop to stop after its current cycle.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// True once the worker thread has left the loop.
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }
}

/// Result of one capture → recognize → match cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IterationOutcome {
    /// Capture failed for this frame
    Skipped,
    /// Nothing recognized, or a transient OCR failure
    NoText,
    /// Text recognized but not the target (or no target set)
    Unmatched(String),
    /// Text matched the target
    Correct(String),
    /// The loop cannot continue
    Fatal(TrainerEvent),
}

/// Starts a loop on a new detached thread.
pub fn spawn_trainer_loop(config: LoopConfig) -> LoopHandle {
    let running = Arc::new(AtomicBool::new(true));
    let finished = Arc::new(AtomicBool::new(false));

    let running_clone = running.clone();
    let finished_clone = finished.clone();
    thread::spawn(move || {
        run_trainer_loop(&config, &running_clone);
        running_clone.store(false, Ordering::SeqCst);
        finished_clone.store(true, Ordering::SeqCst);
    });

    LoopHandle { running, finished }
}

/// Runs the loop until `running` is cleared or a fatal error occurs.
///
/// Opens a capture session for the lifetime of the loop. Fatal conditions
/// are reported exactly once, after which the loop clears `running` and
/// returns.
pub fn run_trainer_loop(config: &LoopConfig, running: &AtomicBool) {
    crate::log(&format!(
        "Trainer loop {}: started, region {}",
        config.session, config.region
    ));

    let mut source = match config.capture.open() {
        Ok(source) => source,
        Err(e) => {
            crate::log(&format!("Trainer loop {}: {}", config.session, e));
            let _ = config.events.send(SessionEvent::new(
                config.session,
                TrainerEvent::CaptureUnavailable(e.to_string()),
            ));
            running.store(false, Ordering::SeqCst);
            return;
        }
    };

    let mut iterations: u64 = 0;
    while running.load(Ordering::SeqCst) {
        iterations += 1;
        let target = current_target(&config.target);

        match run_iteration(
            source.as_mut(),
            config.recognizer.as_ref(),
            &config.region,
            config.timing.binarize_threshold,
            target,
        ) {
            IterationOutcome::Correct(text) => {
                crate::log(&format!(
                    "Trainer loop {}: correct answer \"{}\"",
                    config.session, text
                ));
                let event = TrainerEvent::CorrectMatch { recognized: text };
                if config.events.send(SessionEvent::new(config.session, event)).is_err() {
                    break;
                }
                sleep_while_running(running, config.timing.match_cooldown);
            }
            IterationOutcome::Fatal(event) => {
                crate::log(&format!(
                    "Trainer loop {}: stopping on {:?}",
                    config.session, event
                ));
                let _ = config.events.send(SessionEvent::new(config.session, event));
                running.store(false, Ordering::SeqCst);
                break;
            }
            IterationOutcome::Skipped
            | IterationOutcome::NoText
            | IterationOutcome::Unmatched(_) => {}
        }

        sleep_while_running(running, config.timing.poll_interval);
    }

    crate::log(&format!(
        "Trainer loop {}: stopped after {} cycles",
        config.session, iterations
    ));
}

/// One capture → binarize → recognize → match cycle.
pub fn run_iteration(
    source: &mut dyn FrameSource,
    recognizer: &dyn TextRecognizer,
    region: &CaptureRegion,
    threshold: u8,
    target: Option<PitchClass>,
) -> IterationOutcome {
    let frame = match source.capture(region) {
        Ok(frame) => frame,
        Err(CaptureError::Unavailable(msg)) => {
            return IterationOutcome::Fatal(TrainerEvent::CaptureUnavailable(msg));
        }
        Err(e) => {
            crate::log(&format!("Trainer loop: {}", e));
            return IterationOutcome::Skipped;
        }
    };

    let binary = binarize(&frame, threshold);

    let text = match recognizer.recognize(&binary) {
        Ok(text) => text,
        Err(RecognizeError::EngineNotFound(msg)) => {
            return IterationOutcome::Fatal(TrainerEvent::RecognizerUnavailable(msg));
        }
        Err(e) => {
            crate::log(&format!("Trainer loop: {}", e));
            return IterationOutcome::NoText;
        }
    };

    if text.is_empty() {
        return IterationOutcome::NoText;
    }

    match target {
        Some(target) if is_correct(&text, &target) => IterationOutcome::Correct(text),
        _ => IterationOutcome::Unmatched(text),
    }
}

fn current_target(target: &SharedTarget) -> Option<PitchClass> {
    target.lock().map(|t| *t).unwrap_or(None)
}

/// Sleeps for `duration` in short slices, returning early once `running` is cleared.
fn sleep_while_running(running: &AtomicBool, duration: Duration) {
    let deadline = Instant::now() + duration;
    loop {
        if !running.load(Ordering::SeqCst) {
            return;
        }
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        thread::sleep((deadline - now).min(SLEEP_SLICE));
    }
}
