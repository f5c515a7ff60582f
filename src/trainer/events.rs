//! Channel for passing loop events from the worker thread to the controller.
//!
//! Uses std::sync::mpsc: the trainer loop is the only producer, the
//! controller drains it from the UI thread. Every event carries the session
//! number of the loop that sent it so the controller can drop events from a
//! loop it has already stopped.

use std::sync::mpsc::{channel, Receiver, Sender};

/// Something the trainer loop wants the controller to act on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrainerEvent {
    /// The recognized text matched the current target
    CorrectMatch { recognized: String },
    /// The OCR engine is missing; the loop has stopped
    RecognizerUnavailable(String),
    /// The capture backend cannot be used; the loop has stopped
    CaptureUnavailable(String),
}

/// A `TrainerEvent` tagged with the session that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionEvent {
    pub session: u64,
    pub event: TrainerEvent,
}

impl SessionEvent {
    pub fn new(session: u64, event: TrainerEvent) -> Self {
        Self { session, event }
    }
}

/// Creates the worker → controller channel.
///
/// Unbounded; the loop sends at most one event per polling cycle.
pub fn create_event_channel() -> (Sender<SessionEvent>, Receiver<SessionEvent>) {
    channel()
}
