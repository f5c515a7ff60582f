//! Trainer controller - the state machine behind the main window.
//!
//! Owns the `TrainerState`, the capture region and the current prompt. The
//! UI thread calls the `request_*` methods on button presses and `tick` every
//! frame; `tick` drains loop events and fires the pending advance timer.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::calibration::{self, CalibrationFailure, CaptureRegion, RegionStore, ScreenPoint};
use crate::capture::CaptureBackend;
use crate::drill::Prompt;
use crate::ocr::TextRecognizer;

use super::events::{create_event_channel, SessionEvent, TrainerEvent};
use super::runner::{spawn_trainer_loop, LoopConfig, LoopHandle, SharedTarget};
use super::state::TrainerState;
use super::TrainerTiming;

const INFO_LOADED: &str = "설정이 로드되었습니다. '시작' 버튼을 누르세요.";
const INFO_FIRST_RUN: &str = "최초 설정이 필요합니다. '시작' 버튼을 누르세요.";
const INFO_CALIBRATING: &str = "튜너의 음이름이 표시되는 영역을 마우스로 드래그하세요.";
const INFO_RUNNING: &str = "트레이너가 실행 중입니다.";
const INFO_STOPPED: &str = "정지되었습니다. 다시 시작하려면 '시작' 버튼을 누르세요.";

const STATUS_PLAY: &str = "해당 음을 연주하세요...";
const STATUS_CORRECT: &str = "정답!";

/// The external collaborators a session needs.
#[derive(Clone)]
pub struct Backends {
    pub capture: Arc<dyn CaptureBackend>,
    pub recognizer: Arc<dyn TextRecognizer>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message the user must acknowledge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, title: &str, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Prompting,
    Correct,
}

/// Content of the status line under the prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub tone: StatusTone,
}

pub struct TrainerController {
    state: TrainerState,
    store: RegionStore,
    region: Option<CaptureRegion>,
    backends: Backends,
    timing: TrainerTiming,
    rng: StdRng,
    prompt: Option<Prompt>,
    target: SharedTarget,
    info: String,
    status: Option<StatusLine>,
    notices: VecDeque<Notice>,
    /// Number of the most recently started loop
    session: u64,
    active_loop: Option<LoopHandle>,
    /// A stopped loop whose last cycle may still be in flight
    retiring: Option<LoopHandle>,
    /// When the PausedOnCorrect → Running transition is due
    pending_advance: Option<Instant>,
    events_tx: Sender<SessionEvent>,
    events_rx: Receiver<SessionEvent>,
}

impl TrainerController {
    /// Creates the controller and loads any saved region.
    pub fn new(store: RegionStore, backends: Backends, timing: TrainerTiming) -> Self {
        Self::with_rng(store, backends, timing, StdRng::from_entropy())
    }

    pub fn with_rng(
        store: RegionStore,
        backends: Backends,
        timing: TrainerTiming,
        rng: StdRng,
    ) -> Self {
        let region = match store.load() {
            Ok(region) => region,
            Err(e) => {
                crate::log(&format!("Controller: ignoring saved region: {:#}", e));
                None
            }
        };

        let info = match region {
            Some(region) => {
                crate::log(&format!(
                    "Controller: loaded capture region {} from {}",
                    region,
                    store.path().display()
                ));
                INFO_LOADED
            }
            None => {
                crate::log("Controller: no capture region saved, calibration required");
                INFO_FIRST_RUN
            }
        };

        let (events_tx, events_rx) = create_event_channel();

        Self {
            state: TrainerState::Idle,
            store,
            region,
            backends,
            timing,
            rng,
            prompt: None,
            target: Arc::new(Mutex::new(None)),
            info: info.to_string(),
            status: None,
            notices: VecDeque::new(),
            session: 0,
            active_loop: None,
            retiring: None,
            pending_advance: None,
            events_tx,
            events_rx,
        }
    }

    pub fn state(&self) -> TrainerState {
        self.state
    }

    pub fn region(&self) -> Option<CaptureRegion> {
        self.region
    }

    pub fn prompt(&self) -> Option<Prompt> {
        self.prompt
    }

    /// Text for the large prompt label; empty when no prompt is active.
    pub fn prompt_text(&self) -> String {
        self.prompt.map(|p| p.display_text()).unwrap_or_default()
    }

    pub fn info_text(&self) -> &str {
        &self.info
    }

    pub fn status(&self) -> Option<&StatusLine> {
        self.status.as_ref()
    }

    /// Takes the oldest unacknowledged notice.
    pub fn pop_notice(&mut self) -> Option<Notice> {
        self.notices.pop_front()
    }

    /// Idle, and any previously stopped loop has left its last cycle.
    pub fn can_start(&self) -> bool {
        self.state == TrainerState::Idle
            && self.retiring.as_ref().is_none_or(|h| h.is_finished())
    }

    pub fn can_stop(&self) -> bool {
        self.state.is_active()
    }

    pub fn can_recalibrate(&self) -> bool {
        self.can_start()
    }

    /// Start button: calibrates first if no region is saved.
    pub fn request_start(&mut self) {
        if !self.can_start() {
            return;
        }

        if self.region.is_some() {
            self.start_running();
        } else {
            self.enter_calibration();
        }
    }

    /// Explicit recalibration, only from Idle.
    pub fn request_recalibration(&mut self) {
        if self.can_recalibrate() {
            self.enter_calibration();
        }
    }

    /// The overlay reported a completed drag, in physical pixels.
    pub fn finish_calibration(&mut self, start: ScreenPoint, end: ScreenPoint) {
        if self.state != TrainerState::Calibrating {
            return;
        }
        self.set_state(TrainerState::Idle);

        match calibration::finish_calibration(&self.store, start, end) {
            Ok(region) => {
                self.region = Some(region);
                self.info = INFO_LOADED.to_string();
                self.notices.push_back(Notice::new(
                    NoticeLevel::Info,
                    "설정 완료",
                    format!(
                        "캡처 영역이 저장되었습니다: {}\n프로그램을 시작합니다.",
                        region
                    ),
                ));
                self.start_running();
            }
            Err(CalibrationFailure::Rejected(e)) => {
                crate::log(&format!("Controller: calibration rejected: {}", e));
                self.info = self.idle_info().to_string();
                self.notices.push_back(Notice::new(
                    NoticeLevel::Warning,
                    "설정 오류",
                    "영역이 너무 작습니다. 다시 시도해주세요.",
                ));
            }
            Err(e @ CalibrationFailure::Persist(_)) => {
                crate::log(&format!("Controller: {}", e));
                self.info = self.idle_info().to_string();
                self.notices.push_back(Notice::new(
                    NoticeLevel::Error,
                    "설정 오류",
                    format!("캡처 영역을 저장하지 못했습니다.\n{}", e),
                ));
            }
        }
    }

    /// The overlay was dismissed without a drag.
    pub fn cancel_calibration(&mut self) {
        if self.state == TrainerState::Calibrating {
            crate::log("Controller: calibration cancelled");
            self.set_state(TrainerState::Idle);
            self.info = self.idle_info().to_string();
        }
    }

    /// Stop button. Also cancels a pending advance.
    pub fn request_stop(&mut self) {
        if !self.state.is_active() {
            return;
        }

        self.halt_loop();
        self.set_state(TrainerState::Idle);
        self.prompt = None;
        self.status = None;
        self.info = INFO_STOPPED.to_string();
        crate::log("Controller: stopped");
    }

    /// Window close: stops the loop without waiting for it.
    pub fn shutdown(&mut self) {
        self.halt_loop();
        self.set_state(TrainerState::Idle);
        crate::log("Controller: shutdown");
    }

    /// Applies queued loop events and fires the advance timer if due.
    /// Called from the UI thread every frame.
    pub fn tick(&mut self, now: Instant) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event, now);
        }

        if self.retiring.as_ref().is_some_and(|h| h.is_finished()) {
            crate::log("Controller: previous loop exited");
            self.retiring = None;
        }

        if self.state == TrainerState::PausedOnCorrect
            && self.pending_advance.is_some_and(|due| now >= due)
        {
            self.pending_advance = None;
            self.set_state(TrainerState::Running);
            self.advance_prompt();
        }
    }

    /// True while the UI should keep repainting to drain events and timers.
    pub fn needs_polling(&self) -> bool {
        self.active_loop.is_some() || self.retiring.is_some() || self.pending_advance.is_some()
    }

    fn handle_event(&mut self, event: SessionEvent, now: Instant) {
        if event.session != self.session || self.active_loop.is_none() {
            crate::log(&format!(
                "Controller: ignoring event from stopped session {}: {:?}",
                event.session, event.event
            ));
            return;
        }

        match event.event {
            TrainerEvent::CorrectMatch { recognized } => {
                if self.state != TrainerState::Running {
                    return;
                }
                crate::log(&format!(
                    "Controller: correct answer \"{}\" for {}",
                    recognized,
                    self.prompt_text()
                ));
                self.set_state(TrainerState::PausedOnCorrect);
                self.set_target(None);
                self.status = Some(StatusLine {
                    text: STATUS_CORRECT.to_string(),
                    tone: StatusTone::Correct,
                });
                self.pending_advance = Some(now + self.timing.advance_delay);
            }
            TrainerEvent::RecognizerUnavailable(msg) => {
                self.fail_session(Notice::new(
                    NoticeLevel::Error,
                    "Tesseract 오류",
                    format!(
                        "Tesseract-OCR이 설치되지 않았거나 경로가 지정되지 않았습니다.\n\
                         settings.json의 tesseract_path 설정을 확인해주세요.\n\n{}",
                        msg
                    ),
                ));
            }
            TrainerEvent::CaptureUnavailable(msg) => {
                self.fail_session(Notice::new(
                    NoticeLevel::Error,
                    "화면 캡처 오류",
                    format!("화면을 캡처할 수 없습니다.\n\n{}", msg),
                ));
            }
        }
    }

    /// Ends the session on a fatal loop error. The saved region is kept.
    fn fail_session(&mut self, notice: Notice) {
        if !self.state.is_active() {
            return;
        }
        crate::log(&format!("Controller: session failed: {}", notice.message));
        self.halt_loop();
        self.set_state(TrainerState::Idle);
        self.prompt = None;
        self.status = None;
        self.info = self.idle_info().to_string();
        self.notices.push_back(notice);
    }

    fn enter_calibration(&mut self) {
        crate::log("Controller: calibration started");
        self.set_state(TrainerState::Calibrating);
        self.info = INFO_CALIBRATING.to_string();
    }

    fn start_running(&mut self) {
        let Some(region) = self.region else {
            return;
        };

        self.session += 1;
        self.set_state(TrainerState::Running);
        self.info = INFO_RUNNING.to_string();
        self.pending_advance = None;
        self.advance_prompt();

        self.active_loop = Some(spawn_trainer_loop(LoopConfig {
            session: self.session,
            region,
            timing: self.timing,
            target: self.target.clone(),
            events: self.events_tx.clone(),
            capture: self.backends.capture.clone(),
            recognizer: self.backends.recognizer.clone(),
        }));
        crate::log(&format!("Controller: session {} running", self.session));
    }

    /// Draws the next prompt and resets the status line.
    fn advance_prompt(&mut self) {
        let prompt = Prompt::random(&mut self.rng);
        self.prompt = Some(prompt);
        self.set_target(Some(prompt));
        self.status = Some(StatusLine {
            text: STATUS_PLAY.to_string(),
            tone: StatusTone::Prompting,
        });
    }

    fn set_target(&self, prompt: Option<Prompt>) {
        if let Ok(mut target) = self.target.lock() {
            *target = prompt.map(|p| p.pitch_class);
        }
    }

    fn set_state(&mut self, next: TrainerState) {
        if self.state != next {
            crate::log(&format!("Controller: {} -> {}", self.state, next));
            self.state = next;
        }
    }

    fn halt_loop(&mut self) {
        if let Some(handle) = self.active_loop.take() {
            if handle.is_running() {
                handle.stop();
            }
            if handle.is_finished() {
                crate::log(&format!("Controller: session {} loop already exited", self.session));
            } else {
                self.retiring = Some(handle);
            }
        }
        self.pending_advance = None;
        self.set_target(None);
    }

    fn idle_info(&self) -> &'static str {
        if self.region.is_some() {
            INFO_LOADED
        } else {
            INFO_FIRST_RUN
        }
    }
}

impl Drop for TrainerController {
    fn drop(&mut self) {
        self.halt_loop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureError;
    use crate::drill::PitchClass;
    use crate::ocr::RecognizeError;
    use crate::trainer::testing::{fast_timing, wait_until, FakeCapture, ScriptedRecognizer};
    use std::path::Path;
    use std::time::Duration;
    use tempfile::tempdir;

    fn controller(
        dir: &Path,
        capture: FakeCapture,
        recognizer: Arc<ScriptedRecognizer>,
    ) -> TrainerController {
        let backends = Backends {
            capture: Arc::new(capture),
            recognizer,
        };
        TrainerController::with_rng(
            RegionStore::new(dir.join("config.json")),
            backends,
            fast_timing(),
            StdRng::seed_from_u64(42),
        )
    }

    fn save_region(dir: &Path) -> CaptureRegion {
        let region = CaptureRegion::new(50, 50, 200, 70).unwrap();
        RegionStore::new(dir.join("config.json")).save(&region).unwrap();
        region
    }

    fn tick_until(ctrl: &mut TrainerController, state: TrainerState) -> bool {
        wait_until(|| {
            ctrl.tick(Instant::now());
            ctrl.state() == state
        })
    }

    fn force_prompt(ctrl: &mut TrainerController, prompt: Prompt) {
        ctrl.prompt = Some(prompt);
        ctrl.set_target(Some(prompt));
    }

    fn inject(ctrl: &TrainerController, session: u64, event: TrainerEvent) {
        ctrl.events_tx.send(SessionEvent::new(session, event)).unwrap();
    }

    #[test]
    fn test_initial_state_without_region() {
        let dir = tempdir().unwrap();
        let ctrl = controller(dir.path(), FakeCapture::working(), Arc::new(ScriptedRecognizer::text("")));

        assert_eq!(ctrl.state(), TrainerState::Idle);
        assert_eq!(ctrl.region(), None);
        assert_eq!(ctrl.info_text(), INFO_FIRST_RUN);
        assert!(ctrl.can_start());
        assert!(!ctrl.can_stop());
    }

    #[test]
    fn test_initial_state_with_region() {
        let dir = tempdir().unwrap();
        let region = save_region(dir.path());
        let ctrl = controller(dir.path(), FakeCapture::working(), Arc::new(ScriptedRecognizer::text("")));

        assert_eq!(ctrl.region(), Some(region));
        assert_eq!(ctrl.info_text(), INFO_LOADED);
    }

    #[test]
    fn test_corrupt_region_file_triggers_calibration() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), "not json").unwrap();
        let mut ctrl = controller(dir.path(), FakeCapture::working(), Arc::new(ScriptedRecognizer::text("")));

        ctrl.request_start();

        assert_eq!(ctrl.state(), TrainerState::Calibrating);
        assert!(dir.path().join("config.json").exists());
    }

    #[test]
    fn test_first_start_calibrates_then_runs() {
        let dir = tempdir().unwrap();
        let mut ctrl = controller(dir.path(), FakeCapture::working(), Arc::new(ScriptedRecognizer::text("")));

        ctrl.request_start();
        assert_eq!(ctrl.state(), TrainerState::Calibrating);
        assert!(!ctrl.can_start());

        ctrl.finish_calibration((250.0, 120.0), (50.0, 50.0));

        let expected = CaptureRegion::new(50, 50, 200, 70).unwrap();
        assert_eq!(ctrl.state(), TrainerState::Running);
        assert_eq!(ctrl.region(), Some(expected));
        assert_eq!(
            RegionStore::new(dir.path().join("config.json")).load().unwrap(),
            Some(expected)
        );
        assert!(ctrl.prompt().is_some());
        assert_eq!(ctrl.pop_notice().map(|n| n.level), Some(NoticeLevel::Info));
        ctrl.request_stop();
    }

    #[test]
    fn test_too_small_calibration_returns_to_idle() {
        let dir = tempdir().unwrap();
        let mut ctrl = controller(dir.path(), FakeCapture::working(), Arc::new(ScriptedRecognizer::text("")));

        ctrl.request_start();
        ctrl.finish_calibration((100.0, 100.0), (103.0, 105.0));

        assert_eq!(ctrl.state(), TrainerState::Idle);
        assert_eq!(ctrl.region(), None);
        assert!(!dir.path().join("config.json").exists());
        let notice = ctrl.pop_notice().unwrap();
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert!(ctrl.pop_notice().is_none());
    }

    #[test]
    fn test_too_small_recalibration_keeps_old_region() {
        let dir = tempdir().unwrap();
        let region = save_region(dir.path());
        let before = std::fs::read(dir.path().join("config.json")).unwrap();
        let mut ctrl = controller(dir.path(), FakeCapture::working(), Arc::new(ScriptedRecognizer::text("")));

        ctrl.request_recalibration();
        assert_eq!(ctrl.state(), TrainerState::Calibrating);
        ctrl.finish_calibration((100.0, 100.0), (103.0, 105.0));

        assert_eq!(ctrl.state(), TrainerState::Idle);
        assert_eq!(ctrl.region(), Some(region));
        assert_eq!(std::fs::read(dir.path().join("config.json")).unwrap(), before);
    }

    #[test]
    fn test_cancel_calibration() {
        let dir = tempdir().unwrap();
        let mut ctrl = controller(dir.path(), FakeCapture::working(), Arc::new(ScriptedRecognizer::text("")));

        ctrl.request_start();
        ctrl.cancel_calibration();

        assert_eq!(ctrl.state(), TrainerState::Idle);
        assert!(ctrl.pop_notice().is_none());
        // A late drag after cancelling is ignored.
        ctrl.finish_calibration((0.0, 0.0), (100.0, 100.0));
        assert_eq!(ctrl.region(), None);
    }

    #[test]
    fn test_full_drill_cycle() {
        let dir = tempdir().unwrap();
        save_region(dir.path());
        let recognizer = Arc::new(ScriptedRecognizer::text(""));
        let mut ctrl = controller(dir.path(), FakeCapture::working(), recognizer.clone());

        ctrl.request_start();
        assert_eq!(ctrl.state(), TrainerState::Running);
        force_prompt(&mut ctrl, Prompt::new("3번 줄", PitchClass::enharmonic("D#", "Eb")));
        recognizer.set(Ok("D#".to_string()));

        assert!(tick_until(&mut ctrl, TrainerState::PausedOnCorrect));
        assert_eq!(
            ctrl.status().map(|s| s.tone),
            Some(StatusTone::Correct)
        );

        // Nothing happens before the delay elapses.
        let due = ctrl.pending_advance.unwrap();
        ctrl.tick(due - Duration::from_millis(1));
        assert_eq!(ctrl.state(), TrainerState::PausedOnCorrect);

        recognizer.set(Ok(String::new()));
        ctrl.tick(due);

        assert_eq!(ctrl.state(), TrainerState::Running);
        assert!(ctrl.prompt().is_some());
        let status = ctrl.status().unwrap();
        assert_eq!(status.tone, StatusTone::Prompting);
        assert_eq!(status.text, STATUS_PLAY);
        ctrl.request_stop();
    }

    #[test]
    fn test_stop_while_running() {
        let dir = tempdir().unwrap();
        save_region(dir.path());
        let recognizer = Arc::new(ScriptedRecognizer::text(""));
        let mut ctrl = controller(dir.path(), FakeCapture::working(), recognizer.clone());

        ctrl.request_start();
        assert!(wait_until(|| recognizer.calls() > 0));
        let finished = ctrl.active_loop.as_ref().unwrap().finished.clone();
        let session = ctrl.session;

        ctrl.request_stop();

        assert_eq!(ctrl.state(), TrainerState::Idle);
        assert_eq!(ctrl.prompt(), None);
        assert_eq!(ctrl.info_text(), INFO_STOPPED);
        assert!(wait_until(|| finished.load(std::sync::atomic::Ordering::SeqCst)));

        // A match that was already in flight does not advance anything.
        inject(&ctrl, session, TrainerEvent::CorrectMatch { recognized: "C".into() });
        ctrl.tick(Instant::now());
        assert_eq!(ctrl.state(), TrainerState::Idle);
        assert_eq!(ctrl.prompt(), None);
    }

    #[test]
    fn test_stop_while_paused_cancels_advance() {
        let dir = tempdir().unwrap();
        save_region(dir.path());
        let mut ctrl = controller(dir.path(), FakeCapture::working(), Arc::new(ScriptedRecognizer::text("")));

        ctrl.request_start();
        inject(&ctrl, ctrl.session, TrainerEvent::CorrectMatch { recognized: "C".into() });
        ctrl.tick(Instant::now());
        assert_eq!(ctrl.state(), TrainerState::PausedOnCorrect);

        ctrl.request_stop();
        ctrl.tick(Instant::now() + Duration::from_secs(10));

        assert_eq!(ctrl.state(), TrainerState::Idle);
        assert_eq!(ctrl.prompt(), None);
        assert!(wait_until(|| {
            ctrl.tick(Instant::now());
            !ctrl.needs_polling()
        }));
        assert_eq!(ctrl.prompt(), None);
    }

    #[test]
    fn test_recognizer_unavailable_stops_once() {
        let dir = tempdir().unwrap();
        save_region(dir.path());
        let before = std::fs::read(dir.path().join("config.json")).unwrap();
        let recognizer = Arc::new(ScriptedRecognizer::returning(Err(
            RecognizeError::EngineNotFound("tesseract missing".into()),
        )));
        let mut ctrl = controller(dir.path(), FakeCapture::working(), recognizer.clone());

        ctrl.request_start();
        let session = ctrl.session;
        assert!(tick_until(&mut ctrl, TrainerState::Idle));

        // Give a misbehaving loop the chance to report again.
        std::thread::sleep(Duration::from_millis(50));
        inject(&ctrl, session, TrainerEvent::RecognizerUnavailable("again".into()));
        ctrl.tick(Instant::now());

        assert_eq!(recognizer.calls(), 1);
        let notice = ctrl.pop_notice().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.message.contains("tesseract missing"));
        assert!(ctrl.pop_notice().is_none());
        assert_eq!(std::fs::read(dir.path().join("config.json")).unwrap(), before);
        assert!(ctrl.region().is_some());
        assert_eq!(ctrl.info_text(), INFO_LOADED);
    }

    #[test]
    fn test_capture_unavailable_returns_to_idle() {
        let dir = tempdir().unwrap();
        save_region(dir.path());
        let capture = FakeCapture {
            open_error: Some(CaptureError::Unavailable("no display".into())),
            frame_error: None,
        };
        let mut ctrl = controller(dir.path(), capture, Arc::new(ScriptedRecognizer::text("")));

        ctrl.request_start();
        assert!(tick_until(&mut ctrl, TrainerState::Idle));

        let notice = ctrl.pop_notice().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(ctrl.region().is_some());
    }

    #[test]
    fn test_events_from_previous_session_are_ignored() {
        let dir = tempdir().unwrap();
        save_region(dir.path());
        let mut ctrl = controller(dir.path(), FakeCapture::working(), Arc::new(ScriptedRecognizer::text("")));

        ctrl.request_start();
        let old_session = ctrl.session;
        ctrl.request_stop();
        assert!(wait_until(|| {
            ctrl.tick(Instant::now());
            ctrl.can_start()
        }));
        ctrl.request_start();

        inject(&ctrl, old_session, TrainerEvent::CorrectMatch { recognized: "C".into() });
        inject(&ctrl, old_session, TrainerEvent::RecognizerUnavailable("old".into()));
        ctrl.tick(Instant::now());

        assert_eq!(ctrl.state(), TrainerState::Running);
        assert!(ctrl.pop_notice().is_none());
        ctrl.request_stop();
    }

    #[test]
    fn test_start_ignored_while_running() {
        let dir = tempdir().unwrap();
        save_region(dir.path());
        let mut ctrl = controller(dir.path(), FakeCapture::working(), Arc::new(ScriptedRecognizer::text("")));

        ctrl.request_start();
        let session = ctrl.session;
        ctrl.request_start();
        ctrl.request_recalibration();

        assert_eq!(ctrl.session, session);
        assert_eq!(ctrl.state(), TrainerState::Running);
        ctrl.request_stop();
    }

    #[test]
    fn test_restart_waits_for_stopped_loop_to_exit() {
        let dir = tempdir().unwrap();
        save_region(dir.path());
        let recognizer = Arc::new(ScriptedRecognizer::text("").with_delay(Duration::from_millis(300)));
        let mut ctrl = controller(dir.path(), FakeCapture::working(), recognizer.clone());

        ctrl.request_start();
        let old_session = ctrl.session;
        // The worker is now inside a slow recognize call.
        assert!(wait_until(|| recognizer.calls() > 0));
        ctrl.request_stop();

        assert!(!ctrl.can_start());
        assert!(!ctrl.can_recalibrate());
        assert!(ctrl.needs_polling());
        ctrl.request_start();
        assert_eq!(ctrl.state(), TrainerState::Idle);
        assert_eq!(ctrl.session, old_session);

        assert!(wait_until(|| {
            ctrl.tick(Instant::now());
            ctrl.can_start()
        }));
        ctrl.request_start();
        assert_eq!(ctrl.state(), TrainerState::Running);
        assert_eq!(ctrl.session, old_session + 1);
        ctrl.shutdown();
    }

    #[test]
    fn test_shutdown_stops_loop() {
        let dir = tempdir().unwrap();
        save_region(dir.path());
        let mut ctrl = controller(dir.path(), FakeCapture::working(), Arc::new(ScriptedRecognizer::text("")));

        ctrl.request_start();
        let finished = ctrl.active_loop.as_ref().unwrap().finished.clone();
        ctrl.shutdown();

        assert!(ctrl.active_loop.is_none());
        assert!(wait_until(|| finished.load(std::sync::atomic::Ordering::SeqCst)));
    }
}
