//! Trainer state machine states.

/// Where the drill session is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrainerState {
    /// Not sampling; waiting for Start
    #[default]
    Idle,
    /// The region overlay is up, waiting for a drag
    Calibrating,
    /// The loop is sampling and a prompt is shown
    Running,
    /// A correct answer was seen; the next prompt is pending
    PausedOnCorrect,
}

impl TrainerState {
    /// True while a sampling session exists (Stop is meaningful).
    pub fn is_active(&self) -> bool {
        matches!(self, TrainerState::Running | TrainerState::PausedOnCorrect)
    }
}

impl std::fmt::Display for TrainerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrainerState::Idle => write!(f, "Idle"),
            TrainerState::Calibrating => write!(f, "Calibrating"),
            TrainerState::Running => write!(f, "Running"),
            TrainerState::PausedOnCorrect => write!(f, "Paused on correct"),
        }
    }
}
