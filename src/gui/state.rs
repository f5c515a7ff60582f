//! GUI application state.
//!
//! Wraps the trainer controller together with the bits of state that only
//! exist on the UI side: the notice being shown and the drag in progress on
//! the calibration overlay.

use eframe::egui::{Color32, Pos2};

use crate::calibration::{DragSelection, ScreenPoint};
use crate::trainer::{Notice, NoticeLevel, StatusTone, TrainerController};

/// Colors used by the main window.
pub const PROMPTING_COLOR: Color32 = Color32::from_rgb(0, 90, 200);
pub const CORRECT_COLOR: Color32 = Color32::from_rgb(0, 150, 0);
pub const WARNING_COLOR: Color32 = Color32::from_rgb(200, 150, 0);
pub const ERROR_COLOR: Color32 = Color32::from_rgb(200, 0, 0);

/// Overlay fill: grey at roughly 30% opacity.
pub const OVERLAY_FILL: Color32 = Color32::from_rgba_premultiplied(38, 38, 38, 77);

pub fn status_color(tone: StatusTone) -> Color32 {
    match tone {
        StatusTone::Prompting => PROMPTING_COLOR,
        StatusTone::Correct => CORRECT_COLOR,
    }
}

pub fn notice_color(level: NoticeLevel) -> Option<Color32> {
    match level {
        NoticeLevel::Info => None,
        NoticeLevel::Warning => Some(WARNING_COLOR),
        NoticeLevel::Error => Some(ERROR_COLOR),
    }
}

/// Converts an overlay position in points to physical screen pixels.
///
/// `origin` is the overlay's top-left corner on the desktop, in points.
pub fn to_screen_pixels(pos: Pos2, origin: Pos2, pixels_per_point: f32) -> ScreenPoint {
    (
        (origin.x + pos.x) * pixels_per_point,
        (origin.y + pos.y) * pixels_per_point,
    )
}

pub struct GuiState {
    pub controller: TrainerController,
    /// Notice currently shown in a modal window.
    pub notice: Option<Notice>,
    /// Drag in progress on the calibration overlay.
    pub selection: DragSelection,
}

impl GuiState {
    pub fn new(controller: TrainerController) -> Self {
        Self {
            controller,
            notice: None,
            selection: DragSelection::new(),
        }
    }

    /// Moves the next queued notice into view once the current one is closed.
    pub fn refresh_notice(&mut self) {
        if self.notice.is_none() {
            self.notice = self.controller.pop_notice();
        }
    }

    pub fn acknowledge_notice(&mut self) {
        self.notice = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_screen_pixels_scales_points() {
        let pos = Pos2::new(100.0, 40.0);
        assert_eq!(to_screen_pixels(pos, Pos2::ZERO, 1.5), (150.0, 60.0));
    }

    #[test]
    fn test_to_screen_pixels_adds_overlay_origin() {
        let pos = Pos2::new(10.0, 10.0);
        let origin = Pos2::new(1920.0, 0.0);
        assert_eq!(to_screen_pixels(pos, origin, 1.0), (1930.0, 10.0));
    }

    #[test]
    fn test_status_colors_differ() {
        assert_ne!(
            status_color(StatusTone::Prompting),
            status_color(StatusTone::Correct)
        );
        assert_eq!(notice_color(NoticeLevel::Info), None);
    }
}
