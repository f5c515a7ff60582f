//! GUI rendering functions.
//!
//! Contains UI layout and component rendering logic.

use eframe::egui::{self, Color32, RichText, Stroke};

use crate::calibration::DragSelection;
use crate::trainer::{Notice, TrainerController};

use super::state::{notice_color, status_color};

/// Buttons pressed in the main window this frame.
#[derive(Default)]
pub struct MainActions {
    pub start: bool,
    pub stop: bool,
    pub recalibrate: bool,
}

/// Render the info line, prompt and status labels.
pub fn render_drill(ui: &mut egui::Ui, controller: &TrainerController) {
    ui.vertical_centered(|ui| {
        ui.add_space(8.0);
        ui.label(RichText::new(controller.info_text()).size(14.0));

        ui.add_space(24.0);
        ui.label(RichText::new(controller.prompt_text()).size(36.0).strong());

        ui.add_space(16.0);
        match controller.status() {
            Some(status) => {
                ui.label(
                    RichText::new(&status.text)
                        .size(20.0)
                        .color(status_color(status.tone)),
                );
            }
            // Keep the layout from jumping when the status clears.
            None => {
                ui.label(RichText::new(" ").size(20.0));
            }
        }
    });
}

/// Render the control buttons.
pub fn render_controls(ui: &mut egui::Ui, controller: &TrainerController) -> MainActions {
    let mut actions = MainActions::default();

    ui.add_space(16.0);
    ui.separator();
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        ui.add_enabled_ui(controller.can_start(), |ui| {
            if ui.button(RichText::new("▶ 시작").size(16.0)).clicked() {
                actions.start = true;
            }
        });

        ui.add_space(20.0);

        ui.add_enabled_ui(controller.can_stop(), |ui| {
            if ui.button(RichText::new("◼ 정지").size(16.0)).clicked() {
                actions.stop = true;
            }
        });

        ui.add_space(20.0);

        ui.add_enabled_ui(controller.can_recalibrate(), |ui| {
            if ui.button(RichText::new("영역 재설정").size(16.0)).clicked() {
                actions.recalibrate = true;
            }
        });
    });

    if let Some(region) = controller.region() {
        ui.add_space(8.0);
        ui.label(
            RichText::new(format!("캡처 영역: {}", region))
                .size(12.0)
                .color(Color32::GRAY),
        );
    }

    actions
}

/// Render a modal notice. Returns true when the user acknowledged it.
pub fn render_notice(ctx: &egui::Context, notice: &Notice) -> bool {
    let mut acknowledged = false;

    egui::Window::new(notice.title.as_str())
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            let text = RichText::new(&notice.message);
            let text = match notice_color(notice.level) {
                Some(color) => text.color(color),
                None => text,
            };
            ui.label(text);

            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                if ui.button("확인").clicked() {
                    acknowledged = true;
                }
            });
        });

    acknowledged
}

/// Render the instruction text and the live selection rectangle on the
/// calibration overlay.
pub fn render_overlay(ui: &mut egui::Ui, selection: &DragSelection) {
    let painter = ui.painter();
    let screen = ui.max_rect();

    painter.text(
        screen.center_top() + egui::vec2(0.0, 60.0),
        egui::Align2::CENTER_CENTER,
        "튜너의 음이름이 표시되는 영역을 드래그하세요. (취소: Esc)",
        egui::FontId::proportional(24.0),
        Color32::WHITE,
    );

    if let Some((min, max)) = selection.preview() {
        let rect = egui::Rect::from_min_max(egui::pos2(min.0, min.1), egui::pos2(max.0, max.1));
        painter.rect_stroke(rect, 0.0, Stroke::new(2.0, Color32::RED));
    }
}
