//! GUI module for the application.
//!
//! Provides the main drill window and the full-screen calibration overlay
//! using egui/eframe. The controller lives inside the app and is driven from
//! the frame loop.

pub mod render;
pub mod state;

use std::time::{Duration, Instant};

use eframe::egui::{self, Pos2, Vec2};

use crate::trainer::{TrainerController, TrainerState};

use state::GuiState;

/// Repaint interval while a session is active, so loop events are picked up.
const POLL_REPAINT: Duration = Duration::from_millis(50);

/// What happened on the calibration overlay this frame.
enum OverlayAction {
    None,
    Finished((f32, f32), (f32, f32)),
    Cancelled,
}

/// Main GUI application struct.
pub struct GuiApp {
    state: GuiState,
}

impl GuiApp {
    /// Create a new GUI application instance.
    pub fn new(cc: &eframe::CreationContext<'_>, controller: TrainerController) -> Self {
        // Configure fonts to support Korean
        Self::setup_fonts(&cc.egui_ctx);

        Self {
            state: GuiState::new(controller),
        }
    }

    /// Setup fonts with Korean support.
    fn setup_fonts(ctx: &egui::Context) {
        let mut fonts = egui::FontDefinitions::default();

        let font_paths = [
            "C:\\Windows\\Fonts\\malgun.ttf", // Malgun Gothic
            "C:\\Windows\\Fonts\\gulim.ttc",  // Gulim
            "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
        ];

        let mut font_loaded = false;
        for font_path in &font_paths {
            if let Ok(font_data) = std::fs::read(font_path) {
                fonts.font_data.insert(
                    "korean_font".to_owned(),
                    egui::FontData::from_owned(font_data).into(),
                );

                fonts
                    .families
                    .entry(egui::FontFamily::Proportional)
                    .or_default()
                    .insert(0, "korean_font".to_owned());

                fonts
                    .families
                    .entry(egui::FontFamily::Monospace)
                    .or_default()
                    .insert(0, "korean_font".to_owned());

                crate::log(&format!("Loaded Korean font from: {}", font_path));
                font_loaded = true;
                break;
            }
        }

        if !font_loaded {
            crate::log("Warning: Could not load Korean font. Text may not display correctly.");
        }

        ctx.set_fonts(fonts);
    }

    fn handle_start(&mut self) {
        crate::log("GUI: Start pressed");
        self.state.selection.reset();
        self.state.controller.request_start();
    }

    fn handle_stop(&mut self) {
        crate::log("GUI: Stop pressed");
        self.state.controller.request_stop();
    }

    fn handle_recalibrate(&mut self) {
        crate::log("GUI: Recalibrate pressed");
        self.state.selection.reset();
        self.state.controller.request_recalibration();
    }

    /// Show the full-screen drag overlay in its own viewport.
    fn show_calibration_overlay(&mut self, ctx: &egui::Context) {
        let selection = &mut self.state.selection;

        let action = ctx.show_viewport_immediate(
            egui::ViewportId::from_hash_of("calibration_overlay"),
            egui::ViewportBuilder::default()
                .with_title("Calibration")
                .with_fullscreen(true)
                .with_transparent(true)
                .with_always_on_top()
                .with_decorations(false),
            |ctx, _class| {
                if ctx.input(|i| i.viewport().close_requested() || i.key_pressed(egui::Key::Escape))
                {
                    return OverlayAction::Cancelled;
                }

                ctx.set_cursor_icon(egui::CursorIcon::Crosshair);

                let origin = ctx
                    .input(|i| i.viewport().inner_rect)
                    .map(|r| r.min)
                    .unwrap_or(Pos2::ZERO);
                let pixels_per_point = ctx.pixels_per_point();

                let frame = egui::Frame::none().fill(state::OVERLAY_FILL);
                egui::CentralPanel::default()
                    .frame(frame)
                    .show(ctx, |ui| {
                        let response =
                            ui.allocate_response(ui.available_size(), egui::Sense::drag());
                        let pointer = response.interact_pointer_pos().map(|p| (p.x, p.y));

                        let mut action = OverlayAction::None;
                        if let Some(pos) = pointer {
                            if response.drag_started() {
                                selection.press(pos);
                            } else if response.dragged() {
                                selection.drag(pos);
                            }
                        }
                        if response.drag_stopped() {
                            let end = pointer.or(selection.preview().map(|(_, max)| max));
                            if let Some((start, end)) = end.and_then(|pos| selection.release(pos))
                            {
                                action = OverlayAction::Finished(
                                    state::to_screen_pixels(
                                        Pos2::new(start.0, start.1),
                                        origin,
                                        pixels_per_point,
                                    ),
                                    state::to_screen_pixels(
                                        Pos2::new(end.0, end.1),
                                        origin,
                                        pixels_per_point,
                                    ),
                                );
                            }
                        }

                        render::render_overlay(ui, selection);
                        action
                    })
                    .inner
            },
        );

        match action {
            OverlayAction::None => {}
            OverlayAction::Finished(start, end) => {
                crate::log(&format!(
                    "GUI: Overlay drag from ({:.0}, {:.0}) to ({:.0}, {:.0})",
                    start.0, start.1, end.0, end.1
                ));
                self.state.selection.reset();
                self.state.controller.finish_calibration(start, end);
            }
            OverlayAction::Cancelled => {
                self.state.selection.reset();
                self.state.controller.cancel_calibration();
            }
        }
    }
}

impl eframe::App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.viewport().close_requested()) {
            self.state.controller.shutdown();
            return;
        }

        self.state.controller.tick(Instant::now());
        self.state.refresh_notice();

        // Keep polling while the loop or the advance timer is live
        if self.state.controller.needs_polling() {
            ctx.request_repaint_after(POLL_REPAINT);
        }

        let modal = self.state.notice.is_some();
        let mut actions = render::MainActions::default();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!modal, |ui| {
                render::render_drill(ui, &self.state.controller);
                actions = render::render_controls(ui, &self.state.controller);
            });
        });

        if let Some(notice) = &self.state.notice {
            if render::render_notice(ctx, notice) {
                self.state.acknowledge_notice();
            }
        }

        if actions.start {
            self.handle_start();
        }
        if actions.stop {
            self.handle_stop();
        }
        if actions.recalibrate {
            self.handle_recalibrate();
        }

        if self.state.controller.state() == TrainerState::Calibrating {
            self.show_calibration_overlay(ctx);
        }
    }
}

/// Run the GUI application.
/// This function blocks until the window is closed.
pub fn run_gui(controller: TrainerController) -> eframe::Result<()> {
    crate::log("GUI: Creating native options...");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(Vec2::new(500.0, 320.0))
            .with_min_inner_size(Vec2::new(400.0, 280.0))
            .with_title("기타 지판 트레이너"),
        ..Default::default()
    };

    crate::log("GUI: Calling eframe::run_native...");

    eframe::run_native(
        "Fretboard Trainer",
        options,
        Box::new(move |cc| {
            crate::log("GUI: Creating GuiApp instance...");
            Ok(Box::new(GuiApp::new(cc, controller)))
        }),
    )
}
