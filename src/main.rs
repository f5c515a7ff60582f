//! Fretboard Trainer
//!
//! A desktop drill that asks for a note on a guitar string, watches the
//! on-screen tuner's note readout with OCR, and moves on once the player
//! hits the right pitch.

// Hide console window on Windows for GUI mode
#![windows_subsystem = "windows"]

mod calibration;
mod capture;
mod drill;
mod gui;
mod ocr;
mod paths;
mod settings;
mod trainer;

use anyhow::{anyhow, Result};
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Arc;

use calibration::RegionStore;
use capture::ScreenCapture;
use ocr::TesseractRecognizer;
use trainer::{Backends, TrainerController};

const LOG_FILE_NAME: &str = "fretboard_trainer.log";

/// Logs a message to both console and log file with timestamp.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    print!("{}", line);
    let log_path = paths::get_logs_dir().join(LOG_FILE_NAME);
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let _ = file.write_all(line.as_bytes());
    }
}

fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        let msg = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        let location = match panic_info.location() {
            Some(loc) => format!(" at {}:{}:{}", loc.file(), loc.line(), loc.column()),
            None => String::new(),
        };
        let log_msg = format!("[PANIC]{} {}\n", location, msg);
        eprintln!("{}", log_msg);
        let log_path = paths::get_logs_dir().join(LOG_FILE_NAME);
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&log_path) {
            let _ = file.write_all(log_msg.as_bytes());
        }
    }));
}

fn main() -> Result<()> {
    install_panic_hook();

    // Ensure output directories exist
    paths::ensure_directories()?;
    log("Fretboard Trainer starting");

    let settings = settings::load_settings(&paths::get_settings_path());

    let backends = Backends {
        capture: Arc::new(ScreenCapture),
        recognizer: Arc::new(TesseractRecognizer::new(
            settings.tesseract_path.clone(),
            settings.tessdata_dir.clone(),
        )),
    };
    let store = RegionStore::new(paths::get_region_config_path());
    let controller = TrainerController::new(store, backends, settings.timing());

    log("Starting GUI application...");
    match gui::run_gui(controller) {
        Ok(()) => {
            log("GUI application exited normally");
            Ok(())
        }
        Err(e) => {
            log(&format!("GUI error: {}", e));
            Err(anyhow!("GUI error: {}", e))
        }
    }
}
