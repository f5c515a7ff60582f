//! Locating the Tesseract executable and its language data.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::log;

/// Default Windows install locations of the UB-Mannheim build.
const COMMON_INSTALL_DIRS: [&str; 2] = [
    r"C:\Program Files\Tesseract-OCR",
    r"C:\Program Files (x86)\Tesseract-OCR",
];

#[cfg(windows)]
const EXECUTABLE_NAME: &str = "tesseract.exe";
#[cfg(not(windows))]
const EXECUTABLE_NAME: &str = "tesseract";

/// Resolved engine locations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TesseractPaths {
    pub executable: PathBuf,
    /// `None` lets Tesseract use its compiled-in default.
    pub tessdata: Option<PathBuf>,
}

/// Finds the Tesseract executable.
///
/// Checks, in order: the configured path, the per-user local copy, `PATH`,
/// then the common install directories. Returns `None` if none work.
pub fn find_tesseract_executable(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = configured {
        if path.exists() {
            return Some(path.to_path_buf());
        }
        log(&format!(
            "OCR: configured Tesseract path {} does not exist",
            path.display()
        ));
    }

    let local_exe = crate::paths::get_local_tesseract_dir().join(EXECUTABLE_NAME);
    if local_exe.exists() {
        return Some(local_exe);
    }

    if let Ok(output) = tesseract_command("tesseract").arg("--version").output() {
        if output.status.success() {
            return Some(PathBuf::from("tesseract"));
        }
    }

    COMMON_INSTALL_DIRS
        .iter()
        .map(|dir| Path::new(dir).join("tesseract.exe"))
        .find(|p| p.exists())
}

/// Builds a `Command` for the Tesseract CLI.
///
/// The app has no console of its own, so on Windows each console child would
/// get a fresh console window; `CREATE_NO_WINDOW` suppresses it.
pub fn tesseract_command(program: impl AsRef<OsStr>) -> Command {
    #[allow(unused_mut)]
    let mut command = Command::new(program);
    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        use windows::Win32::System::Threading::CREATE_NO_WINDOW;
        command.creation_flags(CREATE_NO_WINDOW.0);
    }
    command
}

/// Finds a tessdata directory containing `eng.traineddata`.
pub fn find_tessdata_dir(configured: Option<&Path>) -> Option<PathBuf> {
    let local = crate::paths::get_local_tesseract_dir().join("tessdata");
    let common = COMMON_INSTALL_DIRS.iter().map(|dir| Path::new(dir).join("tessdata"));

    configured
        .map(Path::to_path_buf)
        .into_iter()
        .chain(std::iter::once(local))
        .chain(common)
        .find(|dir| has_english_data(dir))
}

fn has_english_data(dir: &Path) -> bool {
    dir.join("eng.traineddata").exists()
}

/// Resolves both locations. `None` means the engine is not installed.
pub fn resolve_tesseract(
    configured_exe: Option<&Path>,
    configured_tessdata: Option<&Path>,
) -> Option<TesseractPaths> {
    let executable = find_tesseract_executable(configured_exe)?;
    let tessdata = find_tessdata_dir(configured_tessdata);

    log(&format!(
        "OCR: using Tesseract at {} (tessdata: {})",
        executable.display(),
        tessdata
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "engine default".to_string())
    ));

    Some(TesseractPaths {
        executable,
        tessdata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_configured_executable_wins() {
        let dir = tempdir().unwrap();
        let exe = dir.path().join("my-tesseract");
        std::fs::write(&exe, b"").unwrap();

        assert_eq!(find_tesseract_executable(Some(&exe)), Some(exe));
    }

    #[test]
    fn test_configured_tessdata_requires_english_data() {
        let dir = tempdir().unwrap();
        assert_ne!(find_tessdata_dir(Some(dir.path())), Some(dir.path().to_path_buf()));

        std::fs::write(dir.path().join("eng.traineddata"), b"").unwrap();
        assert_eq!(find_tessdata_dir(Some(dir.path())), Some(dir.path().to_path_buf()));
    }

    #[test]
    fn test_tesseract_command_targets_program() {
        let command = tesseract_command("tesseract");
        assert_eq!(command.get_program(), "tesseract");
        assert_eq!(command.get_args().count(), 0);
    }
}
