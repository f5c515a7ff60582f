//! Decides whether recognized tuner text names the target note.

use super::catalog::PitchClass;

/// Returns true if `recognized` is an accepted spelling of `target`.
///
/// Accepts an exact spelling (`"A#"` or `"Bb"`), and for two-spelling
/// pitch classes any text containing both spellings, which covers tuners
/// that render `"A#/Bb"` as a single token. Comparison is case-sensitive;
/// the OCR whitelist already restricts the alphabet.
pub fn is_correct(recognized: &str, target: &PitchClass) -> bool {
    if target.spellings().any(|s| s == recognized) {
        return true;
    }

    match target.alternate() {
        Some(alternate) => recognized.contains(target.canonical()) && recognized.contains(alternate),
        None => false,
    }
}
