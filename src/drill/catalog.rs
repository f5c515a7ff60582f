//! Static note data for the drill.
//!
//! Six string labels and twelve pitch classes covering one octave. Pitch
//! classes with an enharmonic name carry both spellings, canonical first.

use rand::seq::SliceRandom;
use rand::Rng;

/// Labels shown for each guitar string, 1 (high E) to 6 (low E).
const STRING_LABELS: [&str; 6] = ["1번 줄", "2번 줄", "3번 줄", "4번 줄", "5번 줄", "6번 줄"];

const PITCH_CLASSES: [PitchClass; 12] = [
    PitchClass::natural("C"),
    PitchClass::enharmonic("C#", "Db"),
    PitchClass::natural("D"),
    PitchClass::enharmonic("D#", "Eb"),
    PitchClass::natural("E"),
    PitchClass::natural("F"),
    PitchClass::enharmonic("F#", "Gb"),
    PitchClass::natural("G"),
    PitchClass::enharmonic("G#", "Ab"),
    PitchClass::natural("A"),
    PitchClass::enharmonic("A#", "Bb"),
    PitchClass::natural("B"),
];

/// One of the twelve note names, with an optional alternate spelling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PitchClass {
    canonical: &'static str,
    alternate: Option<&'static str>,
}

impl PitchClass {
    /// A pitch class with a single accepted spelling.
    pub const fn natural(name: &'static str) -> Self {
        Self {
            canonical: name,
            alternate: None,
        }
    }

    /// A pitch class accepted under two spellings (sharp first, then flat).
    pub const fn enharmonic(sharp: &'static str, flat: &'static str) -> Self {
        Self {
            canonical: sharp,
            alternate: Some(flat),
        }
    }

    /// The spelling shown in prompts.
    pub fn canonical(&self) -> &'static str {
        self.canonical
    }

    pub fn alternate(&self) -> Option<&'static str> {
        self.alternate
    }

    /// All accepted spellings, canonical first.
    pub fn spellings(&self) -> impl Iterator<Item = &'static str> {
        std::iter::once(self.canonical).chain(self.alternate)
    }
}

/// Returns the six string labels in order.
pub fn string_labels() -> &'static [&'static str] {
    &STRING_LABELS
}

/// Returns the twelve pitch classes in chromatic order starting at C.
pub fn pitch_classes() -> &'static [PitchClass] {
    &PITCH_CLASSES
}

/// The challenge currently shown to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Prompt {
    pub string_label: &'static str,
    pub pitch_class: PitchClass,
}

impl Prompt {
    pub fn new(string_label: &'static str, pitch_class: PitchClass) -> Self {
        Self {
            string_label,
            pitch_class,
        }
    }

    /// Draws one of the 72 string/note combinations uniformly at random.
    /// Consecutive draws may repeat.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        // Both tables are non-empty constants.
        let string_label = *string_labels().choose(rng).unwrap_or(&STRING_LABELS[0]);
        let pitch_class = *pitch_classes().choose(rng).unwrap_or(&PITCH_CLASSES[0]);
        Self::new(string_label, pitch_class)
    }

    /// Text for the prompt label, e.g. `3번 줄, D#`.
    pub fn display_text(&self) -> String {
        format!("{}, {}", self.string_label, self.pitch_class.canonical())
    }
}
