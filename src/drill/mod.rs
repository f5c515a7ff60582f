//! Drill content: which string and note to play, and whether the tuner agrees.
//!
//! This module provides:
//! - The fixed catalog of string labels and pitch classes
//! - Random prompt selection
//! - Matching of recognized tuner text against a target pitch class

pub mod catalog;
pub mod matcher;

pub use catalog::{PitchClass, Prompt};
pub use matcher::is_correct;
