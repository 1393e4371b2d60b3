//! Per-page language detection over a closed set.
//!
//! Classifies by the ratio of Malayalam-script characters to alphabetic
//! characters. Digits, punctuation and whitespace carry no signal and
//! are ignored.

use super::types::Language;

/// Minimum number of alphabetic characters needed for a confident call.
const MIN_ALPHABETIC_CHARS: usize = 10;

/// Script-dominance threshold: at or above this ratio one script wins.
const DOMINANCE_THRESHOLD: f64 = 0.7;

/// Classify the language of one page of text.
pub fn detect_language(text: &str) -> Language {
    let mut malayalam = 0usize;
    let mut latin = 0usize;

    for ch in text.chars() {
        if is_malayalam(ch) {
            malayalam += 1;
        } else if ch.is_ascii_alphabetic() {
            latin += 1;
        }
    }

    let total = malayalam + latin;
    if total < MIN_ALPHABETIC_CHARS {
        return Language::Unknown;
    }

    let ml_ratio = malayalam as f64 / total as f64;
    if ml_ratio >= DOMINANCE_THRESHOLD {
        Language::Ml
    } else if ml_ratio <= 1.0 - DOMINANCE_THRESHOLD {
        Language::En
    } else {
        Language::Mixed
    }
}

/// Malayalam Unicode block: U+0D00..=U+0D7F.
fn is_malayalam(ch: char) -> bool {
    ('\u{0D00}'..='\u{0D7F}').contains(&ch)
}
