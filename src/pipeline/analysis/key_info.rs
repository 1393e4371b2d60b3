//! Regex-based key information extraction.
//!
//! Pattern matching only; no model calls. Sets keep the output
//! deduplicated and deterministically ordered for serialization.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][a-z]+ [A-Z][a-z]+\b").expect("name regex"));

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{1,2}[-/]\d{1,2}[-/]\d{2,4}\b").expect("date regex"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("email regex")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{3}[-.]?\d{3}[-.]?\d{4}\b").expect("phone regex"));

/// Structured fields pulled from document text.
///
/// `organizations` and `locations` are carried in the schema but have no
/// extraction rules yet; they always serialize as empty lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeyInformation {
    pub names: BTreeSet<String>,
    pub dates: BTreeSet<String>,
    pub organizations: BTreeSet<String>,
    pub locations: BTreeSet<String>,
    pub contact_info: BTreeSet<String>,
}

/// Extract key information from the full document text.
pub fn extract_key_information(text: &str) -> KeyInformation {
    let mut info = KeyInformation::default();

    for m in NAME_RE.find_iter(text) {
        info.names.insert(m.as_str().to_string());
    }
    for m in DATE_RE.find_iter(text) {
        info.dates.insert(m.as_str().to_string());
    }
    for m in EMAIL_RE.find_iter(text) {
        info.contact_info.insert(m.as_str().to_string());
    }
    for m in PHONE_RE.find_iter(text) {
        info.contact_info.insert(m.as_str().to_string());
    }

    info
}
