//! Content analysis: classification and key information extraction.

pub mod classify;
pub mod key_info;

pub use classify::{detect_document_type, DocumentLabel};
pub use key_info::{extract_key_information, KeyInformation};
