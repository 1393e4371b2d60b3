//! Approximate token counting for chunk budgeting.
//!
//! The completion backend's real tokenizer is never consulted; a fixed
//! characters-per-token ratio is close enough for sizing requests.

/// Default characters-per-token ratio for English-ish text.
pub const DEFAULT_CHARS_PER_TOKEN: usize = 4;

/// Estimate the token count of `text` as `ceil(chars / ratio)`.
///
/// Counts Unicode scalar values, not bytes, so multibyte scripts
/// (e.g. Malayalam) don't inflate the estimate.
pub fn estimate_tokens(text: &str, chars_per_token: usize) -> usize {
    let ratio = chars_per_token.max(1);
    text.chars().count().div_ceil(ratio)
}
