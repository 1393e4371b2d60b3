//! Paragraph-respecting document chunking.
//!
//! Splits a document into chunks sized to fit a token budget, breaking
//! only on blank-line paragraph boundaries. A lone paragraph larger than
//! the budget is emitted as a single oversized chunk rather than being
//! cut mid-paragraph.

use super::tokens::estimate_tokens;

/// Paragraph separator used both for splitting and for rejoining.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// A contiguous, paragraph-aligned slice of document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Zero-based position in the chunk sequence.
    pub index: usize,
    pub text: String,
    pub estimated_tokens: usize,
}

/// Split `text` into ordered chunks, each estimated at `budget_tokens` or
/// fewer — except a chunk holding exactly one paragraph that is itself
/// over budget.
///
/// Joining the returned chunks with [`PARAGRAPH_SEPARATOR`] reproduces
/// the input text byte for byte.
pub fn split_into_chunks(text: &str, budget_tokens: usize, chars_per_token: usize) -> Vec<Chunk> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut chunks: Vec<Chunk> = Vec::new();
    let mut acc: Option<String> = None;

    for paragraph in text.split(PARAGRAPH_SEPARATOR) {
        match acc.take() {
            None => acc = Some(paragraph.to_string()),
            Some(current) => {
                let candidate = format!("{current}{PARAGRAPH_SEPARATOR}{paragraph}");
                if estimate_tokens(&candidate, chars_per_token) > budget_tokens
                    && !current.is_empty()
                {
                    push_chunk(&mut chunks, current, chars_per_token);
                    acc = Some(paragraph.to_string());
                } else {
                    acc = Some(candidate);
                }
            }
        }
    }

    if let Some(current) = acc {
        push_chunk(&mut chunks, current, chars_per_token);
    }

    chunks
}

fn push_chunk(chunks: &mut Vec<Chunk>, text: String, chars_per_token: usize) {
    let estimated_tokens = estimate_tokens(&text, chars_per_token);
    chunks.push(Chunk {
        index: chunks.len(),
        text,
        estimated_tokens,
    });
}
