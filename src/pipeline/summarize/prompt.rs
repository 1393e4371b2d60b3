//! Prompt builders for the summarization pipeline.
//!
//! Each request shape carries its own system role: the single-shot and
//! combine stages ask for a structured overview, the per-section stage
//! for a concise partial summary.

/// System role for a document summarized in a single request.
pub const SINGLE_SHOT_SYSTEM: &str =
    "You are a helpful assistant specialized in document analysis and summarization. \
     Provide structured summaries with key information extraction.";

/// System role for one section of a chunked document.
pub const SECTION_SYSTEM: &str =
    "You are a helpful assistant. Summarize this section of a document concisely \
     while preserving key information.";

/// System role for the combine stage.
pub const COMBINE_SYSTEM: &str =
    "You are a helpful assistant specialized in document analysis. Combine these \
     section summaries into a comprehensive, well-structured final summary.";

/// Prompt for a document that fits in a single request.
pub fn single_shot(text: &str) -> String {
    format!(
        "Document Content:\n{text}\n\n\
         Please provide a comprehensive summary of this document."
    )
}

/// Prompt for one section of a chunked document. `section` is 1-based.
pub fn section(section: usize, text: &str) -> String {
    format!(
        "Document Section {section}:\n{text}\n\n\
         Please summarize this section of the document."
    )
}

/// Prompt that folds labelled section summaries into one synthesis.
pub fn combine(labelled_summaries: &str) -> String {
    format!(
        "Individual Section Summaries:\n{labelled_summaries}\n\n\
         Please provide a comprehensive final summary that combines all \
         these section summaries into a coherent document overview."
    )
}
