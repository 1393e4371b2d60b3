//! LLM-backed document summarization.

pub mod backend;
pub mod pacer;
pub mod prompt;
pub mod splitter;
pub mod summarizer;
pub mod tokens;

pub use backend::{ChatCompletionsBackend, CompletionBackend, CompletionError, MockCompletionBackend};
pub use pacer::{Pacer, RecordingPacer, ThreadPacer};
pub use splitter::{split_into_chunks, Chunk, PARAGRAPH_SEPARATOR};
pub use summarizer::{ChunkSummary, DocumentSummarizer, SummarizerConfig};
pub use tokens::{estimate_tokens, DEFAULT_CHARS_PER_TOKEN};

#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    #[error("completion failed: {0}")]
    Completion(#[from] CompletionError),
}
