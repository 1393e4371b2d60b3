//! Chunked document summarization with graceful degradation.
//!
//! Small documents go through a single completion. Documents over the
//! token budget are split on paragraph boundaries, summarized chunk by
//! chunk, and the chunk summaries are folded into one final summary.
//! A failed chunk becomes an inline placeholder instead of aborting the
//! run; a failed combine degrades to the concatenated chunk summaries.

use std::time::Duration;

use tracing::{debug, info, warn};

use super::backend::{CompletionBackend, CompletionError};
use super::pacer::Pacer;
use super::prompt;
use super::splitter::{split_into_chunks, Chunk};
use super::tokens::{estimate_tokens, DEFAULT_CHARS_PER_TOKEN};
use super::SummarizeError;

/// Header prepended to the degraded output when the combine step fails.
const DEGRADED_HEADER: &str = "Document Summary (Chunked Processing):";

#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    /// Token budget per request; documents estimated over this are chunked.
    pub max_chunk_tokens: usize,
    pub chars_per_token: usize,
    /// Pause between consecutive chunk requests.
    pub chunk_delay: Duration,
    /// Longer pause after the backend reports rate limiting.
    pub rate_limit_cooldown: Duration,
    /// Output cap for single-shot and combine requests.
    pub max_summary_tokens: u32,
    /// Output cap for per-chunk requests.
    pub max_chunk_summary_tokens: u32,
    pub temperature: f32,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            max_chunk_tokens: 5000,
            chars_per_token: DEFAULT_CHARS_PER_TOKEN,
            chunk_delay: Duration::from_secs(3),
            rate_limit_cooldown: Duration::from_secs(30),
            max_summary_tokens: 2000,
            max_chunk_summary_tokens: 1000,
            temperature: 0.3,
        }
    }
}

/// Outcome of summarizing one chunk: either the backend's summary or an
/// inline placeholder recording the failure.
#[derive(Debug, Clone)]
pub struct ChunkSummary {
    pub index: usize,
    pub text: String,
}

pub struct DocumentSummarizer {
    backend: Box<dyn CompletionBackend + Send + Sync>,
    pacer: Box<dyn Pacer + Send + Sync>,
    config: SummarizerConfig,
}

impl DocumentSummarizer {
    pub fn new(
        backend: Box<dyn CompletionBackend + Send + Sync>,
        pacer: Box<dyn Pacer + Send + Sync>,
        config: SummarizerConfig,
    ) -> Self {
        Self {
            backend,
            pacer,
            config,
        }
    }

    /// Summarize a full document, chunking when it exceeds the budget.
    ///
    /// Single-shot failures propagate; in chunked mode every failure is
    /// absorbed (placeholders for chunks, degraded output for combine),
    /// so the chunked path is infallible once it starts.
    pub fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
        let estimated = estimate_tokens(text, self.config.chars_per_token);
        if estimated <= self.config.max_chunk_tokens {
            debug!(estimated_tokens = estimated, "summarizing in one request");
            let summary = self.backend.complete(
                prompt::SINGLE_SHOT_SYSTEM,
                &prompt::single_shot(text),
                self.config.max_summary_tokens,
                self.config.temperature,
            )?;
            return Ok(summary);
        }

        let chunks = split_into_chunks(text, self.config.max_chunk_tokens, self.config.chars_per_token);
        info!(
            estimated_tokens = estimated,
            chunk_count = chunks.len(),
            "document over token budget, chunking"
        );
        let summaries = self.summarize_chunks(&chunks);
        Ok(self.combine(&summaries))
    }

    /// Summarize each chunk in order. A failed chunk yields a placeholder
    /// and the loop continues.
    fn summarize_chunks(&self, chunks: &[Chunk]) -> Vec<ChunkSummary> {
        let mut summaries = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let is_last = chunk.index + 1 == chunks.len();
            let result = self.backend.complete(
                prompt::SECTION_SYSTEM,
                &prompt::section(chunk.index + 1, &chunk.text),
                self.config.max_chunk_summary_tokens,
                self.config.temperature,
            );
            match result {
                Ok(summary) => {
                    debug!(chunk = chunk.index, "chunk summarized");
                    summaries.push(ChunkSummary {
                        index: chunk.index,
                        text: summary,
                    });
                    if !is_last {
                        self.pacer.pause(self.config.chunk_delay);
                    }
                }
                Err(err) => {
                    warn!(chunk = chunk.index, error = %err, "chunk summarization failed");
                    summaries.push(ChunkSummary {
                        index: chunk.index,
                        text: format!("[error processing this section: {err}]"),
                    });
                    if !is_last {
                        let wait = if err.is_rate_limited() {
                            self.config.rate_limit_cooldown
                        } else {
                            self.config.chunk_delay
                        };
                        self.pacer.pause(wait);
                    }
                }
            }
        }
        summaries
    }

    /// Fold chunk summaries into one final summary. On failure, returns
    /// the labelled summaries under a degraded header instead of erroring.
    fn combine(&self, summaries: &[ChunkSummary]) -> String {
        if summaries.is_empty() {
            return String::new();
        }

        let labelled = summaries
            .iter()
            .map(|s| format!("Section {} Summary:\n{}", s.index + 1, s.text))
            .collect::<Vec<_>>()
            .join("\n\n");

        match self.backend.complete(
            prompt::COMBINE_SYSTEM,
            &prompt::combine(&labelled),
            self.config.max_summary_tokens,
            self.config.temperature,
        ) {
            Ok(summary) => summary,
            Err(err) => {
                warn!(error = %err, "combine step failed, returning section summaries");
                format!("{DEGRADED_HEADER}\n\n{labelled}")
            }
        }
    }
}
