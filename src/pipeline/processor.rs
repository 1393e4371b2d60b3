//! Document processing orchestrator.
//!
//! Single entry point that drives the full pipeline for one document:
//! extract → page artifacts → summarize → classify → key info → report.
//!
//! Uses trait-based DI for all engines (OcrEngine, CompletionBackend,
//! etc.) so the orchestrator remains fully testable with mocks.

use std::path::Path;

use chrono::Utc;

use crate::config::{AppConfig, ConfigError};
use crate::pipeline::analysis::{detect_document_type, extract_key_information};
use crate::pipeline::extraction::{
    DocumentExtractor, ExtractionError, MockOcrEngine, OcrEngine, PageImageExtractor,
    PdfTextExtractor,
};
use crate::pipeline::report::{
    languages_detected, write_page_artifacts, write_report, ReportError, ReportMetadata,
    SummaryReport,
};
use crate::pipeline::summarize::{
    estimate_tokens, ChatCompletionsBackend, DocumentSummarizer, SummarizeError, ThreadPacer,
    DEFAULT_CHARS_PER_TOKEN,
};

#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Summarization failed: {0}")]
    Summarize(#[from] SummarizeError),

    #[error("Report persistence failed: {0}")]
    Report(#[from] ReportError),
}

/// Orchestrates the stages of document analysis.
pub struct DocumentProcessor {
    extractor: DocumentExtractor,
    summarizer: DocumentSummarizer,
}

impl DocumentProcessor {
    pub fn new(extractor: DocumentExtractor, summarizer: DocumentSummarizer) -> Self {
        Self {
            extractor,
            summarizer,
        }
    }

    /// Run the full pipeline on `source`, writing all artifacts into
    /// `output_dir`, and return the assembled report.
    pub fn process_file(
        &self,
        source: &Path,
        output_dir: &Path,
    ) -> Result<SummaryReport, ProcessingError> {
        tracing::info!(source = %source.display(), "processing document");

        let extraction = self.extractor.extract_file(source)?;
        write_page_artifacts(output_dir, &extraction.pages)?;

        let overall_summary = self.summarizer.summarize(&extraction.combined_text)?;
        let document_type = detect_document_type(&extraction.combined_text);
        // Classification looks at the full text; key info is pulled from
        // the summary, which has already distilled what matters.
        let key_information = extract_key_information(&overall_summary);

        let report = SummaryReport {
            document_type,
            overall_summary,
            key_information,
            metadata: ReportMetadata {
                total_pages: extraction.page_count,
                total_characters: extraction.combined_text.chars().count(),
                estimated_tokens: estimate_tokens(
                    &extraction.combined_text,
                    DEFAULT_CHARS_PER_TOKEN,
                ),
                languages_detected: languages_detected(&extraction.pages),
                generated_at: Utc::now(),
            },
        };
        write_report(output_dir, &report)?;

        tracing::info!(
            document_type = report.document_type.as_str(),
            pages = report.metadata.total_pages,
            "document processed"
        );
        Ok(report)
    }
}

/// Build the production processor from configuration.
///
/// Fails fast when the completion backend has no API token. With the
/// `ocr` feature off, images fall back to a mock engine so text-layer
/// PDFs and plain text still work.
pub fn build_processor(config: &AppConfig) -> Result<DocumentProcessor, ConfigError> {
    let backend = ChatCompletionsBackend::from_config(&config.backend)?;
    let summarizer = DocumentSummarizer::new(
        Box::new(backend),
        Box::new(ThreadPacer),
        config.summarizer.clone(),
    );

    let extractor = DocumentExtractor::new(
        build_ocr_engine(),
        Box::new(PdfTextExtractor),
        Box::new(PageImageExtractor),
    );

    Ok(DocumentProcessor::new(extractor, summarizer))
}

#[cfg(feature = "ocr")]
fn build_ocr_engine() -> Box<dyn OcrEngine + Send + Sync> {
    let tessdata = std::env::var("TESSDATA_DIR")
        .unwrap_or_else(|_| "/usr/share/tesseract-ocr/5/tessdata".to_string());
    match crate::pipeline::extraction::BundledTesseract::new(Path::new(&tessdata)) {
        Ok(engine) => Box::new(engine),
        Err(err) => {
            tracing::warn!(error = %err, "Tesseract unavailable, using mock OCR");
            Box::new(MockOcrEngine::new(""))
        }
    }
}

#[cfg(not(feature = "ocr"))]
fn build_ocr_engine() -> Box<dyn OcrEngine + Send + Sync> {
    tracing::warn!("built without the ocr feature, image OCR returns empty text");
    Box::new(MockOcrEngine::new(""))
}
