pub mod language;
pub mod ocr;
pub mod orchestrator;
pub mod pdf;
pub mod render;
pub mod types;

pub use language::detect_language;
pub use ocr::*;
pub use orchestrator::{DocumentExtractor, DIRECT_TEXT_THRESHOLD};
pub use pdf::*;
pub use render::PageImageExtractor;
pub use types::*;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tesseract OCR initialization failed: {0}")]
    OcrInit(String),

    #[error("OCR processing failed: {0}")]
    OcrProcessing(String),

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Tessdata not found at: {0}")]
    TessdataNotFound(PathBuf),

    #[error("Unsupported format for extraction")]
    UnsupportedFormat,
}
