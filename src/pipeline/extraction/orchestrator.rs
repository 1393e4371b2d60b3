use std::path::Path;

use super::language::detect_language;
use super::types::{
    combine_pages, ExtractionMethod, ExtractionResult, OcrEngine, PageRecord, PdfExtractor,
    PdfPageRenderer,
};
use super::ExtractionError;

/// A PDF page whose embedded text layer is shorter than this (after
/// trimming) is treated as scanned and routed through OCR.
pub const DIRECT_TEXT_THRESHOLD: usize = 50;

/// Concrete document extractor. Uses trait objects for OCR, PDF text
/// extraction, and page rendering, enabling dependency injection.
pub struct DocumentExtractor {
    ocr_engine: Box<dyn OcrEngine + Send + Sync>,
    pdf_extractor: Box<dyn PdfExtractor + Send + Sync>,
    pdf_renderer: Box<dyn PdfPageRenderer + Send + Sync>,
}

impl DocumentExtractor {
    pub fn new(
        ocr_engine: Box<dyn OcrEngine + Send + Sync>,
        pdf_extractor: Box<dyn PdfExtractor + Send + Sync>,
        pdf_renderer: Box<dyn PdfPageRenderer + Send + Sync>,
    ) -> Self {
        Self {
            ocr_engine,
            pdf_extractor,
            pdf_renderer,
        }
    }

    /// Extract text from a file on disk, dispatching on its extension.
    pub fn extract_file(&self, path: &Path) -> Result<ExtractionResult, ExtractionError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        let bytes = std::fs::read(path)?;
        self.extract_bytes(&bytes, &extension)
    }

    /// Extract text from in-memory file bytes.
    pub fn extract_bytes(
        &self,
        bytes: &[u8],
        extension: &str,
    ) -> Result<ExtractionResult, ExtractionError> {
        tracing::info!(extension, size = bytes.len(), "starting text extraction");

        let pages = match extension {
            "pdf" => self.extract_pdf(bytes)?,
            "png" | "jpg" | "jpeg" | "tiff" | "bmp" => {
                let text = self.ocr_engine.ocr_image(bytes)?;
                vec![page_record(1, text, ExtractionMethod::Ocr)]
            }
            "txt" => {
                let text = String::from_utf8_lossy(bytes).into_owned();
                vec![page_record(1, text, ExtractionMethod::Direct)]
            }
            _ => return Err(ExtractionError::UnsupportedFormat),
        };

        let combined_text = combine_pages(&pages);
        let page_count = pages.len();
        Ok(ExtractionResult {
            pages,
            combined_text,
            page_count,
        })
    }

    /// Extract a PDF page by page. Pages with a real text layer are read
    /// directly; near-empty pages are assumed scanned and go through OCR.
    /// When OCR itself fails the direct text is kept rather than losing
    /// the page.
    fn extract_pdf(&self, bytes: &[u8]) -> Result<Vec<PageRecord>, ExtractionError> {
        let page_texts = self.pdf_extractor.extract_pages(bytes)?;

        let mut pages = Vec::with_capacity(page_texts.len());
        for (index, direct_text) in page_texts.into_iter().enumerate() {
            let page_number = index + 1;

            if direct_text.trim().chars().count() >= DIRECT_TEXT_THRESHOLD {
                pages.push(page_record(page_number, direct_text, ExtractionMethod::Direct));
                continue;
            }

            match self.ocr_pdf_page(bytes, index) {
                Ok(text) => {
                    tracing::debug!(page = page_number, "page recovered via OCR");
                    pages.push(page_record(page_number, text, ExtractionMethod::Ocr));
                }
                Err(err) => {
                    tracing::warn!(
                        page = page_number,
                        error = %err,
                        "OCR fallback failed, keeping direct text"
                    );
                    pages.push(page_record(page_number, direct_text, ExtractionMethod::Direct));
                }
            }
        }

        Ok(pages)
    }

    fn ocr_pdf_page(&self, pdf_bytes: &[u8], page_index: usize) -> Result<String, ExtractionError> {
        let png = self.pdf_renderer.render_page(pdf_bytes, page_index)?;
        self.ocr_engine.ocr_image(&png)
    }
}

fn page_record(page_number: usize, text: String, method: ExtractionMethod) -> PageRecord {
    let language = detect_language(&text);
    PageRecord {
        page_number,
        text,
        language,
        method,
    }
}
