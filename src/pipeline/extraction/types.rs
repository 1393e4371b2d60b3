use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// Per-page language classification over a closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Ml,
    Mixed,
    Unknown,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ml => "ml",
            Language::Mixed => "mixed",
            Language::Unknown => "unknown",
        }
    }
}

/// How a page's text was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    /// Embedded text layer read directly from the file.
    Direct,
    /// Recognized from a page image.
    Ocr,
}

/// Text and metadata for a single extracted page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    /// 1-based page number.
    pub page_number: usize,
    pub text: String,
    pub language: Language,
    pub method: ExtractionMethod,
}

impl PageRecord {
    /// Page text prefixed with its page marker, e.g. `[p3]`.
    pub fn marked_text(&self) -> String {
        format!("[p{}]\n{}", self.page_number, self.text)
    }
}

/// Result of extracting a whole document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub pages: Vec<PageRecord>,
    /// All page texts with markers, joined in page order.
    pub combined_text: String,
    pub page_count: usize,
}

/// Join page records into the combined marked-up document text.
pub fn combine_pages(pages: &[PageRecord]) -> String {
    pages
        .iter()
        .map(PageRecord::marked_text)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// OCR engine abstraction (allows mocking for tests).
pub trait OcrEngine {
    fn ocr_image(&self, image_bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// PDF embedded-text extraction abstraction.
pub trait PdfExtractor {
    /// Extract the embedded text layer of every page, in page order.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError>;
}

/// Renders one PDF page to an image suitable for OCR.
pub trait PdfPageRenderer {
    /// Produce PNG bytes for the page at `page_index` (0-based).
    fn render_page(&self, pdf_bytes: &[u8], page_index: usize) -> Result<Vec<u8>, ExtractionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marked_text_prefixes_page_number() {
        let page = PageRecord {
            page_number: 3,
            text: "hello".into(),
            language: Language::En,
            method: ExtractionMethod::Direct,
        };
        assert_eq!(page.marked_text(), "[p3]\nhello");
    }

    #[test]
    fn combine_pages_joins_in_order() {
        let pages = vec![
            PageRecord {
                page_number: 1,
                text: "first".into(),
                language: Language::En,
                method: ExtractionMethod::Direct,
            },
            PageRecord {
                page_number: 2,
                text: "second".into(),
                language: Language::Unknown,
                method: ExtractionMethod::Ocr,
            },
        ];
        assert_eq!(combine_pages(&pages), "[p1]\nfirst\n\n[p2]\nsecond");
    }

    #[test]
    fn language_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Language::Ml).unwrap(), "\"ml\"");
        assert_eq!(serde_json::to_string(&Language::Mixed).unwrap(), "\"mixed\"");
        assert_eq!(Language::Unknown.as_str(), "unknown");
    }
}
