use super::types::PdfExtractor;
use super::ExtractionError;

/// PDF text extractor using the pdf-extract crate.
/// Handles digital PDFs with embedded text layers.
pub struct PdfTextExtractor;

impl PdfExtractor for PdfTextExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
            .map_err(|e| ExtractionError::PdfParsing(e.to_string()))
    }
}

/// Mock PDF extractor returning scripted page texts. For tests.
pub struct MockPdfExtractor {
    pub pages: Vec<String>,
}

impl MockPdfExtractor {
    pub fn new(pages: Vec<&str>) -> Self {
        Self {
            pages: pages.into_iter().map(String::from).collect(),
        }
    }
}

impl PdfExtractor for MockPdfExtractor {
    fn extract_pages(&self, _pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        Ok(self.pages.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Generate a valid PDF with text using lopdf (the library that pdf-extract uses internally).
    fn make_test_pdf(text: &str) -> Vec<u8> {
        use lopdf::dictionary;
        use lopdf::{Document, Object, Stream};

        let mut doc = Document::with_version("1.4");

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let content = format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET");
        let content_stream = Stream::new(dictionary! {}, content.into_bytes());
        let content_id = doc.add_object(content_stream);

        let resources = dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        };

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources,
        });

        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        });

        if let Ok(page) = doc.get_object_mut(page_id) {
            if let Object::Dictionary(ref mut dict) = page {
                dict.set("Parent", pages_id);
            }
        }

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });

        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn extract_pages_from_digital_pdf() {
        let extractor = PdfTextExtractor;
        let pdf_bytes = make_test_pdf("Hello World from the pipeline");
        let pages = extractor.extract_pages(&pdf_bytes).unwrap();

        assert!(!pages.is_empty(), "Should extract at least one page");
        let full_text: String = pages.concat();
        assert!(
            full_text.contains("Hello") || full_text.contains("World"),
            "Expected text to contain 'Hello' or 'World', got: {full_text}"
        );
    }

    #[test]
    fn invalid_pdf_returns_error() {
        let extractor = PdfTextExtractor;
        let result = extractor.extract_pages(b"not a pdf");
        assert!(result.is_err());
    }

    #[test]
    fn mock_extractor_returns_scripted_pages() {
        let extractor = MockPdfExtractor::new(vec!["page one", "page two"]);
        let pages = extractor.extract_pages(b"ignored").unwrap();
        assert_eq!(pages, vec!["page one", "page two"]);
    }
}
