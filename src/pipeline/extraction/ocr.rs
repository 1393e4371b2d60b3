use super::types::OcrEngine;
use super::ExtractionError;

/// Bundled Tesseract OCR engine.
/// Only available when compiled with the `ocr` feature flag.
#[cfg(feature = "ocr")]
pub struct BundledTesseract {
    tessdata_dir: std::path::PathBuf,
    languages: String,
}

#[cfg(feature = "ocr")]
impl BundledTesseract {
    /// Initialize with a tessdata directory. Defaults to "mal+eng" when
    /// Malayalam traineddata is available, otherwise falls back to "eng".
    pub fn new(tessdata_dir: &std::path::Path) -> Result<Self, ExtractionError> {
        if !tessdata_dir.join("eng.traineddata").exists() {
            return Err(ExtractionError::TessdataNotFound(tessdata_dir.to_path_buf()));
        }

        let languages = if tessdata_dir.join("mal.traineddata").exists() {
            "mal+eng".to_string()
        } else {
            tracing::warn!(
                "no mal.traineddata at {}, using English only",
                tessdata_dir.display()
            );
            "eng".to_string()
        };

        Ok(Self {
            tessdata_dir: tessdata_dir.to_path_buf(),
            languages,
        })
    }

    /// Override the language string (e.g. "eng", "mal+eng").
    pub fn with_languages(mut self, langs: &str) -> Self {
        self.languages = langs.to_string();
        self
    }
}

#[cfg(feature = "ocr")]
impl OcrEngine for BundledTesseract {
    fn ocr_image(&self, image_bytes: &[u8]) -> Result<String, ExtractionError> {
        let tessdata_str = self
            .tessdata_dir
            .to_str()
            .ok_or_else(|| ExtractionError::OcrInit("invalid tessdata path".into()))?;

        let tess = tesseract::Tesseract::new(Some(tessdata_str), Some(&self.languages))
            .map_err(|e| ExtractionError::OcrInit(format!("{e:?}")))?;

        let mut tess = tess
            .set_image_from_mem(image_bytes)
            .map_err(|e| ExtractionError::OcrProcessing(format!("{e:?}")))?;

        tess.get_text()
            .map_err(|e| ExtractionError::OcrProcessing(format!("{e:?}")))
    }
}

/// Mock OCR engine for unit testing without Tesseract.
pub struct MockOcrEngine {
    pub text: String,
}

impl MockOcrEngine {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl OcrEngine for MockOcrEngine {
    fn ocr_image(&self, _image_bytes: &[u8]) -> Result<String, ExtractionError> {
        Ok(self.text.clone())
    }
}

/// OCR engine that always fails. For exercising fallback paths in tests.
pub struct FailingOcrEngine;

impl OcrEngine for FailingOcrEngine {
    fn ocr_image(&self, _image_bytes: &[u8]) -> Result<String, ExtractionError> {
        Err(ExtractionError::OcrProcessing("engine unavailable".into()))
    }
}
