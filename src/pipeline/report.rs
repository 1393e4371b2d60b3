//! Report assembly and persistence.
//!
//! Each processed document gets an output directory holding the final
//! report in JSON and plain-text form, plus per-page text and metadata
//! artifacts.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::analysis::{DocumentLabel, KeyInformation};
use super::extraction::{ExtractionMethod, Language, PageRecord};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Final analysis report for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    pub document_type: DocumentLabel,
    pub overall_summary: String,
    pub key_information: KeyInformation,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub total_pages: usize,
    pub total_characters: usize,
    pub estimated_tokens: usize,
    /// Distinct page languages in page order, deduplicated.
    pub languages_detected: Vec<Language>,
    pub generated_at: DateTime<Utc>,
}

/// Distinct languages in first-appearance order.
pub fn languages_detected(pages: &[PageRecord]) -> Vec<Language> {
    let mut seen = Vec::new();
    for page in pages {
        if !seen.contains(&page.language) {
            seen.push(page.language);
        }
    }
    seen
}

/// Write `document_summary.json` and `document_summary.txt` into `dir`.
pub fn write_report(dir: &Path, report: &SummaryReport) -> Result<(), ReportError> {
    std::fs::create_dir_all(dir)?;

    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(dir.join("document_summary.json"), json)?;
    std::fs::write(dir.join("document_summary.txt"), render_text_report(report))?;

    tracing::info!(dir = %dir.display(), "report written");
    Ok(())
}

/// Write `page_<N>.txt` and `page_<N>_meta.json` for every page.
pub fn write_page_artifacts(dir: &Path, pages: &[PageRecord]) -> Result<(), ReportError> {
    std::fs::create_dir_all(dir)?;

    for page in pages {
        std::fs::write(
            dir.join(format!("page_{}.txt", page.page_number)),
            page.marked_text(),
        )?;

        let meta = PageMeta {
            page_number: page.page_number,
            language: page.language,
            method: page.method,
            characters: page.text.chars().count(),
        };
        std::fs::write(
            dir.join(format!("page_{}_meta.json", page.page_number)),
            serde_json::to_string_pretty(&meta)?,
        )?;
    }
    Ok(())
}

#[derive(Debug, Serialize, Deserialize)]
struct PageMeta {
    page_number: usize,
    language: Language,
    method: ExtractionMethod,
    characters: usize,
}

fn render_text_report(report: &SummaryReport) -> String {
    let mut out = String::new();
    out.push_str("DOCUMENT ANALYSIS REPORT\n");
    out.push_str("========================\n\n");
    out.push_str(&format!("Document Type: {}\n", report.document_type.as_str()));
    out.push_str(&format!(
        "Generated: {}\n",
        report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!("Pages: {}\n", report.metadata.total_pages));
    out.push_str(&format!(
        "Languages: {}\n\n",
        report
            .metadata
            .languages_detected
            .iter()
            .map(|l| l.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    ));

    out.push_str("SUMMARY\n-------\n");
    out.push_str(&report.overall_summary);
    out.push_str("\n\n");

    out.push_str("KEY INFORMATION\n---------------\n");
    push_set(&mut out, "Names", &report.key_information.names);
    push_set(&mut out, "Dates", &report.key_information.dates);
    push_set(&mut out, "Organizations", &report.key_information.organizations);
    push_set(&mut out, "Locations", &report.key_information.locations);
    push_set(&mut out, "Contact Info", &report.key_information.contact_info);

    out
}

fn push_set(out: &mut String, label: &str, values: &std::collections::BTreeSet<String>) {
    let joined = if values.is_empty() {
        "-".to_string()
    } else {
        values.iter().cloned().collect::<Vec<_>>().join(", ")
    };
    out.push_str(&format!("{label}: {joined}\n"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::analysis::extract_key_information;

    fn sample_report() -> SummaryReport {
        SummaryReport {
            document_type: DocumentLabel::Invoice,
            overall_summary: "An invoice for consulting services.".into(),
            key_information: extract_key_information(
                "Invoice from Jane Doe, due 12/01/2024, billing@example.com",
            ),
            metadata: ReportMetadata {
                total_pages: 2,
                total_characters: 120,
                estimated_tokens: 30,
                languages_detected: vec![Language::En],
                generated_at: Utc::now(),
            },
        }
    }

    fn sample_pages() -> Vec<PageRecord> {
        vec![
            PageRecord {
                page_number: 1,
                text: "First page text".into(),
                language: Language::En,
                method: ExtractionMethod::Direct,
            },
            PageRecord {
                page_number: 2,
                text: "Second page text".into(),
                language: Language::Unknown,
                method: ExtractionMethod::Ocr,
            },
        ]
    }

    #[test]
    fn writes_json_and_text_reports() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample_report();
        write_report(dir.path(), &report).unwrap();

        let json = std::fs::read_to_string(dir.path().join("document_summary.json")).unwrap();
        let parsed: SummaryReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.document_type, DocumentLabel::Invoice);
        assert_eq!(parsed.overall_summary, report.overall_summary);

        let text = std::fs::read_to_string(dir.path().join("document_summary.txt")).unwrap();
        assert!(text.contains("Document Type: Invoice"));
        assert!(text.contains("An invoice for consulting services."));
        assert!(text.contains("Names: Jane Doe"));
        assert!(text.contains("Contact Info: billing@example.com"));
        assert!(text.contains("Organizations: -"));
    }

    #[test]
    fn writes_per_page_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        write_page_artifacts(dir.path(), &sample_pages()).unwrap();

        let page1 = std::fs::read_to_string(dir.path().join("page_1.txt")).unwrap();
        assert_eq!(page1, "[p1]\nFirst page text");

        let meta2 = std::fs::read_to_string(dir.path().join("page_2_meta.json")).unwrap();
        let meta: serde_json::Value = serde_json::from_str(&meta2).unwrap();
        assert_eq!(meta["page_number"], 2);
        assert_eq!(meta["language"], "unknown");
        assert_eq!(meta["method"], "ocr");
    }

    #[test]
    fn languages_deduplicate_in_first_seen_order() {
        let mut pages = sample_pages();
        pages.push(PageRecord {
            page_number: 3,
            text: String::new(),
            language: Language::En,
            method: ExtractionMethod::Direct,
        });
        assert_eq!(
            languages_detected(&pages),
            vec![Language::En, Language::Unknown]
        );
    }
}
