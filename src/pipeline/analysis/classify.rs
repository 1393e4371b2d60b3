//! Keyword-based document classification.

use serde::{Deserialize, Serialize};

/// Document category assigned from content keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentLabel {
    #[serde(rename = "Resume/CV")]
    Resume,
    Invoice,
    Contract,
    Report,
    Document,
}

impl DocumentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentLabel::Resume => "Resume/CV",
            DocumentLabel::Invoice => "Invoice",
            DocumentLabel::Contract => "Contract",
            DocumentLabel::Report => "Report",
            DocumentLabel::Document => "Document",
        }
    }
}

/// Rules are checked in order; the first category with any keyword hit
/// wins. Falls back to the generic `Document` label.
const RULES: &[(DocumentLabel, &[&str])] = &[
    (DocumentLabel::Resume, &["resume", "cv", "experience", "skills"]),
    (DocumentLabel::Invoice, &["invoice", "bill", "payment"]),
    (DocumentLabel::Contract, &["contract", "agreement", "terms"]),
    (DocumentLabel::Report, &["report"]),
];

/// Classify a document from its full text. Matching is case-insensitive
/// substring search.
pub fn detect_document_type(text: &str) -> DocumentLabel {
    let lower = text.to_lowercase();
    for (label, keywords) in RULES {
        if keywords.iter().any(|kw| lower.contains(kw)) {
            return *label;
        }
    }
    DocumentLabel::Document
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_resume() {
        let text = "Jane Doe\nWork Experience\n2019-2024 Senior Engineer";
        assert_eq!(detect_document_type(text), DocumentLabel::Resume);
    }

    #[test]
    fn detects_invoice() {
        let text = "INVOICE #4492\nPayment due within 30 days";
        assert_eq!(detect_document_type(text), DocumentLabel::Invoice);
    }

    #[test]
    fn detects_contract() {
        let text = "This Agreement is entered into by the parties below.";
        assert_eq!(detect_document_type(text), DocumentLabel::Contract);
    }

    #[test]
    fn detects_report() {
        let text = "Quarterly report on regional sales figures.";
        assert_eq!(detect_document_type(text), DocumentLabel::Report);
    }

    #[test]
    fn earlier_rule_wins_on_overlap() {
        // "experience" (resume) and "report" both present; resume is checked first.
        let text = "Annual report describing candidate experience requirements.";
        assert_eq!(detect_document_type(text), DocumentLabel::Resume);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(
            detect_document_type("FINAL REPORT"),
            DocumentLabel::Report
        );
    }

    #[test]
    fn unmatched_text_is_generic_document() {
        assert_eq!(
            detect_document_type("A plain letter to a friend."),
            DocumentLabel::Document
        );
        assert_eq!(detect_document_type(""), DocumentLabel::Document);
    }

    #[test]
    fn label_serializes_with_display_name() {
        assert_eq!(
            serde_json::to_string(&DocumentLabel::Resume).unwrap(),
            "\"Resume/CV\""
        );
        assert_eq!(
            serde_json::to_string(&DocumentLabel::Invoice).unwrap(),
            "\"Invoice\""
        );
    }
}
