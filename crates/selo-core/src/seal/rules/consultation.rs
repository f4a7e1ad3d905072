//! Consultation code ("selo de consulta") extraction.

use lazy_static::lazy_static;

use super::{accept_verbatim, first_accepted, ExtractionMatch, FieldExtractor, PatternRule, SealText};

lazy_static! {
    /// Most specific label wording first.
    static ref CONSULTATION_RULES: Vec<PatternRule<String>> = vec![
        PatternRule::new(
            "selo de consulta",
            r"(?i)SELO\s+DE\s+CONSULTA[:\s]*([A-Z0-9]{8,})",
            0.95,
            accept_verbatim,
        ),
        PatternRule::new(
            "selo consulta",
            r"(?i)Selo\s+Consulta[:\s]*([A-Z0-9]{8,})",
            0.9,
            accept_verbatim,
        ),
        PatternRule::new("selo", r"(?i)\bSELO[:\s]*([A-Z0-9]{8,})", 0.75, accept_verbatim),
        PatternRule::new("consulta", r"(?i)\bconsulta[:\s]*([A-Z0-9]{8,})", 0.7, accept_verbatim),
    ];
}

/// Consultation code extractor.
pub struct ConsultationCodeExtractor;

impl ConsultationCodeExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsultationCodeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for ConsultationCodeExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &SealText<'_>) -> Option<Self::Output> {
        // Labels are matched on uniform spacing first; raw text is the last resort.
        first_accepted(&CONSULTATION_RULES, &[text.normalized.as_str(), text.raw])
    }
}

/// Extract the consultation code, or an empty string.
pub fn extract_consultation_code(raw: &str, normalized: &str) -> String {
    first_accepted(&CONSULTATION_RULES, &[normalized, raw])
        .map(|m| m.value)
        .unwrap_or_default()
}
