//! Security code ("código de segurança") extraction.
//!
//! The label is often mangled by OCR (accents dropped, letters split), so the
//! chain falls back to the bare `####.####.####.####` shape and then to a
//! lenient grouping of 3-4 digits.

use lazy_static::lazy_static;

use super::{first_accepted, ExtractionMatch, FieldExtractor, PatternRule, SealText};

lazy_static! {
    static ref SECURITY_CODE_RULES: Vec<PatternRule<String>> = vec![
        PatternRule::new(
            "accented label",
            r"(?i)CÓDIGO\s+DE\s+SEGURANÇA[:\s]*([\d.,\-]+)",
            0.95,
            accept_security_code,
        ),
        PatternRule::new(
            "corrupted label",
            r"(?i)C\s*DIGO\s+DE\s+SEGURAN\s*A[:\s]*([\d.,\-]+)",
            0.9,
            accept_security_code,
        ),
        PatternRule::new(
            "unaccented label",
            r"(?i)CODIGO\s+DE\s+SEGURANCA[:\s]*([\d.,\-]+)",
            0.9,
            accept_security_code,
        ),
        PatternRule::new("seguranca", r"(?i)seguranca[:\s]*([\d.,\-]+)", 0.8, accept_security_code),
        PatternRule::new(
            "codigo seguranca",
            r"(?i)codigo\s+seguranca[:\s]*([\d.,\-]+)",
            0.8,
            accept_security_code,
        ),
        PatternRule::new(
            "standard format",
            r"(\d{4}\.\d{4}\.\d{4}\.\d{4})",
            0.85,
            accept_security_code,
        ),
        PatternRule::new(
            "grouped digits",
            r"(\d{3,4}[.\-]\d{3,4}[.\-]\d{3,4}[.\-]\d{3,4})",
            0.6,
            accept_security_code,
        ),
    ];
}

/// Keep candidates that carry at least one digit, without trailing separators.
fn accept_security_code(candidate: &str) -> Option<String> {
    let code = candidate.trim().trim_end_matches(['.', ',', '-']);
    code.chars()
        .any(|c| c.is_ascii_digit())
        .then(|| code.to_string())
}

/// Security code extractor.
pub struct SecurityCodeExtractor;

impl SecurityCodeExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SecurityCodeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for SecurityCodeExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &SealText<'_>) -> Option<Self::Output> {
        // Raw text first: normalization can disturb the separators.
        first_accepted(&SECURITY_CODE_RULES, &[text.raw, text.normalized.as_str()])
    }
}

/// Extract the security code, or an empty string.
pub fn extract_security_code(raw: &str, normalized: &str) -> String {
    first_accepted(&SECURITY_CODE_RULES, &[raw, normalized])
        .map(|m| m.value)
        .unwrap_or_default()
}
