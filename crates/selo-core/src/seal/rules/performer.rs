//! "Atos praticados por" (performer name) extraction.
//!
//! Names are read from the raw text so casing and diacritics survive. OCR
//! tends to append garbage after the name on the same line (a misread job
//! title, decorative text), which the cleanup strips from the end only.

use lazy_static::lazy_static;

use super::patterns::{
    NAME_DISALLOWED, NAME_LOWERCASE_SUFFIX, NAME_NEXT_LABEL, NAME_SHORT_WORD_RUN,
    NAME_TRAILING_DIGITS, WHITESPACE_RUN,
};
use super::{first_accepted, ExtractionMatch, FieldExtractor, PatternRule, SealText};

/// Captured text must be longer than this before cleanup.
const MIN_CAPTURE_CHARS: usize = 3;

/// Cleaned names must be longer than this to be accepted.
const MIN_NAME_CHARS: usize = 5;

lazy_static! {
    static ref PERFORMER_RULES: Vec<PatternRule<String>> = vec![
        PatternRule::new(
            "praticado(s) por",
            r"(?i)Praticado\(s\)\s+por[:\s]*([^\n\r]+)",
            0.95,
            accept_name,
        ),
        PatternRule::new(
            "atos praticados por",
            r"(?i)Atos\s+praticados\s+por[:\s]*([^\n\r]+)",
            0.9,
            accept_name,
        ),
        PatternRule::new("praticado por", r"(?i)praticado\s+por[:\s]*([^\n\r]+)", 0.85, accept_name),
        PatternRule::new("por:", r"(?i)\bpor:\s*([A-Za-zÀ-ÿ][^\n\r]*)", 0.6, accept_name),
    ];
}

fn accept_name(candidate: &str) -> Option<String> {
    let candidate = match NAME_NEXT_LABEL.find(candidate) {
        Some(label) => &candidate[..label.start()],
        None => candidate,
    };
    let candidate = candidate.trim();
    if candidate.chars().count() <= MIN_CAPTURE_CHARS {
        return None;
    }

    let name = clean_name(candidate);
    (name.chars().count() > MIN_NAME_CHARS).then_some(name)
}

/// Strip trailing OCR garbage from a captured name.
///
/// Steps, in order: a ` - lowercase words` suffix, trailing mixed-case noise
/// tokens, trailing runs of 1-3 letter lowercase words, trailing digits, then
/// stray symbols anywhere are replaced by spaces and whitespace is collapsed.
pub fn clean_name(candidate: &str) -> String {
    let name = NAME_LOWERCASE_SUFFIX.replace(candidate.trim(), "");
    let name = strip_mixed_case_noise(&name);
    let name = NAME_SHORT_WORD_RUN.replace(name, "");
    let name = NAME_TRAILING_DIGITS.replace(&name, "");
    let name = NAME_DISALLOWED.replace_all(&name, " ");
    WHITESPACE_RUN.replace_all(&name, " ").trim().to_string()
}

/// Drop trailing tokens like `RRFRcSaSoS`.
fn strip_mixed_case_noise(name: &str) -> &str {
    let mut name = name.trim_end();
    while let Some(split) = name.rfind(char::is_whitespace) {
        let (head, token) = name.split_at(split);
        if !is_mixed_case_noise(token.trim_start()) {
            break;
        }
        name = head.trim_end();
    }
    name
}

/// A token is noise when case flips from lower to upper more than once, which
/// real names (`McDonald`) do not do.
fn is_mixed_case_noise(token: &str) -> bool {
    let letters: Vec<char> = token.chars().filter(|c| c.is_alphabetic()).collect();
    let flips = letters
        .windows(2)
        .filter(|pair| pair[0].is_lowercase() && pair[1].is_uppercase())
        .count();
    flips >= 2
}

/// Performer name extractor.
pub struct PerformerExtractor;

impl PerformerExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PerformerExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PerformerExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &SealText<'_>) -> Option<Self::Output> {
        first_accepted(&PERFORMER_RULES, &[text.raw])
    }
}

/// Extract the name of who performed the acts, or an empty string.
pub fn extract_performed_by(raw: &str) -> String {
    first_accepted(&PERFORMER_RULES, &[raw])
        .map(|m| m.value)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_lowercase_suffix() {
        let raw = "Praticado(s) por: JANAINA STANNISLAVA E SILVA - ar ato\nESCREVENTE";
        assert_eq!(extract_performed_by(raw), "JANAINA STANNISLAVA E SILVA");
    }

    #[test]
    fn test_strips_mixed_case_noise() {
        let raw = "Ato(s) Praticado(s) por: MARIA JOSÉ DA SILVA RRFRcSaSoS\nESCREVENTE AUTORIZADA";
        assert_eq!(extract_performed_by(raw), "MARIA JOSÉ DA SILVA");
    }

    #[test]
    fn test_single_line_stops_at_next_label() {
        let raw = "SALDANHA / SÃO LUÍS     SELO DE CONSULTA: 0471.1314.0274.7824     \
                   QUANTIDADE: 01     ATOS PRATICADOS POR: JANAINA STANNISLAVA E silva RRFRcSaSoS     \
                   EMOL.: R$ 50,73     ISS: R$ 1,42     CÓDIGO DE SEGURANÇA: 0471.1314.0274.7824";
        assert_eq!(extract_performed_by(raw), "JANAINA STANNISLAVA E silva");

        let raw = "Praticado(s) por: PEDRO ALVES TOTALIZA Total: R$ 3,00";
        assert_eq!(extract_performed_by(raw), "PEDRO ALVES TOTALIZA");
    }

    #[test]
    fn test_keeps_clean_name() {
        let raw = "Ato(s) Praticado(s) por: JOÃO CARLOS PEREIRA\nESCREVENTE AUTORIZADA";
        assert_eq!(extract_performed_by(raw), "JOÃO CARLOS PEREIRA");
    }

    #[test]
    fn test_keeps_inner_hyphen() {
        let raw = "Ato(s) Praticado(s) por: ANNE-MARIE COSTA - xyz abc\nESCREVENTE";
        assert_eq!(extract_performed_by(raw), "ANNE-MARIE COSTA");
    }

    #[test]
    fn test_strips_trailing_digits_and_short_words() {
        assert_eq!(
            extract_performed_by("Praticado(s) por: PEDRO SANTOS 123\nESCREVENTE"),
            "PEDRO SANTOS"
        );
        assert_eq!(
            extract_performed_by("Atos praticados por: CARLA MENDES ar ato"),
            "CARLA MENDES"
        );
    }

    #[test]
    fn test_strips_symbols() {
        assert_eq!(
            extract_performed_by("praticado por: LUIZA | NUNES *"),
            "LUIZA NUNES"
        );
    }

    #[test]
    fn test_short_candidate_falls_through() {
        // The first label only yields "ANA" after cleanup; the generic label
        // on a later line provides the accepted name.
        let raw = "Praticado(s) por ANA 12\nPor: BEATRIZ LIMA";
        assert_eq!(extract_performed_by(raw), "BEATRIZ LIMA");
    }

    #[test]
    fn test_name_length_invariant() {
        let samples = [
            "Praticado(s) por: JO",
            "Praticado(s) por: ABCDE",
            "por: x - y",
            "Praticado(s) por: ABCDEF",
        ];
        for raw in samples {
            let name = extract_performed_by(raw);
            assert!(name.is_empty() || name.chars().count() > MIN_NAME_CHARS, "{raw:?}");
        }
    }

    #[test]
    fn test_mixed_case_detection() {
        assert!(is_mixed_case_noise("RRFRcSaSoS"));
        assert!(!is_mixed_case_noise("McDonald"));
        assert!(!is_mixed_case_noise("SILVA"));
        assert!(!is_mixed_case_noise("silva"));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(extract_performed_by("lorem ipsum no relevant fields"), "");
        assert_eq!(extract_performed_by(""), "");
    }
}
