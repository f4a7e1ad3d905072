//! Act count extraction with embedded act-code repair.
//!
//! Seals print the number of acts followed by the act code in parentheses,
//! e.g. `1(7901)`. OCR regularly misreads the opening parenthesis as a digit
//! and glues the code onto the count (`117901)`), so after the base count is
//! found the raw text is searched for that signature and the compound value is
//! rebuilt.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::models::seal::ActCount;

use super::patterns::ANY_CODE_GROUP;
use super::{first_accepted, ExtractionMatch, FieldExtractor, PatternRule, SealText};

/// Largest plausible number of acts on a single seal.
pub const MAX_ACT_COUNT: u16 = 999;

lazy_static! {
    static ref BASE_COUNT_RULES: Vec<PatternRule<u16>> = vec![
        PatternRule::new(
            "quantidade de atos praticados",
            r"(?i)Quantidade\s+de\s+atos\s+praticados[:\s]*(\d+)",
            0.95,
            accept_count,
        ),
        PatternRule::new("qtd. atos", r"(?i)Qtd\.?\s+Atos[:\s]*(\d+)", 0.9, accept_count),
        PatternRule::new("qtd de atos", r"(?i)Qtd\s+de\s+atos[:\s]*(\d+)", 0.9, accept_count),
        PatternRule::new("quantidade", r"(?i)quantidade[:\s]*(\d+)", 0.85, accept_count),
        PatternRule::new("n atos", r"(?i)(\d+)\s+atos", 0.75, accept_count),
        PatternRule::new("n(code)", r"(\d+)\s*\(\d+\)", 0.7, accept_count),
        PatternRule::new("isolated line", r"(?m)^(\d+)\s*$", 0.5, accept_count),
    ];
}

/// Accept counts in `1..=MAX_ACT_COUNT`; anything else is extraction noise.
fn accept_count(candidate: &str) -> Option<u16> {
    candidate
        .parse::<u16>()
        .ok()
        .filter(|n| (1..=MAX_ACT_COUNT).contains(n))
}

/// Act count extractor.
pub struct ActCountExtractor {
    repair: bool,
}

impl ActCountExtractor {
    /// Create a new extractor with code repair enabled.
    pub fn new() -> Self {
        Self { repair: true }
    }

    /// Set whether embedded act codes are recovered.
    pub fn with_repair(mut self, repair: bool) -> Self {
        self.repair = repair;
        self
    }

    /// Find the base count: every rule on raw text, then on normalized text.
    pub fn base_count(&self, text: &SealText<'_>) -> Option<ExtractionMatch<u16>> {
        first_accepted(&BASE_COUNT_RULES, &[text.raw, text.normalized.as_str()])
    }
}

impl Default for ActCountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for ActCountExtractor {
    type Output = ExtractionMatch<ActCount>;

    fn extract(&self, text: &SealText<'_>) -> Option<Self::Output> {
        let base = self.base_count(text)?;
        let n = base.value;
        debug!("Act count base {} matched by rule '{}'", n, base.rule);

        let count = if self.repair {
            repair_glued_code(text.raw, n)
                .or_else(|| find_code_group(text.raw, n))
                .unwrap_or_else(|| ActCount::new(n))
        } else {
            ActCount::new(n)
        };

        Some(ExtractionMatch {
            value: count,
            confidence: base.confidence,
            position: base.position,
            source: base.source,
            rule: base.rule,
        })
    }
}

/// Extract the act count as its string form (`"N"`, `"N(code)"`), or an empty
/// string.
pub fn extract_act_count(raw: &str, normalized: &str) -> String {
    let text = SealText {
        raw,
        normalized: normalized.to_string(),
    };
    ActCountExtractor::new()
        .extract(&text)
        .map(|m| m.value.to_string())
        .unwrap_or_default()
}

/// Repair `<n><4 digits>)`, the signature of a lost opening parenthesis.
/// A following `, <digits>)` group on the same line is kept as well, and so
/// is an intact `n(code)` group earlier on that line, which then leads.
///
/// Not anchored on the left: the lost parenthesis is usually read as a digit,
/// so in `117901)` the count `1` is preceded by that misread character.
fn repair_glued_code(raw: &str, n: u16) -> Option<ActCount> {
    let pattern = Regex::new(&format!(r"{n}(\d{{4}})\)(?:,[ \t]*(\d+)\))?")).ok()?;
    let caps = pattern.captures(raw)?;
    let glued = caps.get(0)?;

    let line_start = raw[..glued.start()].rfind('\n').map_or(0, |i| i + 1);
    let intact = Regex::new(&format!(r"\b0*{n}[ \t]*\([ \t]*(\d{{4}})[ \t]*\)")).ok()?;
    let leading = intact
        .captures(&raw[line_start..glued.start()])
        .map(|c| c[1].to_string());

    let count = match (leading, caps.get(2)) {
        (Some(code), None) => ActCount::new(n).with_code(code).with_extra(&caps[1]),
        (_, Some(extra)) => ActCount::new(n).with_code(&caps[1]).with_extra(extra.as_str()),
        (None, None) => ActCount::new(n).with_code(&caps[1]),
    };

    debug!("Repaired glued act code: '{}' -> {}", glued.as_str(), count);
    Some(count)
}

/// Look for codes that survived OCR: `n(code)`, then any `digits(code)` group
/// on one line, then four digits within ten characters after `n`.
fn find_code_group(raw: &str, n: u16) -> Option<ActCount> {
    let own_group = Regex::new(&format!(r"\b0*{n}[ \t]*\([ \t]*([^)\n]+?)[ \t]*\)")).ok()?;
    if let Some(caps) = own_group.captures(raw) {
        return Some(ActCount::new(n).with_code(&caps[1]));
    }

    if let Some(caps) = ANY_CODE_GROUP.captures(raw) {
        return Some(ActCount::new(n).with_code(&caps[1]));
    }

    let nearby = Regex::new(&format!(r"\b0*{n}[^\d\n]{{0,10}}(\d{{4}})(?:\D|$)")).ok()?;
    nearby
        .captures(raw)
        .map(|caps| ActCount::new(n).with_code(&caps[1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seal::rules::normalize;

    fn extract(raw: &str) -> String {
        extract_act_count(raw, &normalize(raw))
    }

    #[test]
    fn test_labelled_counts() {
        assert_eq!(extract("Quantidade de atos praticados: 3"), "3");
        assert_eq!(extract("Qtd. Atos: 12"), "12");
        assert_eq!(extract("QUANTIDADE: 01"), "1");
        assert_eq!(extract("foram 2 atos"), "2");
    }

    #[test]
    fn test_isolated_number_line() {
        assert_eq!(extract("SELO\n4\nFIM"), "4");
        assert_eq!(extract("SELO\r\n4\r\nFIM"), "4");
    }

    #[test]
    fn test_repairs_glued_code() {
        assert_eq!(extract("QUANTIDADE: 1\n117901)"), "1(7901)");
    }

    #[test]
    fn test_repair_keeps_intact_leading_group() {
        assert_eq!(
            extract("QUANTIDADE: 1(7802), 117901)\nEmol.: R$ 50,73"),
            "1(7802), 7901)"
        );
        // A group on an earlier line is not part of this fragment.
        assert_eq!(extract("1(7802)\nQUANTIDADE: 1 117901)"), "1(7901)");
    }

    #[test]
    fn test_repair_keeps_trailing_group() {
        assert_eq!(extract("QUANTIDADE: 1 117901), 7802)"), "1(7901), 7802)");
    }

    #[test]
    fn test_existing_code_group() {
        assert_eq!(extract("QUANTIDADE: 2 (7804)"), "2(7804)");
        assert_eq!(extract("1(7802)"), "1(7802)");
    }

    #[test]
    fn test_any_code_group() {
        assert_eq!(extract("QUANTIDADE: 3\nATO 5 (7101)"), "3(7101)");
    }

    #[test]
    fn test_code_near_count() {
        assert_eq!(extract("QUANTIDADE: 2 - 7804 ATOS"), "2(7804)");
    }

    #[test]
    fn test_digits_inside_other_numbers_are_not_codes() {
        let raw = "QUANTIDADE: 01 SELO DE CONSULTA: 0471.1314.0274.7824 ISS: R$ 1,42";
        assert_eq!(extract(raw), "1");
    }

    #[test]
    fn test_out_of_range_skipped() {
        // 1500 is noise; the cascade moves on to the next rule.
        assert_eq!(extract("QUANTIDADE: 1500\n7 atos"), "7");
        assert_eq!(extract("QUANTIDADE: 0"), "");
        assert_eq!(extract("Qtd. Atos: 99999999999999999999"), "");
    }

    #[test]
    fn test_range_invariant() {
        let samples = ["1000 atos", "0 atos", "999 atos", "QUANTIDADE: 1000\n1\n"];
        for raw in samples {
            let text = SealText::new(raw);
            if let Some(base) = ActCountExtractor::new().base_count(&text) {
                assert!((1..=MAX_ACT_COUNT).contains(&base.value), "{raw:?}");
            }
        }
    }

    #[test]
    fn test_repair_disabled() {
        let text = SealText::new("QUANTIDADE: 1\n117901)");
        let found = ActCountExtractor::new().with_repair(false).extract(&text).unwrap();
        assert_eq!(found.value, ActCount::new(1));
        assert_eq!(found.rule, "quantidade");
        assert_eq!(found.confidence, 0.85);
    }

    #[test]
    fn test_no_match() {
        assert_eq!(extract("lorem ipsum no relevant fields"), "");
        assert_eq!(extract(""), "");
    }
}
