//! Rule-based field extractors for notarial seals.
//!
//! Each field is recovered by an ordered list of [`PatternRule`]s evaluated
//! lazily: the first rule whose match is accepted wins, so the order of a list
//! is its priority contract.

pub mod act_count;
pub mod amounts;
pub mod consultation;
pub mod normalize;
pub mod patterns;
pub mod performer;
pub mod security;
pub mod values;

pub use act_count::{extract_act_count, ActCountExtractor};
pub use amounts::{format_brl_amount, parse_brl_amount};
pub use consultation::{extract_consultation_code, ConsultationCodeExtractor};
pub use normalize::normalize;
pub use performer::{clean_name, extract_performed_by, PerformerExtractor};
pub use security::{extract_security_code, SecurityCodeExtractor};
pub use values::{extract_value_items, extract_values, ValuesExtractor};

use regex::Regex;

/// Raw OCR text of one seal together with its normalized form.
#[derive(Debug, Clone)]
pub struct SealText<'a> {
    /// Text exactly as returned by the OCR engine.
    pub raw: &'a str,
    /// Whitespace-collapsed, punctuation-stripped variant.
    pub normalized: String,
}

impl<'a> SealText<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            normalized: normalize(raw),
        }
    }
}

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from the seal text.
    fn extract(&self, text: &SealText<'_>) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &SealText<'_>) -> Vec<Self::Output> {
        self.extract(text).into_iter().collect()
    }
}

/// Extraction context with confidence scores.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
    /// Name of the rule that produced the match.
    pub rule: &'static str,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
            rule: "",
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }

    pub fn with_rule(mut self, rule: &'static str) -> Self {
        self.rule = rule;
        self
    }
}

/// One step of a fallback chain: a pattern whose first capture group is handed
/// to an acceptance function that validates and converts it.
pub struct PatternRule<T> {
    /// Rule name, used in logs and as the label of labelled amounts.
    pub name: &'static str,
    /// Pattern with the candidate in capture group 1.
    pub pattern: Regex,
    /// Confidence assigned to accepted candidates.
    pub confidence: f32,
    accept: fn(&str) -> Option<T>,
}

impl<T> PatternRule<T> {
    /// Compile a rule from a pattern literal.
    ///
    /// # Panics
    ///
    /// Panics if `pattern` is not a valid regular expression.
    pub fn new(
        name: &'static str,
        pattern: &str,
        confidence: f32,
        accept: fn(&str) -> Option<T>,
    ) -> Self {
        let pattern = Regex::new(pattern)
            .unwrap_or_else(|e| panic!("invalid pattern for rule `{name}`: {e}"));
        Self {
            name,
            pattern,
            confidence,
            accept,
        }
    }

    /// Apply the rule to the first match of its pattern only.
    pub fn apply(&self, text: &str) -> Option<ExtractionMatch<T>> {
        let caps = self.pattern.captures(text)?;
        let full = caps.get(0)?;
        let value = (self.accept)(caps.get(1)?.as_str())?;

        Some(
            ExtractionMatch::new(value, self.confidence, full.as_str())
                .with_position(full.start(), full.end())
                .with_rule(self.name),
        )
    }

    /// Apply the rule to every match of its pattern.
    pub fn apply_all(&self, text: &str) -> Vec<ExtractionMatch<T>> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let full = caps.get(0)?;
                let value = (self.accept)(caps.get(1)?.as_str())?;
                Some(
                    ExtractionMatch::new(value, self.confidence, full.as_str())
                        .with_position(full.start(), full.end())
                        .with_rule(self.name),
                )
            })
            .collect()
    }
}

/// Run `rules` in order over each of `texts` in turn and return the first
/// accepted candidate. Every rule is tried on the first text before any rule
/// is tried on the second.
pub fn first_accepted<T>(rules: &[PatternRule<T>], texts: &[&str]) -> Option<ExtractionMatch<T>> {
    texts
        .iter()
        .find_map(|text| rules.iter().find_map(|rule| rule.apply(text)))
}

/// Acceptance function for code-like values taken verbatim.
pub(crate) fn accept_verbatim(candidate: &str) -> Option<String> {
    let trimmed = candidate.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
