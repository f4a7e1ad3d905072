//! Monetary values printed on the seal.
//!
//! Every occurrence of a known `label: R$ amount` pair is collected. Only when
//! no labelled pair exists anywhere are bare `R$ amount` figures used, tagged
//! `Valor`. Results keep the order in which they appear on the seal.

use std::collections::HashSet;

use lazy_static::lazy_static;

use crate::models::seal::LabeledAmount;

use super::amounts::parse_brl_amount;
use super::patterns::BARE_AMOUNT;
use super::{ExtractionMatch, FieldExtractor, PatternRule, SealText};

/// Separator between serialized amounts.
pub const DEFAULT_SEPARATOR: &str = " - ";

/// Label of amounts found without a recognised label.
pub const GENERIC_LABEL: &str = "Valor";

lazy_static! {
    /// Rule names double as the printed label.
    static ref LABELED_AMOUNT_RULES: Vec<PatternRule<String>> = vec![
        PatternRule::new("Emol", r"(?i)Emol\.?[:\s]*R\$?\s*([\d,.]+)", 0.9, accept_amount),
        PatternRule::new(
            "Tx. Judic",
            r"(?i)Tx\.?\s*Judic\.?[:\s]*R\$?\s*([\d,.]+)",
            0.9,
            accept_amount,
        ),
        PatternRule::new("Total", r"(?i)Total[:\s]*R\$?\s*([\d,.]+)", 0.9, accept_amount),
        PatternRule::new("ISS", r"(?i)ISS[:\s]*R\$?\s*([\d,.]+)", 0.85, accept_amount),
        PatternRule::new("ISSQN", r"(?i)ISSQN[:\s]*R\$?\s*([\d,.]+)", 0.85, accept_amount),
        PatternRule::new("Taxa", r"(?i)Taxa[:\s]*R\$?\s*([\d,.]+)", 0.8, accept_amount),
    ];

    static ref BARE_AMOUNT_RULE: PatternRule<String> = PatternRule {
        name: GENERIC_LABEL,
        pattern: BARE_AMOUNT.clone(),
        confidence: 0.5,
        accept: accept_amount,
    };
}

/// Amounts need a digit; trailing punctuation belongs to the sentence.
fn accept_amount(candidate: &str) -> Option<String> {
    let amount = candidate.trim().trim_end_matches(['.', ',']);
    amount
        .chars()
        .any(|c| c.is_ascii_digit())
        .then(|| amount.to_string())
}

/// Monetary values extractor.
pub struct ValuesExtractor {
    separator: String,
}

impl ValuesExtractor {
    /// Create a new extractor joining amounts with `" - "`.
    pub fn new() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }

    /// Set the separator used by [`ValuesExtractor::join`].
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// All amounts of the raw text, in source order.
    pub fn items(&self, raw: &str) -> Vec<LabeledAmount> {
        self.extract_all(&SealText {
            raw,
            normalized: String::new(),
        })
        .into_iter()
        .map(|m| LabeledAmount {
            label: m.rule.to_string(),
            value: parse_brl_amount(&m.value),
            amount: m.value,
            position: m.position.map(|(start, _)| start).unwrap_or_default(),
        })
        .collect()
    }

    /// Serialize amounts as `label: R$ amount` segments.
    pub fn join(&self, items: &[LabeledAmount]) -> String {
        items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(&self.separator)
    }
}

impl Default for ValuesExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for ValuesExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &SealText<'_>) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &SealText<'_>) -> Vec<Self::Output> {
        let mut found: Vec<_> = LABELED_AMOUNT_RULES
            .iter()
            .flat_map(|rule| rule.apply_all(text.raw))
            .collect();

        if found.is_empty() {
            found = BARE_AMOUNT_RULE.apply_all(text.raw);
        }

        found.sort_by_key(|m| m.position);

        // Two labels can end on the same figure; keep the first.
        let mut seen = HashSet::new();
        found.retain(|m| seen.insert(m.position.map(|(_, end)| end)));
        found
    }
}

/// Extract every labelled amount of the raw text, in source order.
pub fn extract_value_items(raw: &str) -> Vec<LabeledAmount> {
    ValuesExtractor::new().items(raw)
}

/// Extract the serialized values string, or an empty string.
pub fn extract_values(raw: &str) -> String {
    let extractor = ValuesExtractor::new();
    extractor.join(&extractor.items(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    #[test]
    fn test_labelled_values_in_source_order() {
        let raw = "Emol.: R$ 50,73 ... Total: R$ 60,98 ... ISS: R$ 1,42";
        assert_eq!(
            extract_values(raw),
            "Emol: R$ 50,73 - Total: R$ 60,98 - ISS: R$ 1,42"
        );
    }

    #[test]
    fn test_order_follows_position_not_label() {
        let raw = "ISS: R$ 1,42\nTx. Judic.: R$ 8,83\nEMOL.: R$ 50,73";
        let labels: Vec<_> = extract_value_items(raw)
            .into_iter()
            .map(|item| item.label)
            .collect();
        assert_eq!(labels, vec!["ISS", "Tx. Judic", "Emol"]);
    }

    #[test]
    fn test_positions_strictly_increase() {
        let raw = "Total: R$ 10,00 Emol: R$ 5,00 Taxa: R$ 2,00 ISSQN: R$ 0,50 Total: R$ 17,50";
        let items = extract_value_items(raw);
        assert_eq!(items.len(), 5);
        assert!(items.windows(2).all(|w| w[0].position < w[1].position));
    }

    #[test]
    fn test_parsed_values() {
        let items = extract_value_items("Emol.: R$ 1.234,56.");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].amount, "1.234,56");
        assert_eq!(items[0].value, Some(Decimal::new(123456, 2)));
    }

    #[test]
    fn test_bare_amount_fallback() {
        let raw = "SELO\nR$ 50,73\nR$ 1.234,56\nfim";
        assert_eq!(extract_values(raw), "Valor: R$ 50,73 - Valor: R$ 1.234,56");
    }

    #[test]
    fn test_labelled_amounts_suppress_fallback() {
        let raw = "R$ 99,00 solto\nISS: R$ 1,42";
        assert_eq!(extract_values(raw), "ISS: R$ 1,42");
    }

    #[test]
    fn test_custom_separator() {
        let extractor = ValuesExtractor::new().with_separator(" | ");
        let items = extractor.items("Emol: R$ 5,00 ISS: R$ 0,10");
        assert_eq!(extractor.join(&items), "Emol: R$ 5,00 | ISS: R$ 0,10");
    }

    #[test]
    fn test_no_match() {
        assert_eq!(extract_values("lorem ipsum no relevant fields"), "");
        assert_eq!(extract_values("Total: R$ ."), "");
        assert!(extract_value_items("").is_empty());
    }
}
