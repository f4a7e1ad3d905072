//! Seal ("selo") data models.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Structured fields recovered from the OCR text of one notarial seal.
///
/// Every field is best-effort: an unrecognised field is an empty string, never
/// an error. The JSON shape (camelCase keys, `actCount` as a string) is the one
/// stored by the persistence layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedSealData {
    /// Consultation code ("selo de consulta").
    pub consultation_code: String,

    /// Security code, usually `####.####.####.####`.
    pub security_code: String,

    /// Number of acts, possibly with embedded act codes (`"1(7901)"`).
    pub act_count: String,

    /// Name of the clerk who performed the acts.
    pub performed_by: String,

    /// Labelled amounts serialized as `"Emol: R$ 50,73 - ISS: R$ 1,42"`.
    pub values: String,

    /// Labelled amounts in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value_items: Vec<LabeledAmount>,

    /// The raw OCR text, kept for audit.
    pub full_text: String,
}

impl ExtractedSealData {
    /// Record with every field empty, used when OCR itself failed.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check whether no field was recognised.
    pub fn is_blank(&self) -> bool {
        self.consultation_code.is_empty()
            && self.security_code.is_empty()
            && self.act_count.is_empty()
            && self.performed_by.is_empty()
            && self.values.is_empty()
    }

    /// Names of the fields that were left empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.consultation_code.is_empty() {
            missing.push("consultation_code");
        }
        if self.security_code.is_empty() {
            missing.push("security_code");
        }
        if self.act_count.is_empty() {
            missing.push("act_count");
        }
        if self.performed_by.is_empty() {
            missing.push("performed_by");
        }
        if self.values.is_empty() {
            missing.push("values");
        }
        missing
    }
}

/// Act count with the act codes OCR tends to glue onto it.
///
/// Displays as `N`, `N(code)` or `N(code), extra)`, which is the exact string
/// shape downstream billing expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActCount {
    /// Number of acts (1-999).
    pub base: u16,

    /// Four-digit act code shown in parentheses after the count.
    pub embedded_code: Option<String>,

    /// Trailing code group that followed a repaired fragment.
    pub extra_code: Option<String>,
}

impl ActCount {
    /// Plain count without codes.
    pub fn new(base: u16) -> Self {
        Self {
            base,
            embedded_code: None,
            extra_code: None,
        }
    }

    /// Attach the embedded act code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.embedded_code = Some(code.into());
        self
    }

    /// Attach a trailing code group.
    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra_code = Some(extra.into());
        self
    }
}

impl fmt::Display for ActCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        if let Some(code) = &self.embedded_code {
            write!(f, "({})", code)?;
            if let Some(extra) = &self.extra_code {
                write!(f, ", {})", extra)?;
            }
        }
        Ok(())
    }
}

/// A monetary figure found on the seal together with its label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledAmount {
    /// Label as printed on the seal (`Emol`, `Total`, `ISS`, ...).
    pub label: String,

    /// Amount exactly as recognised (`"50,73"`).
    pub amount: String,

    /// Parsed amount, when the figure is well formed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Decimal>,

    /// Byte offset of the match in the raw text.
    pub position: usize,
}

impl fmt::Display for LabeledAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: R$ {}", self.label, self.amount)
    }
}
