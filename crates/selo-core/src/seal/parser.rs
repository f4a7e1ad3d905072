//! Seal parser combining the field extractors.

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::seal::ExtractedSealData;
use crate::ocr::OcrOutput;

use super::rules::{
    values::DEFAULT_SEPARATOR, ActCountExtractor, ConsultationCodeExtractor, FieldExtractor,
    PerformerExtractor, SealText, SecurityCodeExtractor, ValuesExtractor,
};
use super::SealExtractor;

/// Result of seal extraction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SealExtraction {
    /// Extracted seal data.
    pub seal: ExtractedSealData,
    /// Fields that could not be recognised.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for seal parsing.
pub trait SealParser {
    /// Parse seal fields from OCR text.
    fn parse(&self, text: &str) -> SealExtraction;
}

/// Rule-based seal field extractor.
///
/// Runs the five field extractors over one OCR text and assembles the record.
/// It holds only options, so a single instance can be shared between threads.
#[derive(Debug, Clone)]
pub struct SealFieldExtractor {
    /// Separator between serialized amounts.
    values_separator: String,
    /// Whether glued act codes are repaired.
    repair_act_codes: bool,
}

impl SealFieldExtractor {
    /// Create a new extractor with default settings.
    pub fn new() -> Self {
        Self {
            values_separator: DEFAULT_SEPARATOR.to_string(),
            repair_act_codes: true,
        }
    }

    /// Build an extractor from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new()
            .with_values_separator(config.values_separator.clone())
            .with_act_code_repair(config.repair_act_codes)
    }

    /// Set the separator used in the `values` string.
    pub fn with_values_separator(mut self, separator: impl Into<String>) -> Self {
        self.values_separator = separator.into();
        self
    }

    /// Set act code repair.
    pub fn with_act_code_repair(mut self, repair: bool) -> Self {
        self.repair_act_codes = repair;
        self
    }

    fn extract_fields(&self, raw: &str) -> ExtractedSealData {
        let text = SealText::new(raw);

        let consultation_code = ConsultationCodeExtractor::new().extract(&text);
        let security_code = SecurityCodeExtractor::new().extract(&text);
        let act_count = ActCountExtractor::new()
            .with_repair(self.repair_act_codes)
            .extract(&text);
        let performed_by = PerformerExtractor::new().extract(&text);

        for (field, matched) in [
            ("consultation_code", consultation_code.as_ref().map(|m| (m.rule, m.confidence))),
            ("security_code", security_code.as_ref().map(|m| (m.rule, m.confidence))),
            ("act_count", act_count.as_ref().map(|m| (m.rule, m.confidence))),
            ("performed_by", performed_by.as_ref().map(|m| (m.rule, m.confidence))),
        ] {
            if let Some((rule, confidence)) = matched {
                debug!(
                    "Field {} matched by rule '{}' (confidence {:.2})",
                    field, rule, confidence
                );
            }
        }

        let values = ValuesExtractor::new().with_separator(self.values_separator.as_str());
        let value_items = values.items(raw);

        ExtractedSealData {
            consultation_code: consultation_code.map(|m| m.value).unwrap_or_default(),
            security_code: security_code.map(|m| m.value).unwrap_or_default(),
            act_count: act_count.map(|m| m.value.to_string()).unwrap_or_default(),
            performed_by: performed_by.map(|m| m.value).unwrap_or_default(),
            values: values.join(&value_items),
            value_items,
            full_text: raw.to_string(),
        }
    }
}

impl Default for SealFieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Milliseconds since the call; `Instant` is unavailable in the browser.
#[cfg(not(target_arch = "wasm32"))]
fn stopwatch() -> impl Fn() -> u64 {
    let start = Instant::now();
    move || start.elapsed().as_millis() as u64
}

#[cfg(target_arch = "wasm32")]
fn stopwatch() -> impl Fn() -> u64 {
    || 0
}

impl SealParser for SealFieldExtractor {
    fn parse(&self, text: &str) -> SealExtraction {
        let elapsed_ms = stopwatch();

        info!("Parsing seal from {} characters of text", text.len());

        let seal = self.extract_fields(text);
        let warnings: Vec<String> = seal
            .missing_fields()
            .into_iter()
            .map(|field| format!("Could not extract {}", field.replace('_', " ")))
            .collect();

        debug!(
            "Extracted seal {:?} with {} missing fields",
            seal.consultation_code,
            warnings.len()
        );

        SealExtraction {
            seal,
            warnings,
            processing_time_ms: elapsed_ms(),
        }
    }
}

impl SealExtractor for SealFieldExtractor {
    fn extract(&self, ocr_output: &OcrOutput) -> ExtractedSealData {
        debug!(
            "Extracting seal from OCR output ({} words, confidence {:.1})",
            ocr_output.word_count, ocr_output.confidence
        );
        self.parse(&ocr_output.text).seal
    }

    fn extract_from_text(&self, text: &str) -> ExtractedSealData {
        self.parse(text).seal
    }
}
