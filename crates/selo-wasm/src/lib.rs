//! WASM bindings for notarial seal field extraction.
//!
//! Recognition happens in the browser (e.g. tesseract.js); these bindings
//! turn the recognised text into structured seal data.

use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

use selo_core::models::config::FeeConfig;
use selo_core::seal::SealExtractor as _;
use selo_core::{FeeTable, SealFieldExtractor, SealParser};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Extract seal data from OCR text with default settings.
#[wasm_bindgen]
pub fn extract_seal_from_text(text: &str) -> Result<JsValue, JsValue> {
    to_js(&SealFieldExtractor::new().extract_from_text(text))
}

/// Normalize OCR text the way the extractors see it.
#[wasm_bindgen]
pub fn normalize_text(text: &str) -> String {
    selo_core::normalize(text)
}

/// Parse a Brazilian-formatted amount (e.g., "1.234,56").
#[wasm_bindgen]
pub fn parse_brl_amount(amount: &str) -> Option<f64> {
    selo_core::parse_brl_amount(amount).and_then(|d| d.to_string().parse().ok())
}

/// Format an amount in Brazilian style (e.g., "1.234,56").
#[wasm_bindgen]
pub fn format_brl_amount(amount: f64) -> Result<String, JsValue> {
    let amount = Decimal::try_from(amount).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(selo_core::format_brl_amount(amount))
}

/// Parse the acts of fee table "07" or "08" with the built-in act codes.
#[wasm_bindgen]
pub fn parse_fee_table(text: &str, table: &str) -> Result<JsValue, JsValue> {
    let table: FeeTable = table.parse().map_err(|e: selo_core::ExtractionError| {
        JsValue::from_str(&e.to_string())
    })?;
    to_js(&selo_core::parse_fee_table(text, table, &FeeConfig::default()))
}

/// Seal extractor class for browser use.
#[wasm_bindgen]
pub struct SealExtractor {
    parser: SealFieldExtractor,
}

#[wasm_bindgen]
impl SealExtractor {
    /// Create a new seal extractor.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            parser: SealFieldExtractor::new(),
        }
    }

    /// Configure the separator of the `values` string.
    #[wasm_bindgen]
    pub fn set_values_separator(&mut self, separator: &str) {
        self.parser = self.parser.clone().with_values_separator(separator);
    }

    /// Configure act code repair.
    #[wasm_bindgen]
    pub fn set_repair_act_codes(&mut self, repair: bool) {
        self.parser = self.parser.clone().with_act_code_repair(repair);
    }

    /// Extract seal data from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.parser.extract_from_text(text))
    }

    /// Extract seal data together with warnings for missing fields.
    #[wasm_bindgen]
    pub fn extract_with_warnings(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.parser.parse(text))
    }
}

impl Default for SealExtractor {
    fn default() -> Self {
        Self::new()
    }
}
