//! OCR engine boundary.
//!
//! Recognition itself is delegated to an external engine; the seal extractor
//! only consumes the recognised text.

mod tesseract;

pub use tesseract::{parse_tsv, TesseractEngine};

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// Result of OCR processing on an image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrOutput {
    /// Recognised text, one OCR line per text line.
    pub text: String,

    /// Mean word confidence (0 - 100).
    pub confidence: f32,

    /// Number of recognised words.
    pub word_count: usize,
}

/// An OCR engine turning an image into text.
pub trait OcrEngine: Send + Sync {
    /// Engine name, used in logs.
    fn name(&self) -> &str;

    /// Recognise the text of one image.
    fn recognize(&self, path: &Path) -> Result<OcrOutput, OcrError>;
}
