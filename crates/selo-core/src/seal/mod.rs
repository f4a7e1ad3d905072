//! Seal field extraction module.

mod parser;
pub mod rules;

pub use parser::{SealExtraction, SealFieldExtractor, SealParser};

use std::path::Path;

use tracing::warn;

use crate::models::seal::ExtractedSealData;
use crate::ocr::{OcrEngine, OcrOutput};

/// Trait for seal field extractors.
///
/// Extraction is total: unrecognised fields are empty strings.
pub trait SealExtractor {
    /// Extract seal data from OCR output.
    fn extract(&self, ocr_output: &OcrOutput) -> ExtractedSealData;

    /// Extract seal data from plain text.
    fn extract_from_text(&self, text: &str) -> ExtractedSealData;
}

/// Extract seal data from raw OCR text with default settings.
pub fn extract_seal_data(raw: &str) -> ExtractedSealData {
    SealFieldExtractor::new().extract_from_text(raw)
}

/// Recognise an image and extract its seal fields.
///
/// OCR failures are logged and yield a record with every field empty.
pub fn extract_seal_from_image<E, X>(engine: &E, extractor: &X, path: &Path) -> ExtractedSealData
where
    E: OcrEngine + ?Sized,
    X: SealExtractor + ?Sized,
{
    match engine.recognize(path) {
        Ok(output) => extractor.extract(&output),
        Err(e) => {
            warn!(
                "OCR with {} failed for {}: {}",
                engine.name(),
                path.display(),
                e
            );
            ExtractedSealData::empty()
        }
    }
}
