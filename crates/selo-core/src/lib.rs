//! Core library for notarial seal ("selo") OCR processing.
//!
//! This crate provides:
//! - Seal field extraction from noisy OCR text (consultation code, security
//!   code, act count, performer, monetary values)
//! - An OCR engine boundary with a Tesseract implementation
//! - Fee table (Tabela 07 / 08) and monthly closing report parsing
//! - Configuration and data models

pub mod error;
pub mod fees;
pub mod models;
pub mod ocr;
pub mod seal;

pub use error::{ExtractionError, OcrError, Result, SeloError};
pub use fees::{parse_closing_report, parse_fee_table, summarize_closing_reports};
pub use models::config::SeloConfig;
pub use models::fees::{ClosingReport, ClosingSummary, FeeTable, FeeTableAct};
pub use models::seal::{ActCount, ExtractedSealData, LabeledAmount};
pub use ocr::{OcrEngine, OcrOutput, TesseractEngine};
pub use seal::rules::{format_brl_amount, normalize, parse_brl_amount};
pub use seal::{
    extract_seal_data, extract_seal_from_image, SealExtraction, SealExtractor,
    SealFieldExtractor, SealParser,
};
