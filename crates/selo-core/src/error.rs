//! Error types for the selo-core library.
//!
//! Field extraction itself never fails: a field that no pattern recognises is
//! left empty. These errors cover the collaborators around it (the OCR engine,
//! configuration files) and the stricter fee-table parsers.

use thiserror::Error;

/// Main error type for the selo library.
#[derive(Error, Debug)]
pub enum SeloError {
    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Fee table or report extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the external OCR engine.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The engine executable could not be started.
    #[error("failed to start OCR engine `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The engine ran but exited unsuccessfully.
    #[error("OCR engine exited with status {status}: {stderr}")]
    Failed { status: i32, stderr: String },

    /// The engine output could not be interpreted.
    #[error("unreadable OCR output: {0}")]
    Output(String),

    /// The input image does not exist or cannot be read.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// The engine did not finish in time.
    #[error("OCR timed out after {0}s")]
    Timeout(u64),
}

/// Errors related to fee table and closing report extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Unknown fee table identifier.
    #[error("unknown fee table: {0}")]
    UnknownTable(String),

    /// Failed to parse a value.
    #[error("failed to parse {field}: {value}")]
    Parse { field: String, value: String },

    /// Nothing recognisable was found in the input.
    #[error("no data found")]
    NoData,
}

/// Result type for the selo library.
pub type Result<T> = std::result::Result<T, SeloError>;
