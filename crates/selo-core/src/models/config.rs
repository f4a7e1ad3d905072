//! Configuration structures for the seal pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the selo pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeloConfig {
    /// External OCR engine configuration.
    pub ocr: OcrConfig,

    /// Seal field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Fee table configuration.
    pub fees: FeeConfig,
}

/// External OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Engine executable (looked up on `PATH` when not absolute).
    pub command: PathBuf,

    /// Recognition language.
    pub language: String,

    /// Page segmentation mode passed as `--psm`.
    pub page_seg_mode: u8,

    /// Characters the engine may emit (empty disables the whitelist).
    pub char_whitelist: String,

    /// Seconds to wait for the engine before giving up.
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            command: PathBuf::from("tesseract"),
            language: "por".to_string(),
            page_seg_mode: 3,
            char_whitelist: "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789\
                             áéíóúâêîôûãõçÁÉÍÓÚÂÊÎÔÛÃÕÇ:.,- ()$"
                .to_string(),
            timeout_secs: 60,
        }
    }
}

/// Seal field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Separator between labelled amounts in the `values` string.
    pub values_separator: String,

    /// Repair act codes that OCR glued onto the act count.
    pub repair_act_codes: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            values_separator: " - ".to_string(),
            repair_act_codes: true,
        }
    }
}

/// Act codes recognised in each official fee table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeConfig {
    /// Known Tabela 07 codes.
    pub table07_codes: Vec<String>,

    /// Known Tabela 08 codes.
    pub table08_codes: Vec<String>,
}

impl Default for FeeConfig {
    fn default() -> Self {
        let table07 = [
            "7101", "7201", "7302", "7402", "7501", "7502", "7701", "7802", "7803", "7804",
            "7901", "7100", "7110", "7120", "7130", "7140", "7150", "7180", "7190", "7927",
        ];
        Self {
            table07_codes: table07.iter().map(|c| c.to_string()).collect(),
            table08_codes: vec!["8101".to_string(), "8301".to_string(), "8310".to_string()],
        }
    }
}

impl SeloConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
