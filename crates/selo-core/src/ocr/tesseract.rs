//! Tesseract OCR engine.
//!
//! Runs the `tesseract` executable with TSV output so that word confidences
//! are available alongside the text.

use std::collections::BTreeMap;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::{OcrEngine, OcrOutput};

/// TSV level of word rows.
const WORD_LEVEL: &str = "5";

/// Interval between checks on a running engine.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Tesseract OCR engine.
pub struct TesseractEngine {
    config: OcrConfig,
}

impl TesseractEngine {
    /// Create a new engine with custom configuration.
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    /// Arguments passed to the executable for `image_path`.
    fn args(&self, image_path: &Path) -> Vec<String> {
        let mut args = vec![
            image_path.display().to_string(),
            "stdout".to_string(),
            "-l".to_string(),
            self.config.language.clone(),
            "--psm".to_string(),
            self.config.page_seg_mode.to_string(),
        ];
        if !self.config.char_whitelist.is_empty() {
            args.push("-c".to_string());
            args.push(format!("tessedit_char_whitelist={}", self.config.char_whitelist));
        }
        args.push("tsv".to_string());
        args
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new(OcrConfig::default())
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize(&self, path: &Path) -> Result<OcrOutput, OcrError> {
        if !path.is_file() {
            return Err(OcrError::InvalidImage(path.display().to_string()));
        }

        let start = Instant::now();
        let command = self.config.command.display().to_string();

        let mut child = Command::new(&self.config.command)
            .args(self.args(path))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| OcrError::Spawn {
                command: if source.kind() == ErrorKind::NotFound {
                    format!("{} (install tesseract-ocr)", command)
                } else {
                    command.clone()
                },
                source,
            })?;

        // Drain both pipes while waiting so a chatty engine cannot block on them.
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let deadline = Duration::from_secs(self.config.timeout_secs);
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if start.elapsed() >= deadline => {
                    warn!("Killing {} after {}s", command, self.config.timeout_secs);
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(OcrError::Timeout(self.config.timeout_secs));
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    let _ = child.kill();
                    return Err(OcrError::Output(e.to_string()));
                }
            }
        };

        let stdout = join_output(stdout);
        let stderr = join_output(stderr);

        if !status.success() {
            return Err(OcrError::Failed {
                status: status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            });
        }

        let result = parse_tsv(&String::from_utf8_lossy(&stdout))?;
        debug!(
            "tesseract recognised {} words in {}ms",
            result.word_count,
            start.elapsed().as_millis()
        );

        Ok(result)
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

fn join_output(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}

/// Rebuild text and statistics from Tesseract TSV output.
///
/// Word rows are grouped into lines by their page, block, paragraph and line
/// numbers. Confidence is the mean over words with a non-negative score.
pub fn parse_tsv(tsv: &str) -> Result<OcrOutput, OcrError> {
    let mut rows = tsv.lines();
    match rows.next() {
        Some(header) if header.starts_with("level") => {}
        _ => return Err(OcrError::Output("missing TSV header".to_string())),
    }

    let mut lines: BTreeMap<[u32; 4], Vec<&str>> = BTreeMap::new();
    let mut confidence_sum = 0.0f32;
    let mut scored_words = 0usize;
    let mut word_count = 0usize;

    for row in rows.filter(|r| !r.trim().is_empty()) {
        let cells: Vec<&str> = row.splitn(12, '\t').collect();
        if cells.len() < 12 {
            return Err(OcrError::Output(format!("malformed TSV row: {}", row)));
        }
        if cells[0] != WORD_LEVEL {
            continue;
        }

        let word = cells[11].trim();
        if word.is_empty() {
            continue;
        }

        let mut key = [0u32; 4];
        for (slot, cell) in key.iter_mut().zip(&cells[1..5]) {
            *slot = cell
                .parse()
                .map_err(|_| OcrError::Output(format!("bad line index: {}", cell)))?;
        }

        let conf: f32 = cells[10]
            .parse()
            .map_err(|_| OcrError::Output(format!("bad confidence: {}", cells[10])))?;
        if conf >= 0.0 {
            confidence_sum += conf;
            scored_words += 1;
        }

        word_count += 1;
        lines.entry(key).or_default().push(word);
    }

    let text = lines
        .values()
        .map(|words| words.join(" "))
        .collect::<Vec<_>>()
        .join("\n");

    let confidence = if scored_words > 0 {
        confidence_sum / scored_words as f32
    } else {
        0.0
    };

    Ok(OcrOutput {
        text,
        confidence,
        word_count,
    })
}
