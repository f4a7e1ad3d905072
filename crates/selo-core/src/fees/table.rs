//! Fee table ("Tabela 07" / "Tabela 08") parsing.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::ExtractionError;
use crate::models::config::FeeConfig;
use crate::models::fees::{FeeTable, FeeTableAct};
use crate::seal::rules::{parse_brl_amount, patterns::WHITESPACE_RUN};

/// Lines of Tabela 07 that never belong to an act.
const TABLE07_IGNORED: &[&str] = &[
    "Tabela",
    "Certidões",
    "Revogado",
    "VETADO",
    "---",
    "Obs.",
    "Nota",
    "Item vetado",
    "Expedição",
    "Apostilamento",
];

/// Lines of Tabela 08 that never belong to an act.
const TABLE08_IGNORED: &[&str] = &["VETADO", "Nota", "Notas", "Tabela", "---"];

/// Description, six monetary figures, act code.
const FEE_COLUMNS: usize = 6;

lazy_static! {
    static ref ACT_START: Regex = Regex::new(r"^\d+(\.\d+)?\s*-\s*").unwrap();

    static ref TABLE07_ROW: Regex = Regex::new(
        r"^(.*?)((?:R?\$?\s*[\d.,]+\s+){6})(\d+)$"
    ).unwrap();

    static ref FEE_FIGURE: Regex = Regex::new(r"R?\$?\s*([\d.,]+)").unwrap();
}

/// Parse the acts of a fee table, keeping only known act codes.
pub fn parse_fee_table(text: &str, table: FeeTable, config: &FeeConfig) -> Vec<FeeTableAct> {
    match table {
        FeeTable::Table07 => parse_table07(text, &config.table07_codes),
        FeeTable::Table08 => parse_table08(text, &config.table08_codes),
    }
}

/// Parse Tabela 07, where one act spans several lines.
///
/// An act starts on a line numbered like `7.1 - ` and continues until the next
/// such line.
pub fn parse_table07(text: &str, known_codes: &[String]) -> Vec<FeeTableAct> {
    let known: HashSet<&str> = known_codes.iter().map(String::as_str).collect();
    let mut entries: Vec<String> = Vec::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if TABLE07_IGNORED.iter().any(|word| line.contains(word)) {
            continue;
        }

        match entries.last_mut() {
            Some(entry) if !ACT_START.is_match(line) => {
                entry.push(' ');
                entry.push_str(line);
            }
            _ => entries.push(line.to_string()),
        }
    }

    let acts: Vec<FeeTableAct> = entries
        .iter()
        .filter_map(|entry| match parse_table07_entry(entry) {
            Ok(act) => Some(act),
            Err(e) => {
                warn!("Skipping Tabela 07 entry: {}", e);
                None
            }
        })
        .filter(|act| known.contains(act.code.as_str()))
        .collect();

    debug!("Parsed {} acts from {} Tabela 07 entries", acts.len(), entries.len());
    acts
}

fn parse_table07_entry(entry: &str) -> Result<FeeTableAct, ExtractionError> {
    let flattened = entry.replace('|', " ");
    let flattened = WHITESPACE_RUN.replace_all(&flattened, " ");
    let flattened = flattened.trim();

    let caps = TABLE07_ROW.captures(flattened).ok_or_else(|| ExtractionError::Parse {
        field: "Tabela 07 entry".to_string(),
        value: flattened.chars().take(100).collect(),
    })?;

    let figures: Vec<&str> = FEE_FIGURE
        .captures_iter(&caps[2])
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();

    build_act(&caps[1], &figures, &caps[3], FeeTable::Table07)
}

/// Parse Tabela 08, where every act is one pipe-separated row.
pub fn parse_table08(text: &str, known_codes: &[String]) -> Vec<FeeTableAct> {
    let known: HashSet<&str> = known_codes.iter().map(String::as_str).collect();
    let mut acts = Vec::new();

    for line in text.lines().map(str::trim) {
        if !line.contains('|') || TABLE08_IGNORED.iter().any(|word| line.contains(word)) {
            continue;
        }

        let cells: Vec<&str> = line
            .split('|')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect();

        if cells.len() < FEE_COLUMNS + 2 || !known.contains(cells[FEE_COLUMNS + 1]) {
            continue;
        }

        match build_act(cells[0], &cells[1..=FEE_COLUMNS], cells[FEE_COLUMNS + 1], FeeTable::Table08) {
            Ok(act) => acts.push(act),
            Err(e) => warn!("Skipping Tabela 08 row: {}", e),
        }
    }

    debug!("Parsed {} acts from Tabela 08", acts.len());
    acts
}

fn build_act(
    description: &str,
    figures: &[&str],
    code: &str,
    table: FeeTable,
) -> Result<FeeTableAct, ExtractionError> {
    if figures.len() < FEE_COLUMNS {
        return Err(ExtractionError::Parse {
            field: format!("{} figures", table),
            value: figures.join(" "),
        });
    }

    let amount = |i: usize| -> Result<Decimal, ExtractionError> {
        parse_brl_amount(figures[i]).ok_or_else(|| ExtractionError::Parse {
            field: format!("{} amount", table),
            value: figures[i].to_string(),
        })
    };

    Ok(FeeTableAct {
        description: description.trim().to_string(),
        gross_emolument: amount(0)?,
        recompe: amount(1)?,
        net_emolument: amount(2)?,
        issqn: amount(3)?,
        judicial_fee: amount(4)?,
        final_value: amount(5)?,
        code: code.to_string(),
        table,
    })
}
