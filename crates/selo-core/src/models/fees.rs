//! Fee table and monthly closing report models.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

/// Official fee table an act was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeeTable {
    /// Tabela 07 (multi-line entries).
    #[serde(rename = "Tabela 07")]
    Table07,
    /// Tabela 08 (pipe-separated rows).
    #[serde(rename = "Tabela 08")]
    Table08,
}

impl fmt::Display for FeeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table07 => write!(f, "Tabela 07"),
            Self::Table08 => write!(f, "Tabela 08"),
        }
    }
}

impl FromStr for FeeTable {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        match key.trim_start_matches("tabela").trim() {
            "07" | "7" => Ok(Self::Table07),
            "08" | "8" => Ok(Self::Table08),
            _ => Err(ExtractionError::UnknownTable(s.to_string())),
        }
    }
}

/// One notarial act with its fee breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeTableAct {
    /// Act description.
    pub description: String,

    /// Gross emolument.
    pub gross_emolument: Decimal,

    /// RECOMPE contribution.
    pub recompe: Decimal,

    /// Net emolument.
    pub net_emolument: Decimal,

    /// Municipal service tax.
    pub issqn: Decimal,

    /// Judiciary inspection fee.
    pub judicial_fee: Decimal,

    /// Final value charged.
    pub final_value: Decimal,

    /// Act code (e.g. `7802`).
    pub code: String,

    /// Source table.
    pub table: FeeTable,
}

/// Totals of a monthly closing report ("fechamento").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClosingReport {
    /// Sum of the act counters on the `Total` line.
    pub acts_performed: u32,

    /// Emolument assessed.
    pub emolument: Decimal,

    /// Judiciary inspection fee assessed.
    pub judicial_fee: Decimal,

    /// RECOMPE assessed.
    pub recompe_assessed: Decimal,

    /// RECOMPE received.
    pub recompe_received: Decimal,

    /// ISSQN received from users.
    pub issqn: Decimal,

    /// Total expenses of the month.
    pub total_expenses: Decimal,
}

/// Totals over the closing reports of several months or offices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClosingSummary {
    /// Number of reports summed.
    pub reports: usize,

    /// Acts performed across all reports.
    pub acts_performed: u32,

    /// Collected: emolument, RECOMPE received, judicial fee and ISSQN.
    pub collected: Decimal,

    /// Operating costs (total expenses).
    pub operating_costs: Decimal,

    /// Transfers owed: RECOMPE assessed, ISSQN and judicial fee.
    pub transfers: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_table_from_str() {
        assert_eq!(FeeTable::from_str("07").unwrap(), FeeTable::Table07);
        assert_eq!(FeeTable::from_str("Tabela 08").unwrap(), FeeTable::Table08);
        assert!(FeeTable::from_str("09").is_err());
    }

    #[test]
    fn test_fee_table_display() {
        assert_eq!(FeeTable::Table07.to_string(), "Tabela 07");
        let json = serde_json::to_string(&FeeTable::Table08).unwrap();
        assert_eq!(json, "\"Tabela 08\"");
    }
}
