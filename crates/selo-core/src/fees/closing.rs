//! Monthly closing report ("fechamento") parsing.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::ExtractionError;
use crate::models::fees::{ClosingReport, ClosingSummary};
use crate::seal::rules::parse_brl_amount;

lazy_static! {
    static ref EMOLUMENT: Regex = Regex::new(
        r"(?i)Emolumento Apurado:\s*R\$\s*([\d.,]+)"
    ).unwrap();

    static ref JUDICIAL_FEE: Regex = Regex::new(
        r"(?i)Taxa de Fiscalização Judiciária Apurada:\s*R\$\s*([\d.,]+)"
    ).unwrap();

    static ref RECOMPE_ASSESSED: Regex = Regex::new(
        r"(?i)RECOMPE.*?Apurado:\s*R\$\s*([\d.,]+)"
    ).unwrap();

    static ref RECOMPE_RECEIVED: Regex = Regex::new(
        r"(?i)Valores recebidos do RECOMPE:\s*R\$\s*([\d.,]+)"
    ).unwrap();

    static ref ISSQN: Regex = Regex::new(
        r"(?i)ISSQN recebido dos usuários:\s*R\$\s*([\d.,]+)"
    ).unwrap();

    static ref TOTAL_EXPENSES: Regex = Regex::new(
        r"(?i)Total de despesas do mês:\s*R\$\s*([\d.,]+)"
    ).unwrap();

    // Act counters per book on the "Total" row
    static ref ACT_TOTALS: Regex = Regex::new(
        r"(?i)Total\s+(\d+)\s+(\d+)\s+(\d+)\s+(\d+)"
    ).unwrap();
}

/// Parse the totals of a monthly closing report.
///
/// Missing labels count as zero; a text without any recognised label is
/// rejected with [`ExtractionError::NoData`].
pub fn parse_closing_report(text: &str) -> Result<ClosingReport, ExtractionError> {
    let mut found = 0usize;
    let mut amount = |pattern: &Regex| -> Decimal {
        match pattern.captures(text).and_then(|caps| parse_brl_amount(&caps[1])) {
            Some(value) => {
                found += 1;
                value
            }
            None => Decimal::ZERO,
        }
    };

    let emolument = amount(&EMOLUMENT);
    let judicial_fee = amount(&JUDICIAL_FEE);
    let recompe_assessed = amount(&RECOMPE_ASSESSED);
    let recompe_received = amount(&RECOMPE_RECEIVED);
    let issqn = amount(&ISSQN);
    let total_expenses = amount(&TOTAL_EXPENSES);

    let acts_performed = match ACT_TOTALS.captures(text) {
        Some(caps) => {
            found += 1;
            caps.iter()
                .skip(1)
                .flatten()
                .map(|m| m.as_str().parse::<u32>().unwrap_or(0))
                .fold(0u32, u32::saturating_add)
        }
        None => 0,
    };

    if found == 0 {
        return Err(ExtractionError::NoData);
    }

    debug!("Closing report: {} labelled values, {} acts", found, acts_performed);

    Ok(ClosingReport {
        acts_performed,
        emolument,
        judicial_fee,
        recompe_assessed,
        recompe_received,
        issqn,
        total_expenses,
    })
}

/// Sum several closing reports into collection, cost and transfer totals.
pub fn summarize_closing_reports(reports: &[ClosingReport]) -> ClosingSummary {
    reports.iter().fold(
        ClosingSummary {
            reports: reports.len(),
            ..ClosingSummary::default()
        },
        |mut summary, r| {
            summary.acts_performed = summary.acts_performed.saturating_add(r.acts_performed);
            summary.collected += r.emolument + r.recompe_received + r.judicial_fee + r.issqn;
            summary.operating_costs += r.total_expenses;
            summary.transfers += r.recompe_assessed + r.issqn + r.judicial_fee;
            summary
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    const REPORT: &str = "\
FECHAMENTO MENSAL - SERVENTIA EXTRAJUDICIAL
Livro      Notas  Procurações  Escrituras  Outros
Total      120    35           12          3
Emolumento Apurado: R$ 12.345,67
Taxa de Fiscalização Judiciária Apurada: R$ 617,28
Valor do RECOMPE Apurado: R$ 370,37
ISSQN recebido dos usuários: R$ 246,91
Total de despesas do mês: R$ 8.100,00
Valores recebidos do RECOMPE: R$ 1.200,00
";

    #[test]
    fn test_parse_closing_report() {
        let report = parse_closing_report(REPORT).unwrap();

        assert_eq!(
            report,
            ClosingReport {
                acts_performed: 170,
                emolument: dec("12345.67"),
                judicial_fee: dec("617.28"),
                recompe_assessed: dec("370.37"),
                recompe_received: dec("1200.00"),
                issqn: dec("246.91"),
                total_expenses: dec("8100.00"),
            }
        );
    }

    #[test]
    fn test_missing_values_are_zero() {
        let report = parse_closing_report("Emolumento Apurado: R$ 10,00").unwrap();

        assert_eq!(report.emolument, dec("10.00"));
        assert_eq!(report.acts_performed, 0);
        assert!(report.issqn.is_zero());
    }

    #[test]
    fn test_no_data() {
        assert!(matches!(
            parse_closing_report("lorem ipsum"),
            Err(ExtractionError::NoData)
        ));
    }

    #[test]
    fn test_summarize_reports() {
        let first = parse_closing_report(REPORT).unwrap();
        let second = parse_closing_report(
            "Total 1 2 3 4\nEmolumento Apurado: R$ 100,00\nTotal de despesas do mês: R$ 50,00",
        )
        .unwrap();

        let summary = summarize_closing_reports(&[first, second]);

        assert_eq!(
            summary,
            ClosingSummary {
                reports: 2,
                acts_performed: 180,
                // 12.345,67 + 1.200,00 + 617,28 + 246,91 + 100,00
                collected: dec("14509.86"),
                operating_costs: dec("8150.00"),
                // 370,37 + 246,91 + 617,28
                transfers: dec("1234.56"),
            }
        );
    }

    #[test]
    fn test_summarize_nothing() {
        assert_eq!(summarize_closing_reports(&[]), ClosingSummary::default());
    }
}
