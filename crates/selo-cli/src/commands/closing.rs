//! Closing command - parse monthly closing reports.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::Serialize;

use selo_core::{
    format_brl_amount, parse_closing_report, summarize_closing_reports, ClosingReport,
    ClosingSummary,
};

use super::{read_input, write_output, OutputFormat};

/// Arguments for the closing command.
#[derive(Args)]
pub struct ClosingArgs {
    /// Text extracted from one or more closing reports
    #[arg(required = true, num_args = 1..)]
    inputs: Vec<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Serialize)]
struct FileReport {
    file: String,
    #[serde(flatten)]
    report: ClosingReport,
}

#[derive(Serialize)]
struct ClosingOutput {
    reports: Vec<FileReport>,
    totals: ClosingSummary,
}

pub async fn run(args: ClosingArgs) -> anyhow::Result<()> {
    let mut reports = Vec::with_capacity(args.inputs.len());
    for input in &args.inputs {
        let text = read_input(input)?;
        let report = parse_closing_report(&text)
            .with_context(|| format!("Failed to parse {}", input.display()))?;
        reports.push(FileReport {
            file: input.display().to_string(),
            report,
        });
    }

    let output = match reports.as_slice() {
        [single] => format_report(&single.report, args.format)?,
        _ => {
            let totals = summarize_closing_reports(
                &reports.iter().map(|r| r.report.clone()).collect::<Vec<_>>(),
            );
            format_summary(ClosingOutput { reports, totals }, args.format)?
        }
    };

    write_output(&output, args.output.as_deref())
}

fn format_report(report: &ClosingReport, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.serialize(report)?;
            String::from_utf8(wtr.into_inner()?)?
        }
        OutputFormat::Text => format_text(report),
    })
}

/// Several reports: JSON carries each report and the totals, CSV the totals
/// row only.
fn format_summary(output: ClosingOutput, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(&output)?,
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.serialize(&output.totals)?;
            String::from_utf8(wtr.into_inner()?)?
        }
        OutputFormat::Text => {
            let mut sections: Vec<String> = output
                .reports
                .iter()
                .map(|r| format!("{}\n{}", r.file, format_text(&r.report)))
                .collect();
            sections.push(format_totals(&output.totals));
            sections.join("\n\n")
        }
    })
}

fn format_text(report: &ClosingReport) -> String {
    [
        format!("Atos praticados:          {}", report.acts_performed),
        format!("Emolumento apurado:       R$ {}", format_brl_amount(report.emolument)),
        format!("TFJ apurada:              R$ {}", format_brl_amount(report.judicial_fee)),
        format!("RECOMPE apurado:          R$ {}", format_brl_amount(report.recompe_assessed)),
        format!("RECOMPE recebido:         R$ {}", format_brl_amount(report.recompe_received)),
        format!("ISSQN:                    R$ {}", format_brl_amount(report.issqn)),
        format!("Total de despesas:        R$ {}", format_brl_amount(report.total_expenses)),
    ]
    .join("\n")
}

fn format_totals(totals: &ClosingSummary) -> String {
    [
        format!("Totais ({} relatórios)", totals.reports),
        format!("Atos praticados:          {}", totals.acts_performed),
        format!("Arrecadação:              R$ {}", format_brl_amount(totals.collected)),
        format!("Custeio:                  R$ {}", format_brl_amount(totals.operating_costs)),
        format!("Repasses:                 R$ {}", format_brl_amount(totals.transfers)),
    ]
    .join("\n")
}
