//! Fees command - parse the acts of an official fee table.

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use selo_core::{format_brl_amount, parse_fee_table, FeeTable, FeeTableAct};

use super::{load_config, read_input, write_output, OutputFormat};

/// Arguments for the fees command.
#[derive(Args)]
pub struct FeesArgs {
    /// Text extracted from the fee table
    #[arg(required = true)]
    input: PathBuf,

    /// Fee table ("07" or "08")
    #[arg(short, long)]
    table: FeeTable,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub async fn run(args: FeesArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let text = read_input(&args.input)?;

    let acts = parse_fee_table(&text, args.table, &config.fees);
    if acts.is_empty() {
        anyhow::bail!("No known acts found in {}", args.table);
    }

    info!("Parsed {} acts from {}", acts.len(), args.table);
    if args.output.is_some() {
        println!("{} Found {} acts", style("ℹ").blue(), acts.len());
    }

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&acts)?,
        OutputFormat::Csv => format_csv(&acts)?,
        OutputFormat::Text => format_text(&acts),
    };

    write_output(&output, args.output.as_deref())
}

fn format_csv(acts: &[FeeTableAct]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for act in acts {
        wtr.serialize(act)?;
    }
    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(acts: &[FeeTableAct]) -> String {
    let mut output = String::new();

    for act in acts {
        output.push_str(&format!("[{}] {}\n", act.code, act.description));
        output.push_str(&format!(
            "  Emol. bruto: R$ {}  RECOMPE: R$ {}  Emol. líquido: R$ {}\n",
            format_brl_amount(act.gross_emolument),
            format_brl_amount(act.recompe),
            format_brl_amount(act.net_emolument)
        ));
        output.push_str(&format!(
            "  ISSQN: R$ {}  TFJ: R$ {}  Final: R$ {}\n",
            format_brl_amount(act.issqn),
            format_brl_amount(act.judicial_fee),
            format_brl_amount(act.final_value)
        ));
    }

    output
}
