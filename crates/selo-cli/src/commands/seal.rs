//! Seal command - extract fields from a single seal.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use selo_core::models::config::SeloConfig;
use selo_core::{
    extract_seal_from_image, ExtractedSealData, SealFieldExtractor, SealParser, TesseractEngine,
};

use super::{load_config, read_input, write_output, OutputFormat};

/// Image formats handed to the OCR engine.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp", "gif", "webp"];

/// Arguments for the seal command.
#[derive(Args)]
pub struct SealArgs {
    /// Input file (OCR text or seal image)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Treat the input as recognised text whatever its extension
    #[arg(long)]
    text: bool,

    /// List the fields that could not be extracted
    #[arg(long)]
    show_warnings: bool,
}

pub async fn run(args: SealArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message("Extracting seal fields...");

    let seal = extract_file(&args.input, &config, args.text).await?;

    pb.finish_and_clear();

    if args.show_warnings {
        for field in seal.missing_fields() {
            eprintln!("{} Could not extract {}", style("⚠").yellow(), field);
        }
    }

    let output = format_seal(&seal, args.format)?;
    write_output(&output, args.output.as_deref())?;

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Extract the seal fields of one input file.
///
/// Text files are parsed directly. Images go through the configured OCR
/// engine; an engine failure or timeout yields an empty record.
pub async fn extract_file(
    path: &Path,
    config: &SeloConfig,
    force_text: bool,
) -> anyhow::Result<ExtractedSealData> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let extractor = SealFieldExtractor::from_config(&config.extraction);

    if force_text || extension == "txt" {
        let text = read_input(path)?;
        let result = extractor.parse(&text);
        debug!(
            "Parsed {} in {}ms with {} warnings",
            path.display(),
            result.processing_time_ms,
            result.warnings.len()
        );
        return Ok(result.seal);
    }

    if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        anyhow::bail!("Unsupported file format: {}", extension);
    }

    // The engine enforces `ocr.timeout_secs` itself and kills the process.
    let engine = TesseractEngine::new(config.ocr.clone());
    let image = path.to_path_buf();

    let seal = tokio::task::spawn_blocking(move || {
        extract_seal_from_image(&engine, &extractor, &image)
    })
    .await?;

    if seal.is_blank() {
        warn!("No seal fields recognised in {}", path.display());
    }

    Ok(seal)
}

pub fn format_seal(seal: &ExtractedSealData, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(seal)?),
        OutputFormat::Csv => format_csv(seal),
        OutputFormat::Text => Ok(format_text(seal)),
    }
}

fn format_csv(seal: &ExtractedSealData) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "consultation_code",
        "security_code",
        "act_count",
        "performed_by",
        "values",
    ])?;

    wtr.write_record([
        &seal.consultation_code,
        &seal.security_code,
        &seal.act_count,
        &seal.performed_by,
        &seal.values,
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(seal: &ExtractedSealData) -> String {
    let mut output = String::new();

    output.push_str(&format!("Consultation code: {}\n", seal.consultation_code));
    output.push_str(&format!("Security code:     {}\n", seal.security_code));
    output.push_str(&format!("Act count:         {}\n", seal.act_count));
    output.push_str(&format!("Performed by:      {}\n", seal.performed_by));

    if seal.value_items.is_empty() {
        output.push_str("Values:            -\n");
    } else {
        output.push_str("Values:\n");
        for item in &seal.value_items {
            output.push_str(&format!("  {}\n", item));
        }
    }

    output
}
