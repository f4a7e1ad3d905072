//! Subcommands of the `selo` CLI.

pub mod batch;
pub mod closing;
pub mod config;
pub mod fees;
pub mod seal;

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use tracing::debug;

use selo_core::SeloConfig;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension for outputs in this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Location of the user configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("selo")
        .join("config.json")
}

/// Load the configuration from `path`, else from the user configuration file
/// when it exists, else the defaults.
pub fn load_config(path: Option<&str>) -> anyhow::Result<SeloConfig> {
    if let Some(path) = path {
        return Ok(SeloConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading configuration from {}", default_path.display());
        Ok(SeloConfig::from_file(&default_path)?)
    } else {
        Ok(SeloConfig::default())
    }
}

/// Read a text input, failing with a readable message when it is missing.
pub fn read_input(path: &Path) -> anyhow::Result<String> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }
    Ok(fs::read_to_string(path)?)
}

/// Write `content` to `output`, or print it when no output file is given.
pub fn write_output(content: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
            println!(
                "{} Output written to {}",
                console::style("✓").green(),
                path.display()
            );
        }
        None => println!("{}", content),
    }
    Ok(())
}
