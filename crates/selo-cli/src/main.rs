//! CLI application for notarial seal OCR processing.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, closing, config, fees, seal};

/// Notarial seal OCR - Extract structured data from scanned "selos"
#[derive(Parser)]
#[command(name = "selo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract fields from a single seal (OCR text or image)
    Seal(seal::SealArgs),

    /// Extract fields from multiple seals
    Batch(batch::BatchArgs),

    /// Parse acts from a fee table (Tabela 07 / 08)
    Fees(fees::FeesArgs),

    /// Parse monthly closing reports and total them
    Closing(closing::ClosingArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Execute command
    match cli.command {
        Commands::Seal(args) => seal::run(args, cli.config.as_deref()).await,
        Commands::Batch(args) => batch::run(args, cli.config.as_deref()).await,
        Commands::Fees(args) => fees::run(args, cli.config.as_deref()).await,
        Commands::Closing(args) => closing::run(args).await,
        Commands::Config(args) => config::run(args, cli.config.as_deref()).await,
    }
}
