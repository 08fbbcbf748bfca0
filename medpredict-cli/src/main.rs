//! MedPredict CLI: serves the disease prediction dashboard and inspects
//! its model artifacts.

mod commands;

use clap::Parser;
use medpredict_core::Disease;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// MedPredict: diabetes, heart disease and Parkinson's prediction dashboard
#[derive(Parser, Debug)]
#[command(name = "medpredict", version, about, long_about = None)]
struct Cli {
    /// Workspace directory
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,

    /// Subcommand (defaults to `serve`)
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Load the models and serve the dashboard
    Serve(ServeArgs),
    /// Load and validate all model artifacts, then exit
    Check {
        /// Models directory (overrides config)
        #[arg(long)]
        models_dir: Option<PathBuf>,
    },
    /// Print the ordered feature schema of one or all diseases
    Schema {
        /// diabetes, heart-disease or parkinsons
        disease: Option<Disease>,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args, Debug, Default)]
struct ServeArgs {
    /// Host to bind to (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Models directory (overrides config)
    #[arg(long)]
    models_dir: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
}

/// `-v`/`-q` win over `RUST_LOG`; without either flag `RUST_LOG` applies,
/// falling back to `info`.
fn stderr_filter(verbose: u8, quiet: bool) -> EnvFilter {
    let level = match verbose {
        0 if quiet => "error",
        0 => return EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => "debug",
        _ => "trace",
    };
    EnvFilter::new(level)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set up tracing: human-readable stderr + JSON file logging
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(stderr_filter(cli.verbose, cli.quiet));

    let log_dir = directories::ProjectDirs::from("dev", "medpredict", "medpredict")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "medpredict.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let config = medpredict_core::load_config(Some(&workspace), cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Serve(ServeArgs::default()));
    commands::handle_command(command, config).await
}
