#![warn(clippy::all, clippy::pedantic)]

use clap::Parser;
use sfc_loader::config::{LoaderConfig, CONFIG_FILE_NAME};
use sfc_loader::pipeline::run_build;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Normalize the alternate-language blocks of every `.vue` file in a tree
#[derive(Debug, Parser)]
#[command(name = "sfc-loader", version)]
struct Cli {
    /// Source directory to scan
    src: PathBuf,

    /// Output directory
    out: PathBuf,

    /// Loader configuration (defaults to <SRC>/sfc-loader.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log every block decision
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "sfc_loader=debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| cli.src.join(CONFIG_FILE_NAME));

    let config = match LoaderConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("❌ Failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };

    let report = run_build(&cli.src, &cli.out, &config).await;
    println!("{}", report.summary());

    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
