use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::info;

use daily_series_collector::{CollectorSet, Config, Orchestrator};

// ------------------------------------------------------------
// Command line
// ------------------------------------------------------------
#[derive(Parser)]
#[command(name = "daily-collector")]
#[command(about = "Daily time-series collection into CSV history files", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); RUST_LOG wins
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print the per-source report as JSON on stdout
    #[arg(long)]
    report_json: bool,

    /// Exit non-zero when any source failed or the run stopped early
    #[arg(long)]
    strict: bool,
}

// ------------------------------------------------------------
// Application entry point
// ------------------------------------------------------------
//
// One run = one pass over the source catalog:
// - Load configuration
// - Build the collector registry
// - Fetch and persist every source, in order
//
// The runtime is single-threaded on purpose: sources are fetched
// strictly one after another.
//
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.log_level.as_str()),
    )
    .init();

    let config = Config::load(&cli.config)?;
    info!("config loaded from {}", cli.config.display());

    let collectors = CollectorSet::from_config(&config);
    let orchestrator = Orchestrator::new(config, collectors);

    let report = orchestrator.run_with_report().await;

    if cli.report_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if cli.strict && !report.is_clean() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
