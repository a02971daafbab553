use chrono::Datelike;
use clap::Parser;
use monotax::args::Args;
use monotax::{api, report, Config, Mode, Result};
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn main_inner(args: Args) -> Result<()> {
    debug!("{args:?}");
    let config = Config::load(args.config()).await?;

    // This allows for running the program without hitting the live APIs. When
    // MONOTAX_IN_TEST_MODE is set and non-zero in length, the mode will be
    // Mode::Test, otherwise it will be Mode::Live.
    let mode = Mode::from_env();
    let bank = api::bank(mode, &config)?;
    let rates = api::rates(mode, &config)?;

    let year = args.year().unwrap_or_else(|| chrono::Local::now().year());
    report::generate_report(
        bank.as_ref(),
        rates.as_ref(),
        year,
        args.template(),
        args.output_dir(),
    )
    .await?;
    Ok(())
}

/// Initializes the tracing subscriber.
fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
