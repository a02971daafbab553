//! The CLI interface for monotax.

use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;

/// monotax: builds a yearly income report for a sole proprietor.
///
/// Fetches the year's incoming bank transactions, converts foreign-currency
/// amounts to UAH at the historical daily exchange rates, and writes the
/// monthly totals into an xlsx report. Running with no arguments reports on
/// the current year.
///
/// The bank API token is read from a JSON config file, `conf/config.json` by
/// default. Set MONOTAX_IN_TEST_MODE=1 to run against seeded in-memory data
/// instead of the live APIs.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    /// The year to report on. Defaults to the current year.
    #[arg(long)]
    year: Option<i32>,

    /// Path to the JSON configuration file holding the bank API token.
    #[arg(long, env = "MONOTAX_CONFIG", default_value = "conf/config.json")]
    config: PathBuf,

    /// Path to the report template workbook.
    #[arg(long, default_value = "templates/report.xlsx")]
    template: PathBuf,

    /// Directory the finished report is written to.
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,
}

impl Args {
    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn config(&self) -> &Path {
        &self.config
    }

    pub fn template(&self) -> &Path {
        &self.template
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["monotax"]);
        assert_eq!(args.year(), None);
        assert_eq!(args.config(), Path::new("conf/config.json"));
        assert_eq!(args.template(), Path::new("templates/report.xlsx"));
        assert_eq!(args.output_dir(), Path::new("output"));
        assert_eq!(args.log_level(), LevelFilter::INFO);
    }

    #[test]
    fn test_flags_parse() {
        let args = Args::parse_from([
            "monotax",
            "--year",
            "2024",
            "--config",
            "/tmp/c.json",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.year(), Some(2024));
        assert_eq!(args.config(), Path::new("/tmp/c.json"));
        assert_eq!(args.log_level(), LevelFilter::DEBUG);
    }
}
