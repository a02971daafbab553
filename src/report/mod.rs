//! Report generation: runs the aggregation engine for each month of a year
//! and writes the results into the xlsx report.

mod aggregate;
mod workbook;

pub use aggregate::Aggregator;

use crate::api::{BankApi, RatesApi};
use crate::Result;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Generates the income report for `year`: fetches the account metadata once,
/// aggregates each of the twelve months in order, and fills the template.
/// Returns the path of the written report.
///
/// Any fetch failure aborts the whole run; no partial report is written.
pub async fn generate_report(
    bank: &dyn BankApi,
    rates: &dyn RatesApi,
    year: i32,
    template: &Path,
    output_dir: &Path,
) -> Result<PathBuf> {
    let info = bank.client_info().await?;
    if info.is_empty() {
        warn!("No sole-proprietor accounts found; the report will be empty");
    }

    let aggregator = Aggregator::new(bank, rates);
    let mut months = Vec::with_capacity(12);
    for month in 1..=12 {
        let total = aggregator.month_earnings(year, month, &info).await?;
        info!("{year}-{month:02}: {} UAH", total.grand_total());
        months.push(total);
    }

    let path = workbook::write_report(&months, template, output_dir, year)?;
    info!("Saved report to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{TestBank, TestRates};
    use tempfile::TempDir;
    use umya_spreadsheet::{reader, writer};

    #[tokio::test]
    async fn test_generate_report_end_to_end_with_seed_data() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("template.xlsx");
        writer::xlsx::write(&umya_spreadsheet::new_file(), &template).unwrap();
        let output_dir = dir.path().join("output");

        let bank = TestBank::seeded().unwrap();
        let rates = TestRates::seeded();

        let path = generate_report(&bank, &rates, 2024, &template, &output_dir)
            .await
            .unwrap();
        assert!(path.is_file());

        let book = reader::xlsx::read(&path).unwrap();
        let sheet = book.get_sheet(&0).unwrap();

        // January 2024 seed data: 2500.00 + 1750.00 UAH incoming, plus
        // 500.00 EUR at the seeded 43.50 rate. The expense and the transfer
        // between own accounts are excluded.
        let january: f64 = sheet.get_value("D9").parse().unwrap();
        assert!((january - (2500.0 + 1750.0 + 500.0 * 43.5)).abs() < 1e-9);

        // February 2024 seed data: only the 1200.00 EUR payment counts; the
        // incoming transfer from the holder's own account does not.
        let february: f64 = sheet.get_value("D10").parse().unwrap();
        assert!((february - 1200.0 * 43.5).abs() < 1e-9);

        // No seed activity after February.
        let march: f64 = sheet.get_value("D11").parse().unwrap();
        assert_eq!(march, 0.0);
    }

    #[tokio::test]
    async fn test_generate_report_fails_without_template() {
        let dir = TempDir::new().unwrap();
        let bank = TestBank::seeded().unwrap();
        let rates = TestRates::seeded();

        let result = generate_report(
            &bank,
            &rates,
            2024,
            &dir.path().join("missing.xlsx"),
            &dir.path().join("output"),
        )
        .await;
        assert!(result.is_err());
        assert!(!dir.path().join("output").exists());
    }
}
