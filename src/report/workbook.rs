//! Writes the twelve monthly totals into the xlsx report template.
//!
//! The template ships with the project; its layout is fixed. Column D holds
//! one grand-total cell per month, with gaps for the template's quarterly
//! subtotal rows. Columns F/G/H on the same rows hold the per-currency
//! breakdown (UAH, EUR, USD).

use crate::model::{MonthlyTotal, HOME_CURRENCY};
use crate::Result;
use anyhow::Context;
use chrono::{Datelike, Local};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use umya_spreadsheet::{reader, writer, Worksheet};

/// Month index -> the month's grand-total cell.
const TOTAL_CELLS: [&str; 12] = [
    "D9", "D10", "D11", "D13", "D14", "D15", "D18", "D19", "D20", "D23", "D24", "D25",
];

/// Month index -> the month's per-currency cells, ordered like
/// `BREAKDOWN_CURRENCIES`.
const BREAKDOWN_CELLS: [[&str; 3]; 12] = [
    ["F9", "G9", "H9"],
    ["F10", "G10", "H10"],
    ["F11", "G11", "H11"],
    ["F13", "G13", "H13"],
    ["F14", "G14", "H14"],
    ["F15", "G15", "H15"],
    ["F18", "G18", "H18"],
    ["F19", "G19", "H19"],
    ["F20", "G20", "H20"],
    ["F23", "G23", "H23"],
    ["F24", "G24", "H24"],
    ["F25", "G25", "H25"],
];

const BREAKDOWN_CURRENCIES: [&str; 3] = [HOME_CURRENCY, "EUR", "USD"];

/// Fills the template with `months` (January first) and saves the result as
/// `output_dir/report-{year}-{currentMonth}.xlsx`. A missing or unreadable
/// template is fatal; nothing is validated about its layout.
pub(crate) fn write_report(
    months: &[MonthlyTotal],
    template: &Path,
    output_dir: &Path,
    year: i32,
) -> Result<PathBuf> {
    anyhow::ensure!(
        months.len() == TOTAL_CELLS.len(),
        "Expected {} monthly totals, got {}",
        TOTAL_CELLS.len(),
        months.len()
    );

    let mut book = reader::xlsx::read(template).map_err(|e| {
        anyhow::anyhow!(
            "Failed to read the report template at {}: {e:?}",
            template.display()
        )
    })?;
    let sheet = book
        .get_sheet_mut(&0)
        .context("The report template has no worksheets")?;

    for (ix, total) in months.iter().enumerate() {
        set_number(sheet, TOTAL_CELLS[ix], total.grand_total())?;
        for (cell, currency) in BREAKDOWN_CELLS[ix].iter().zip(BREAKDOWN_CURRENCIES) {
            set_number(sheet, cell, total.get(currency))?;
        }
    }

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Unable to create {}", output_dir.display()))?;
    let path = output_dir.join(format!("report-{year}-{}.xlsx", Local::now().month()));
    writer::xlsx::write(&book, &path)
        .map_err(|e| anyhow::anyhow!("Failed to write the report to {}: {e:?}", path.display()))?;
    Ok(path)
}

fn set_number(sheet: &mut Worksheet, coordinate: &str, value: Decimal) -> Result<()> {
    let value = value
        .to_f64()
        .with_context(|| format!("Amount {value} cannot be written to cell {coordinate}"))?;
    sheet.get_cell_mut(coordinate).set_value_number(value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use tempfile::TempDir;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    /// A blank workbook standing in for the checked-in template.
    fn blank_template(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("template.xlsx");
        let book = umya_spreadsheet::new_file();
        writer::xlsx::write(&book, &path).unwrap();
        path
    }

    fn cell_number(sheet: &Worksheet, coordinate: &str) -> f64 {
        sheet.get_value(coordinate).parse().unwrap()
    }

    #[test]
    fn test_write_report_places_totals_and_breakdowns() {
        let dir = TempDir::new().unwrap();
        let template = blank_template(&dir);
        let output_dir = dir.path().join("output");

        let mut months = vec![MonthlyTotal::zero(); 12];
        months[0].add("UAH", dec("500.00"));
        months[0].add("EUR", dec("4350.00"));
        months[11].add("USD", dec("1000.00"));

        let path = write_report(&months, &template, &output_dir, 2024).unwrap();
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("report-2024-"));

        let book = reader::xlsx::read(&path).unwrap();
        let sheet = book.get_sheet(&0).unwrap();

        // January: total in D9, breakdown in F9/G9/H9.
        assert_eq!(cell_number(sheet, "D9"), 4850.0);
        assert_eq!(cell_number(sheet, "F9"), 500.0);
        assert_eq!(cell_number(sheet, "G9"), 4350.0);
        assert_eq!(cell_number(sheet, "H9"), 0.0);

        // December sits past the quarter gaps, in row 25.
        assert_eq!(cell_number(sheet, "D25"), 1000.0);
        assert_eq!(cell_number(sheet, "H25"), 1000.0);

        // An idle month defaults to zero.
        assert_eq!(cell_number(sheet, "D14"), 0.0);
    }

    #[test]
    fn test_write_report_missing_template_is_fatal() {
        let dir = TempDir::new().unwrap();
        let months = vec![MonthlyTotal::zero(); 12];
        let result = write_report(
            &months,
            &dir.path().join("nope.xlsx"),
            &dir.path().join("output"),
            2024,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_write_report_rejects_wrong_month_count() {
        let dir = TempDir::new().unwrap();
        let template = blank_template(&dir);
        let months = vec![MonthlyTotal::zero(); 11];
        let result = write_report(&months, &template, dir.path(), 2024);
        assert!(result.is_err());
    }
}
