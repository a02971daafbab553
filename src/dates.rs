//! Calendar helpers for month windows and per-day grouping keys.
//!
//! Everything here works in the local timezone because the exchange-rate
//! service publishes one table per local calendar date and the bank reports
//! operation times as epoch seconds.

use crate::Result;
use anyhow::Context;
use chrono::{Datelike, Days, Local, Months, NaiveDate, TimeZone};

/// Returns the epoch-second bounds of one calendar month in local time.
/// The end bound is inclusive: 23:59:59 of the last day of the month.
pub fn month_bounds(year: i32, month: u32) -> Result<(i64, i64)> {
    anyhow::ensure!(
        (1..=12).contains(&month),
        "Month must be between 1 and 12, got {month}"
    );

    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .with_context(|| format!("Invalid month start date {year}-{month:02}-01"))?;
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|d| d.checked_sub_days(Days::new(1)))
        .with_context(|| format!("Unable to compute the last day of {year}-{month:02}"))?;

    let start = Local
        .with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .with_context(|| format!("Ambiguous local time at the start of {year}-{month:02}"))?;
    let end = Local
        .with_ymd_and_hms(year, month, last.day(), 23, 59, 59)
        .single()
        .with_context(|| format!("Ambiguous local time at the end of {year}-{month:02}"))?;

    Ok((start.timestamp(), end.timestamp()))
}

/// Formats the local calendar date of an epoch timestamp as `YYYYMMDD`, the
/// key format the exchange-rate service expects.
pub fn day_key(epoch: i64) -> Result<String> {
    let utc = chrono::DateTime::from_timestamp(epoch, 0)
        .with_context(|| format!("Timestamp {epoch} is out of range"))?;
    Ok(utc.with_timezone(&Local).format("%Y%m%d").to_string())
}
