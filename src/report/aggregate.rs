//! The monthly aggregation engine.
//!
//! For one calendar month: fetch statements across every account, drop
//! outgoing operations and transfers between the holder's own accounts, group
//! the rest by the local calendar date of the operation, convert each day's
//! income at that day's published rates, and sum into per-currency totals.
//!
//! Day-level grouping is the correct granularity: rates are published per
//! day and a month's operations can span materially different rates, so one
//! month-level rate would bias the totals.

use crate::api::{BankApi, RatesApi};
use crate::dates;
use crate::model::{currency_symbol, ClientInfo, MonthlyTotal, RateTable, Transaction, HOME_CURRENCY};
use crate::Result;
use chrono::{Datelike, Local};
use futures::stream::{self, StreamExt, TryStreamExt};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// How many statement fetches may be in flight at once. The bank API is rate
/// limited and the backoff schedule is the only defense, so this stays small.
const STATEMENT_CONCURRENCY: usize = 4;

/// Drives the bank and exchange-rate clients to produce monthly totals.
pub struct Aggregator<'a> {
    bank: &'a dyn BankApi,
    rates: &'a dyn RatesApi,
}

impl<'a> Aggregator<'a> {
    pub fn new(bank: &'a dyn BankApi, rates: &'a dyn RatesApi) -> Self {
        Self { bank, rates }
    }

    /// Computes the income for one calendar month, converted to the home
    /// currency and keyed by the currency it arrived in.
    ///
    /// Months that have not fully elapsed return the zero total without any
    /// network calls; they would otherwise report partial data.
    pub async fn month_earnings(
        &self,
        year: i32,
        month: u32,
        info: &ClientInfo,
    ) -> Result<MonthlyTotal> {
        let now = Local::now();
        if month >= now.month() && year >= now.year() {
            return Ok(MonthlyTotal::zero());
        }

        let (from_epoch, to_epoch) = dates::month_bounds(year, month)?;
        let transactions = self.fetch_statements(info, from_epoch, to_epoch).await?;
        debug!(
            "{year}-{month:02}: {} transaction(s) across {} account(s)",
            transactions.len(),
            info.account_ids().count()
        );

        let mut total = MonthlyTotal::zero();
        for (date, group) in group_by_day(&transactions)? {
            let table = self.rates.daily_rates(&date).await?;
            total.merge(convert_group(&group, &table, info));
        }
        Ok(total)
    }

    /// Fetches every account's statement for the window, a few accounts at a
    /// time, and concatenates the results. Each transaction carries its own
    /// currency code, so the account's currency bucket does not matter here.
    async fn fetch_statements(
        &self,
        info: &ClientInfo,
        from_epoch: i64,
        to_epoch: i64,
    ) -> Result<Vec<Transaction>> {
        let fetches = info
            .account_ids()
            .map(|account_id| self.bank.statement(account_id, from_epoch, to_epoch));
        let batches: Vec<Vec<Transaction>> = stream::iter(fetches)
            .buffer_unordered(STATEMENT_CONCURRENCY)
            .try_collect()
            .await?;
        Ok(batches.into_iter().flatten().collect())
    }
}

/// Groups transactions by the local calendar date they occurred on, so each
/// group can be converted at that date's rates with a single fetch.
fn group_by_day(transactions: &[Transaction]) -> Result<BTreeMap<String, Vec<&Transaction>>> {
    let mut grouped: BTreeMap<String, Vec<&Transaction>> = BTreeMap::new();
    for tx in transactions {
        grouped.entry(dates::day_key(tx.time)?).or_default().push(tx);
    }
    Ok(grouped)
}

/// Converts one date group's income at that date's rates.
///
/// Counts a transaction only when its amount is positive and its counterparty
/// IBAN is not one of the holder's own. Transactions in an unmapped currency,
/// or in a currency the day's table has no rate for, are skipped with a
/// warning and contribute nothing.
fn convert_group(group: &[&Transaction], table: &RateTable, info: &ClientInfo) -> MonthlyTotal {
    let mut total = MonthlyTotal::zero();
    for tx in group {
        if tx.amount <= 0 {
            continue;
        }
        if tx
            .counter_iban
            .as_deref()
            .is_some_and(|iban| info.owns_iban(iban))
        {
            continue;
        }
        // Minor units to major units, exactly.
        let amount = Decimal::new(tx.amount, 2);
        let Some(currency) = currency_symbol(tx.currency_code) else {
            warn!(
                "Skipping transaction {}: unmapped currency code {}",
                tx.id, tx.currency_code
            );
            continue;
        };
        if currency == HOME_CURRENCY {
            total.add(currency, amount);
        } else if let Some(rate) = table.get(currency) {
            total.add(currency, amount * rate);
        } else {
            warn!(
                "Skipping transaction {}: no {currency} rate published for its date",
                tx.id
            );
        }
    }
    total
}
