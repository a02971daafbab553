//! In-memory implementations of the `BankApi` and `RatesApi` traits.
//!
//! Note: this is compiled even in the "production" version of the app so that
//! the whole pipeline can run, top-to-bottom, without bank credentials (see
//! `Mode::from_env`). The unit tests drive the aggregation engine through
//! these types as well; the call counters let them assert how often the
//! upstream services would have been hit.

use crate::api::{BankApi, RatesApi};
use crate::model::{ClientInfo, RateTable, Transaction};
use crate::Result;
use anyhow::Context;
use chrono::{Local, TimeZone};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// A `BankApi` backed by a fixed `ClientInfo` and per-account transaction
/// lists. `statement` filters by the requested window the way the real API
/// does.
pub(crate) struct TestBank {
    info: ClientInfo,
    statements: HashMap<String, Vec<Transaction>>,
    calls: AtomicUsize,
}

impl TestBank {
    pub(crate) fn new(info: ClientInfo, statements: HashMap<String, Vec<Transaction>>) -> Self {
        Self {
            info,
            statements,
            calls: AtomicUsize::new(0),
        }
    }

    /// Seed data: one UAH and one EUR sole-proprietor account with a few
    /// incoming payments, an outgoing payment, and a transfer between the two
    /// accounts in early 2024. Run with `--year 2024` to see the numbers.
    pub(crate) fn seeded() -> Result<Self> {
        let uah_iban = "UA213223130000026007233566001";
        let eur_iban = "UA213223130000026007233566002";
        let mut accounts = BTreeMap::new();
        accounts.insert(980, vec!["test-acc-uah".to_string()]);
        accounts.insert(978, vec!["test-acc-eur".to_string()]);
        let ibans = HashSet::from([uah_iban.to_string(), eur_iban.to_string()]);
        let info = ClientInfo::new(accounts, ibans);

        let mut statements = HashMap::new();
        statements.insert(
            "test-acc-uah".to_string(),
            vec![
                transaction("seed-1", epoch(2024, 1, 10)?, 250_000, 980, None),
                transaction("seed-2", epoch(2024, 1, 24)?, 175_000, 980, None),
                // An expense; never counts toward income.
                transaction("seed-3", epoch(2024, 1, 25)?, -40_000, 980, None),
                // A transfer from the holder's own EUR account.
                transaction("seed-4", epoch(2024, 2, 2)?, 90_000, 980, Some(eur_iban)),
            ],
        );
        statements.insert(
            "test-acc-eur".to_string(),
            vec![
                transaction("seed-5", epoch(2024, 1, 10)?, 50_000, 978, None),
                transaction("seed-6", epoch(2024, 2, 14)?, 120_000, 978, None),
            ],
        );
        Ok(Self::new(info, statements))
    }

    /// How many API calls have been made against this double.
    #[cfg(test)]
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl BankApi for TestBank {
    async fn client_info(&self) -> Result<ClientInfo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.info.clone())
    }

    async fn statement(
        &self,
        account_id: &str,
        from_epoch: i64,
        to_epoch: i64,
    ) -> Result<Vec<Transaction>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .statements
            .get(account_id)
            .map(|txs| {
                txs.iter()
                    .filter(|tx| tx.time >= from_epoch && tx.time <= to_epoch)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// A `RatesApi` backed by per-date tables, with an optional scripted queue
/// that overrides the lookup: each call pops the next table, which lets tests
/// prove a date's table was fetched exactly once.
pub(crate) struct TestRates {
    by_date: HashMap<String, RateTable>,
    fallback: RateTable,
    scripted: Mutex<VecDeque<RateTable>>,
    calls: AtomicUsize,
}

impl TestRates {
    /// Rates looked up by date; dates not in the map get `fallback`.
    pub(crate) fn fixed(by_date: HashMap<String, RateTable>, fallback: RateTable) -> Self {
        Self {
            by_date,
            fallback,
            scripted: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Each call returns the next table in `tables`, regardless of date.
    #[cfg(test)]
    pub(crate) fn scripted(tables: Vec<RateTable>) -> Self {
        Self {
            by_date: HashMap::new(),
            fallback: RateTable::new(),
            scripted: Mutex::new(tables.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Seed data to pair with `TestBank::seeded`: one plausible EUR/USD table
    /// for every date.
    pub(crate) fn seeded() -> Self {
        let mut table = RateTable::new();
        table.insert("EUR".to_string(), Decimal::new(4350, 2));
        table.insert("USD".to_string(), Decimal::new(4125, 2));
        Self::fixed(HashMap::new(), table)
    }

    /// How many rate fetches have been made against this double.
    #[cfg(test)]
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RatesApi for TestRates {
    async fn daily_rates(&self, date: &str) -> Result<RateTable> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(table) = self.scripted.lock().await.pop_front() {
            return Ok(table);
        }
        Ok(self
            .by_date
            .get(date)
            .unwrap_or(&self.fallback)
            .clone())
    }
}

/// Builds a transaction with the fields aggregation cares about; everything
/// else is filler.
pub(crate) fn transaction(
    id: &str,
    time: i64,
    amount: i64,
    currency_code: i64,
    counter_iban: Option<&str>,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        time,
        description: format!("payment {id}"),
        mcc: 4829,
        original_mcc: 4829,
        hold: false,
        amount,
        operation_amount: amount,
        currency_code,
        commission_rate: 0,
        cashback_amount: 0,
        balance: 0,
        comment: None,
        receipt_id: None,
        invoice_id: None,
        counter_edrpou: None,
        counter_iban: counter_iban.map(str::to_string),
        counter_name: None,
    }
}

/// Noon local time on the given date, as epoch seconds.
pub(crate) fn epoch(year: i32, month: u32, day: u32) -> Result<i64> {
    Ok(Local
        .with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .with_context(|| format!("Ambiguous local time for {year}-{month:02}-{day:02}"))?
        .timestamp())
}
