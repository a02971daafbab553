//! Clients for the two external services: the bank statement API and the
//! national bank's daily exchange-rate service.
//!
//! Both are reached through traits so the aggregation engine can be driven
//! by in-memory doubles in tests and in test mode.

mod http;
mod monobank;
mod nbu;
mod test_client;

use crate::model::{ClientInfo, RateTable, Transaction};
use crate::{Config, Result};

pub use monobank::MonobankClient;
pub use nbu::NbuClient;
pub(crate) use test_client::{TestBank, TestRates};
#[cfg(test)]
pub(crate) use test_client::{epoch, transaction};

/// The bank statement API: account metadata plus per-account transaction
/// statements for a bounded time window.
#[async_trait::async_trait]
pub trait BankApi: Send + Sync {
    /// Fetches the account holder's sole-proprietor accounts and IBANs.
    async fn client_info(&self) -> Result<ClientInfo>;

    /// Fetches all operations on one account between `from_epoch` and
    /// `to_epoch` (both inclusive, epoch seconds).
    async fn statement(
        &self,
        account_id: &str,
        from_epoch: i64,
        to_epoch: i64,
    ) -> Result<Vec<Transaction>>;
}

/// The exchange-rate service: one published rate table per calendar date.
#[async_trait::async_trait]
pub trait RatesApi: Send + Sync {
    /// Fetches the rate table for one calendar date, `YYYYMMDD`.
    async fn daily_rates(&self, date: &str) -> Result<RateTable>;
}

/// Selects between the live API clients and seeded in-memory ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Live,
    Test,
}

impl Mode {
    /// This allows for running the program without bank credentials. When
    /// MONOTAX_IN_TEST_MODE is set and non-zero in length the mode will be
    /// `Mode::Test`, otherwise `Mode::Live`.
    pub fn from_env() -> Self {
        match std::env::var("MONOTAX_IN_TEST_MODE") {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Live,
        }
    }
}

/// Creates the bank client for `mode`.
pub fn bank(mode: Mode, config: &Config) -> Result<Box<dyn BankApi>> {
    Ok(match mode {
        Mode::Live => Box::new(MonobankClient::new(config)?),
        Mode::Test => Box::new(TestBank::seeded()?),
    })
}

/// Creates the exchange-rate client for `mode`.
pub fn rates(mode: Mode, config: &Config) -> Result<Box<dyn RatesApi>> {
    Ok(match mode {
        Mode::Live => Box::new(NbuClient::new(config)?),
        Mode::Test => Box::new(TestRates::seeded()),
    })
}
