//! Implements the `RatesApi` trait against the National Bank of Ukraine's
//! daily exchange-rate service.

use crate::api::{http, RatesApi};
use crate::model::RateTable;
use crate::{Config, Result};
use anyhow::Context;
use reqwest::header::HeaderMap;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;

const EXCHANGE_URL: &str = "https://bank.gov.ua/NBUStatService/v1/statdirectory/exchangenew";

pub struct NbuClient {
    client: reqwest::Client,
    retry_delays: Vec<Duration>,
}

impl NbuClient {
    pub fn new(config: &Config) -> Result<Self> {
        // Retrying rate fetches is opt-in; by default the first failure is
        // fatal for the run.
        let retry_delays = if config.retry_exchange_rates() {
            config.statement_retry_delays()
        } else {
            Vec::new()
        };
        Ok(Self {
            client: http::client()?,
            retry_delays,
        })
    }
}

#[async_trait::async_trait]
impl RatesApi for NbuClient {
    async fn daily_rates(&self, date: &str) -> Result<RateTable> {
        let url = format!("{EXCHANGE_URL}?json&date={date}");
        let response =
            http::get_with_retries(&self.client, &url, &HeaderMap::new(), &self.retry_delays)
                .await
                .with_context(|| format!("Failed to fetch exchange rates for {date}"))?;
        let raw: Vec<RawRate> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse the exchange-rate payload for {date}"))?;
        build_rate_table(raw)
    }
}

/// One entry of the service's response array. The payload carries more fields
/// (txt, r030, exchangedate); only these two matter.
#[derive(Debug, Deserialize)]
struct RawRate {
    cc: String,
    rate: f64,
}

fn build_rate_table(raw: Vec<RawRate>) -> Result<RateTable> {
    raw.into_iter()
        .map(|r| {
            let rate = Decimal::try_from(r.rate)
                .with_context(|| format!("Rate for {} is not a finite number: {}", r.cc, r.rate))?;
            Ok((r.cc, rate))
        })
        .collect()
}
