//! Implements the `BankApi` trait against the Monobank personal API.

use crate::api::{http, BankApi};
use crate::model::{ClientInfo, Transaction};
use crate::{Config, Result};
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;
use tracing::debug;

const CLIENT_INFO_URL: &str = "https://api.monobank.ua/personal/client-info";
const STATEMENT_URL: &str = "https://api.monobank.ua/personal/statement";

/// The statement endpoint's documented maximum window: 31 days plus one
/// hour. The extra hour matters: month bounds are computed in local time, so
/// a 31-day month in which daylight-saving time ends runs an hour longer
/// than 31 days of seconds. A calendar month always fits; this guard catches
/// misuse.
const MAX_STATEMENT_WINDOW_SECS: i64 = 31 * 86_400 + 3_600;

/// Only accounts of the sole-proprietor class count toward income; personal
/// card accounts under the same token are excluded.
const FOP_ACCOUNT_TYPE: &str = "fop";

pub struct MonobankClient {
    client: reqwest::Client,
    headers: HeaderMap,
    retry_delays: Vec<Duration>,
}

impl MonobankClient {
    pub fn new(config: &Config) -> Result<Self> {
        let token = HeaderValue::from_str(config.api_token())
            .context("api_token contains characters that are not valid in a header")?;
        let mut headers = HeaderMap::new();
        headers.insert("X-Token", token);
        Ok(Self {
            client: http::client()?,
            headers,
            retry_delays: config.statement_retry_delays(),
        })
    }
}

#[async_trait::async_trait]
impl BankApi for MonobankClient {
    async fn client_info(&self) -> Result<ClientInfo> {
        // A single attempt: failing to fetch account metadata aborts the run
        // before any statement work starts.
        let response = http::get_with_retries(&self.client, CLIENT_INFO_URL, &self.headers, &[])
            .await
            .context("Failed to fetch client info")?;
        let raw: RawClientInfo = response
            .json()
            .await
            .context("Failed to parse the client-info payload")?;
        let info = build_client_info(raw);
        debug!("Found {} sole-proprietor account(s)", info.account_ids().count());
        Ok(info)
    }

    async fn statement(
        &self,
        account_id: &str,
        from_epoch: i64,
        to_epoch: i64,
    ) -> Result<Vec<Transaction>> {
        check_statement_window(from_epoch, to_epoch)?;
        let url = format!("{STATEMENT_URL}/{account_id}/{from_epoch}/{to_epoch}");
        let response =
            http::get_with_retries(&self.client, &url, &self.headers, &self.retry_delays)
                .await
                .with_context(|| format!("Failed to fetch the statement for {account_id}"))?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse the statement payload for {account_id}"))
    }
}

/// Rejects windows the statement endpoint would refuse, before any I/O.
fn check_statement_window(from_epoch: i64, to_epoch: i64) -> Result<()> {
    anyhow::ensure!(
        to_epoch - from_epoch < MAX_STATEMENT_WINDOW_SECS,
        "Statement window of {} seconds exceeds the API's 31-day limit",
        to_epoch - from_epoch
    );
    Ok(())
}

/// The client-info payload, reduced to the fields aggregation needs. Unknown
/// fields are ignored.
#[derive(Debug, Deserialize)]
struct RawClientInfo {
    #[serde(default)]
    accounts: Vec<RawAccount>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAccount {
    id: String,
    currency_code: i64,
    iban: String,
    #[serde(rename = "type")]
    account_type: String,
}

/// Keeps only sole-proprietor accounts, bucketing account ids by currency and
/// collecting the owner's IBANs for the self-transfer filter.
fn build_client_info(raw: RawClientInfo) -> ClientInfo {
    let mut accounts: BTreeMap<i64, Vec<String>> = BTreeMap::new();
    let mut ibans: HashSet<String> = HashSet::new();
    for account in raw.accounts {
        if account.account_type != FOP_ACCOUNT_TYPE {
            continue;
        }
        accounts
            .entry(account.currency_code)
            .or_default()
            .push(account.id);
        ibans.insert(account.iban);
    }
    ClientInfo::new(accounts, ibans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates;

    #[test]
    fn test_statement_window_allows_dst_lengthened_month() {
        // When daylight-saving time ends inside a 31-day month, the local
        // calendar month runs 31 days plus one hour; the last inclusive
        // second is one below the endpoint's limit.
        let dst_october = 31 * 86_400 + 3_600 - 1;
        assert!(check_statement_window(0, dst_october).is_ok());
        assert!(check_statement_window(0, 31 * 86_400).is_ok());
    }

    #[test]
    fn test_every_month_window_fits_the_statement_limit() {
        // Whatever the local timezone, a DST shift stretches a month by at
        // most one hour, so every calendar month must pass the guard.
        for month in 1..=12 {
            let (from_epoch, to_epoch) = dates::month_bounds(2024, month).unwrap();
            assert!(
                check_statement_window(from_epoch, to_epoch).is_ok(),
                "month {month} rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_statement_rejects_oversized_window_before_any_io() {
        let config = Config::new_for_test("token123");
        let client = MonobankClient::new(&config).unwrap();
        let result = client
            .statement("acc-1", 0, MAX_STATEMENT_WINDOW_SECS)
            .await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("31-day"));
    }

    #[test]
    fn test_build_client_info_keeps_only_fop_accounts() {
        let json = r#"{
            "clientId": "3MSaMMtczs",
            "name": "Test Holder",
            "accounts": [
                {
                    "id": "acc-personal",
                    "currencyCode": 980,
                    "iban": "UA100000000000000000000000001",
                    "type": "black",
                    "balance": 10000
                },
                {
                    "id": "acc-fop-uah",
                    "currencyCode": 980,
                    "iban": "UA100000000000000000000000002",
                    "type": "fop"
                },
                {
                    "id": "acc-fop-eur",
                    "currencyCode": 978,
                    "iban": "UA100000000000000000000000003",
                    "type": "fop"
                }
            ]
        }"#;
        let raw: RawClientInfo = serde_json::from_str(json).unwrap();
        let info = build_client_info(raw);

        let ids: Vec<&str> = info.account_ids().collect();
        assert_eq!(ids, vec!["acc-fop-eur", "acc-fop-uah"]);
        assert!(info.owns_iban("UA100000000000000000000000002"));
        assert!(info.owns_iban("UA100000000000000000000000003"));
        // Personal accounts never enter the exclusion set either.
        assert!(!info.owns_iban("UA100000000000000000000000001"));
    }

    #[test]
    fn test_build_client_info_buckets_by_currency() {
        let raw = RawClientInfo {
            accounts: vec![
                RawAccount {
                    id: "a".into(),
                    currency_code: 980,
                    iban: "UA1".into(),
                    account_type: "fop".into(),
                },
                RawAccount {
                    id: "b".into(),
                    currency_code: 980,
                    iban: "UA2".into(),
                    account_type: "fop".into(),
                },
            ],
        };
        let info = build_client_info(raw);
        assert_eq!(info.account_ids().count(), 2);
    }

    #[test]
    fn test_build_client_info_empty_payload() {
        let raw: RawClientInfo = serde_json::from_str("{}").unwrap();
        let info = build_client_info(raw);
        assert!(info.is_empty());
    }
}
