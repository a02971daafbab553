use serde::Deserialize;

/// A single operation from a bank statement, exactly as the statement API
/// reports it. Amounts are signed minor currency units (kopiykas/cents);
/// positive means incoming funds. Unknown payload fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    /// Operation time as epoch seconds. Exchange rates are looked up for the
    /// local calendar date of this value, not the settlement date.
    pub time: i64,
    pub description: String,
    pub mcc: i64,
    pub original_mcc: i64,
    pub hold: bool,
    pub amount: i64,
    pub operation_amount: i64,
    /// ISO 4217 numeric currency code of `amount`.
    pub currency_code: i64,
    pub commission_rate: i64,
    pub cashback_amount: i64,
    pub balance: i64,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub receipt_id: Option<String>,
    #[serde(default)]
    pub invoice_id: Option<String>,
    #[serde(default)]
    pub counter_edrpou: Option<String>,
    /// Counterparty IBAN. Absent for card operations; when present and owned
    /// by the account holder the operation is a transfer between own
    /// accounts, not income.
    #[serde(default)]
    pub counter_iban: Option<String>,
    #[serde(default)]
    pub counter_name: Option<String>,
}
