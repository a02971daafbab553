//! Typed records for the bank API payloads and the aggregation results.

mod client_info;
mod totals;
mod transaction;

pub use client_info::ClientInfo;
pub use totals::{MonthlyTotal, RateTable};
pub use transaction::Transaction;

/// The currency everything is reported in.
pub const HOME_CURRENCY: &str = "UAH";

/// Maps an ISO 4217 numeric currency code to its symbolic code. Only the
/// currencies the account holder actually banks in are mapped; extend by
/// adding entries.
pub fn currency_symbol(numeric: i64) -> Option<&'static str> {
    match numeric {
        980 => Some("UAH"),
        978 => Some("EUR"),
        840 => Some("USD"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_symbol_known_codes() {
        assert_eq!(currency_symbol(980), Some("UAH"));
        assert_eq!(currency_symbol(978), Some("EUR"));
        assert_eq!(currency_symbol(840), Some("USD"));
    }

    #[test]
    fn test_currency_symbol_unknown_code() {
        assert_eq!(currency_symbol(826), None);
        assert_eq!(currency_symbol(0), None);
    }

    #[test]
    fn test_home_currency_is_mapped() {
        assert_eq!(currency_symbol(980), Some(HOME_CURRENCY));
    }
}
