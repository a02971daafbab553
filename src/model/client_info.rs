use std::collections::{BTreeMap, HashSet};

/// The account holder's sole-proprietor accounts, keyed by ISO 4217 numeric
/// currency code, plus the holder's own IBANs. The IBAN set exists purely to
/// exclude transfers between own accounts from income; it is never mutated
/// after the fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    accounts: BTreeMap<i64, Vec<String>>,
    ibans: HashSet<String>,
}

impl ClientInfo {
    pub fn new(accounts: BTreeMap<i64, Vec<String>>, ibans: HashSet<String>) -> Self {
        Self { accounts, ibans }
    }

    /// All account ids across every currency bucket, in stable order.
    pub fn account_ids(&self) -> impl Iterator<Item = &str> {
        self.accounts.values().flatten().map(String::as_str)
    }

    /// True when `iban` belongs to the account holder, i.e. a transaction
    /// with this counterparty is a transfer between own accounts.
    pub fn owns_iban(&self, iban: &str) -> bool {
        self.ibans.contains(iban)
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ClientInfo {
        let mut accounts = BTreeMap::new();
        accounts.insert(980, vec!["acc-uah".to_string()]);
        accounts.insert(978, vec!["acc-eur-1".to_string(), "acc-eur-2".to_string()]);
        let ibans = HashSet::from(["UA213223130000026007233566001".to_string()]);
        ClientInfo::new(accounts, ibans)
    }

    #[test]
    fn test_account_ids_cross_all_buckets() {
        let info = sample();
        let ids: Vec<&str> = info.account_ids().collect();
        assert_eq!(ids, vec!["acc-eur-1", "acc-eur-2", "acc-uah"]);
    }

    #[test]
    fn test_owns_iban() {
        let info = sample();
        assert!(info.owns_iban("UA213223130000026007233566001"));
        assert!(!info.owns_iban("DE89370400440532013000"));
    }
}
