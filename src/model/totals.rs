use crate::model::HOME_CURRENCY;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

/// One day's published exchange rates: symbolic currency code -> home-currency
/// units per one foreign unit. Valid for exactly one calendar date.
pub type RateTable = HashMap<String, Decimal>;

/// Accumulated home-currency-equivalent income for one calendar month, keyed
/// by the symbolic code of the currency the income arrived in. The home key
/// is always present, zero when the month had no activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyTotal {
    totals: BTreeMap<&'static str, Decimal>,
}

impl Default for MonthlyTotal {
    fn default() -> Self {
        Self::zero()
    }
}

impl MonthlyTotal {
    /// A total with no activity: `{home: 0}`.
    pub fn zero() -> Self {
        let mut totals = BTreeMap::new();
        totals.insert(HOME_CURRENCY, Decimal::ZERO);
        Self { totals }
    }

    /// Adds a home-currency-equivalent amount under the currency it arrived in.
    pub fn add(&mut self, currency: &'static str, amount: Decimal) {
        *self.totals.entry(currency).or_insert(Decimal::ZERO) += amount;
    }

    /// Sums `other` into `self`, key by key.
    pub fn merge(&mut self, other: MonthlyTotal) {
        for (currency, amount) in other.totals {
            self.add(currency, amount);
        }
    }

    /// The accumulated amount for one currency, zero when absent.
    pub fn get(&self, currency: &str) -> Decimal {
        self.totals.get(currency).copied().unwrap_or(Decimal::ZERO)
    }

    /// The month's income summed across all currencies, in home-currency units.
    pub fn grand_total(&self) -> Decimal {
        self.totals.values().copied().sum()
    }
}
