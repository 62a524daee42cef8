//! Account balance snapshot.

use rust_decimal::Decimal;
use serde::Serialize;

/// Balance as last fetched from the backend.
///
/// No local ledger is kept: the snapshot is re-fetched after every order
/// mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub available_balance: Decimal,
}

impl Balance {
    #[must_use]
    pub const fn new(available_balance: Decimal) -> Self {
        Self { available_balance }
    }

    /// True when `amount` exceeds what is available.
    #[must_use]
    pub fn is_insufficient_for(&self, amount: Decimal) -> bool {
        amount > self.available_balance
    }

    /// Balance left after staking `amount`, floored at zero.
    #[must_use]
    pub fn remaining_after(&self, amount: Decimal) -> Decimal {
        (self.available_balance - amount).max(Decimal::ZERO)
    }
}
