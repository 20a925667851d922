use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::decimal::{Money, Rate};
use crate::errors::{CompareError, Result};
use crate::types::OfferId;

/// a transaction or savings account listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
    pub id: OfferId,
    pub provider: String,
    #[serde(default)]
    pub account_name: String,
    #[serde(default)]
    pub monthly_fee: Option<Money>,
    #[serde(default)]
    pub opening_fee: Option<Money>,
    #[serde(default)]
    pub interest_rate: Option<Rate>,
    #[serde(default)]
    pub recommended: bool,
    #[serde(default)]
    pub features: BTreeSet<String>,
    #[serde(default)]
    pub score: Option<Decimal>,
}

impl BankAccount {
    pub fn validate(&self) -> Result<()> {
        if let Some(score) = self.score {
            if score < Decimal::ZERO || score > dec!(10) {
                return Err(CompareError::InvalidScore { score });
            }
        }
        Ok(())
    }

    /// fees paid over a number of months of holding the account
    pub fn cost_over(&self, months: u32) -> Money {
        self.opening_fee.unwrap_or(Money::ZERO)
            + self.monthly_fee.unwrap_or(Money::ZERO) * Decimal::from(months)
    }
}
