use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::decimal::Money;
use crate::errors::{CompareError, Result};
use crate::types::OfferId;

/// a broadband plan listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadbandPlan {
    pub id: OfferId,
    pub provider: String,
    #[serde(default)]
    pub plan_name: String,
    pub monthly_price: Money,
    #[serde(default)]
    pub setup_fee: Option<Money>,
    /// typical evening download speed in Mbps
    #[serde(default)]
    pub download_mbps: Option<u32>,
    /// zero for no-contract plans
    #[serde(default)]
    pub contract_months: u32,
    #[serde(default)]
    pub recommended: bool,
    #[serde(default)]
    pub features: BTreeSet<String>,
    #[serde(default)]
    pub score: Option<Decimal>,
}

impl BroadbandPlan {
    pub fn validate(&self) -> Result<()> {
        if self.monthly_price.is_negative() {
            return Err(CompareError::InvalidConfiguration {
                message: format!("negative monthly price {} for plan {}", self.monthly_price, self.id),
            });
        }
        if let Some(score) = self.score {
            if score < Decimal::ZERO || score > dec!(10) {
                return Err(CompareError::InvalidScore { score });
            }
        }
        Ok(())
    }

    /// setup fee plus monthly price over the given months
    pub fn cost_over(&self, months: u32) -> Money {
        self.setup_fee.unwrap_or(Money::ZERO) + self.monthly_price * Decimal::from(months)
    }

    /// minimum cost of holding the plan for its contract (or one month)
    pub fn minimum_total_cost(&self) -> Money {
        self.cost_over(self.contract_months.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_cost() {
        let plan: BroadbandPlan = serde_json::from_value(serde_json::json!({
            "id": "3b8f0d2e-5a61-4c7e-8f93-1d2c4b6a8e0f",
            "provider": "Fibreline",
            "monthly_price": "79.99",
            "setup_fee": 120,
            "contract_months": 12
        }))
        .unwrap();

        assert_eq!(plan.cost_over(6), Money::from_str_exact("599.94").unwrap());
        assert_eq!(plan.minimum_total_cost(), Money::from_str_exact("1079.88").unwrap());
        assert!(plan.validate().is_ok());

        let no_contract = BroadbandPlan { contract_months: 0, setup_fee: None, ..plan };
        assert_eq!(no_contract.minimum_total_cost(), Money::from_str_exact("79.99").unwrap());
    }
}
