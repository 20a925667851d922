use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::errors::{CompareError, Result};
use crate::types::{OfferId, ProductType};

/// advertised interest rate as published by the lender
///
/// Rows carry either a single `rate`, a `rate_min`/`rate_max` range, or nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RateQuote {
    #[serde(default)]
    pub rate: Option<Rate>,
    #[serde(default)]
    pub rate_min: Option<Rate>,
    #[serde(default)]
    pub rate_max: Option<Rate>,
}

impl RateQuote {
    pub fn fixed(rate: Rate) -> Self {
        Self { rate: Some(rate), ..Self::default() }
    }

    pub fn range(min: Rate, max: Rate) -> Self {
        Self {
            rate: None,
            rate_min: Some(min),
            rate_max: Some(max),
        }
    }

    pub fn unspecified() -> Self {
        Self::default()
    }

    /// the "from" rate shown on listing cards
    pub fn headline(&self) -> Option<Rate> {
        self.rate.or(self.rate_min).or(self.rate_max)
    }

    pub fn is_unspecified(&self) -> bool {
        self.headline().is_none()
    }
}

/// fees charged on a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    pub application_fee: Option<Money>,
    pub processing_fee: Option<Money>,
    pub settlement_fee: Option<Money>,
    pub discharge_fee: Option<Money>,
    pub monthly_fee: Option<Money>,
    pub annual_fee: Option<Money>,
}

impl FeeSchedule {
    /// sum of the one-time fees
    pub fn upfront_total(&self) -> Money {
        [
            self.application_fee,
            self.processing_fee,
            self.settlement_fee,
            self.discharge_fee,
        ]
        .into_iter()
        .flatten()
        .sum()
    }

    /// recurring fees charged over a number of months
    pub fn ongoing_over(&self, months: u32) -> Money {
        let monthly = self.monthly_fee.unwrap_or(Money::ZERO) * Decimal::from(months);
        let annual = self.annual_fee.unwrap_or(Money::ZERO) * (Decimal::from(months) / dec!(12));
        monthly + annual
    }

    /// recurring fees normalised to one year
    pub fn ongoing_annual(&self) -> Option<Money> {
        match (self.monthly_fee, self.annual_fee) {
            (None, None) => None,
            _ => Some(self.ongoing_over(12)),
        }
    }
}

/// a loan listing fetched from the data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanOffer {
    pub id: OfferId,
    pub lender: String,
    pub product_type: ProductType,
    #[serde(default)]
    pub min_amount: Option<Money>,
    #[serde(default)]
    pub max_amount: Option<Money>,
    #[serde(flatten)]
    pub rate: RateQuote,
    #[serde(default)]
    pub comparison_rate: Option<Rate>,
    #[serde(default)]
    pub min_term_months: Option<u32>,
    #[serde(default)]
    pub max_term_months: Option<u32>,
    #[serde(flatten)]
    pub fees: FeeSchedule,
    /// maximum loan-to-value ratio
    #[serde(default)]
    pub max_lvr: Option<Rate>,
    #[serde(default)]
    pub recommended: bool,
    #[serde(default)]
    pub promoted: bool,
    #[serde(default)]
    pub features: BTreeSet<String>,
    /// editorial quality score in [0, 10]
    #[serde(default)]
    pub score: Option<Decimal>,
}

impl LoanOffer {
    pub fn builder() -> LoanOfferBuilder {
        LoanOfferBuilder::new()
    }

    /// check the invariants a listing must hold
    pub fn validate(&self) -> Result<()> {
        if let (Some(min), Some(max)) = (self.rate.rate_min, self.rate.rate_max) {
            if min > max {
                return Err(CompareError::InvalidRateRange { min, max });
            }
        }
        if let (Some(min), Some(max)) = (self.min_amount, self.max_amount) {
            if min > max {
                return Err(CompareError::InvalidBounds {
                    field: "amount".to_string(),
                    min: min.to_string(),
                    max: max.to_string(),
                });
            }
        }
        if let (Some(min), Some(max)) = (self.min_term_months, self.max_term_months) {
            if min > max {
                return Err(CompareError::InvalidBounds {
                    field: "term_months".to_string(),
                    min: min.to_string(),
                    max: max.to_string(),
                });
            }
        }
        if let Some(score) = self.score {
            if score < Decimal::ZERO || score > dec!(10) {
                return Err(CompareError::InvalidScore { score });
            }
        }
        if !self.product_type.is_loan() {
            return Err(CompareError::InvalidConfiguration {
                message: format!("{:?} is not a loan product", self.product_type),
            });
        }
        Ok(())
    }

    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.contains(feature)
    }
}

/// builder for loan offers
pub struct LoanOfferBuilder {
    id: Option<OfferId>,
    lender: Option<String>,
    product_type: ProductType,
    min_amount: Option<Money>,
    max_amount: Option<Money>,
    rate: RateQuote,
    comparison_rate: Option<Rate>,
    min_term_months: Option<u32>,
    max_term_months: Option<u32>,
    fees: FeeSchedule,
    max_lvr: Option<Rate>,
    recommended: bool,
    promoted: bool,
    features: BTreeSet<String>,
    score: Option<Decimal>,
}

impl LoanOfferBuilder {
    pub fn new() -> Self {
        Self {
            id: None,
            lender: None,
            product_type: ProductType::PersonalLoan,
            min_amount: None,
            max_amount: None,
            rate: RateQuote::unspecified(),
            comparison_rate: None,
            min_term_months: None,
            max_term_months: None,
            fees: FeeSchedule::default(),
            max_lvr: None,
            recommended: false,
            promoted: false,
            features: BTreeSet::new(),
            score: None,
        }
    }

    pub fn id(mut self, id: OfferId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn lender(mut self, lender: impl Into<String>) -> Self {
        self.lender = Some(lender.into());
        self
    }

    pub fn product_type(mut self, product_type: ProductType) -> Self {
        self.product_type = product_type;
        self
    }

    pub fn amount_range(mut self, min: Money, max: Money) -> Self {
        self.min_amount = Some(min);
        self.max_amount = Some(max);
        self
    }

    pub fn rate(mut self, rate: Rate) -> Self {
        self.rate = RateQuote::fixed(rate);
        self
    }

    pub fn rate_range(mut self, min: Rate, max: Rate) -> Self {
        self.rate = RateQuote::range(min, max);
        self
    }

    pub fn rate_quote(mut self, quote: RateQuote) -> Self {
        self.rate = quote;
        self
    }

    pub fn comparison_rate(mut self, rate: Rate) -> Self {
        self.comparison_rate = Some(rate);
        self
    }

    pub fn term_range_months(mut self, min: u32, max: u32) -> Self {
        self.min_term_months = Some(min);
        self.max_term_months = Some(max);
        self
    }

    pub fn max_term_months(mut self, max: u32) -> Self {
        self.max_term_months = Some(max);
        self
    }

    pub fn fees(mut self, fees: FeeSchedule) -> Self {
        self.fees = fees;
        self
    }

    pub fn application_fee(mut self, fee: Money) -> Self {
        self.fees.application_fee = Some(fee);
        self
    }

    pub fn monthly_fee(mut self, fee: Money) -> Self {
        self.fees.monthly_fee = Some(fee);
        self
    }

    pub fn annual_fee(mut self, fee: Money) -> Self {
        self.fees.annual_fee = Some(fee);
        self
    }

    pub fn max_lvr(mut self, lvr: Rate) -> Self {
        self.max_lvr = Some(lvr);
        self
    }

    pub fn recommended(mut self, recommended: bool) -> Self {
        self.recommended = recommended;
        self
    }

    pub fn promoted(mut self, promoted: bool) -> Self {
        self.promoted = promoted;
        self
    }

    pub fn feature(mut self, feature: impl Into<String>) -> Self {
        self.features.insert(feature.into());
        self
    }

    pub fn score(mut self, score: Decimal) -> Self {
        self.score = Some(score);
        self
    }

    pub fn build(self) -> Result<LoanOffer> {
        let offer = LoanOffer {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            lender: self.lender.ok_or_else(|| CompareError::InvalidConfiguration {
                message: "lender is required".to_string(),
            })?,
            product_type: self.product_type,
            min_amount: self.min_amount,
            max_amount: self.max_amount,
            rate: self.rate,
            comparison_rate: self.comparison_rate,
            min_term_months: self.min_term_months,
            max_term_months: self.max_term_months,
            fees: self.fees,
            max_lvr: self.max_lvr,
            recommended: self.recommended,
            promoted: self.promoted,
            features: self.features,
            score: self.score,
        };
        offer.validate()?;
        Ok(offer)
    }
}

impl Default for LoanOfferBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_enforces_rate_range() {
        let err = LoanOffer::builder()
            .lender("Acme Bank")
            .rate_range(Rate::from_percentage(12), Rate::from_percentage(8))
            .build()
            .unwrap_err();
        assert!(matches!(err, CompareError::InvalidRateRange { .. }));
    }

    #[test]
    fn test_builder_enforces_score_and_lender() {
        assert!(matches!(
            LoanOffer::builder().lender("Acme").score(dec!(11)).build(),
            Err(CompareError::InvalidScore { .. })
        ));
        assert!(matches!(
            LoanOffer::builder().build(),
            Err(CompareError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            LoanOffer::builder().lender("Acme").product_type(ProductType::Broadband).build(),
            Err(CompareError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_headline_rate() {
        assert_eq!(RateQuote::fixed(Rate::from_percentage(7)).headline(), Some(Rate::from_percentage(7)));
        assert_eq!(
            RateQuote::range(Rate::from_percentage(8), Rate::from_percentage(12)).headline(),
            Some(Rate::from_percentage(8))
        );
        assert!(RateQuote::unspecified().is_unspecified());
    }

    #[test]
    fn test_fee_totals() {
        let fees = FeeSchedule {
            application_fee: Some(Money::from_major(250)),
            settlement_fee: Some(Money::from_major(150)),
            monthly_fee: Some(Money::from_major(10)),
            annual_fee: Some(Money::from_major(395)),
            ..FeeSchedule::default()
        };
        assert_eq!(fees.upfront_total(), Money::from_major(400));
        assert_eq!(fees.ongoing_over(24), Money::from_major(240 + 790));
        assert_eq!(fees.ongoing_annual(), Some(Money::from_major(120 + 395)));
        assert_eq!(FeeSchedule::default().ongoing_annual(), None);
    }

    #[test]
    fn test_deserialize_row() {
        let row = serde_json::json!({
            "id": "6f1c3a52-8d0e-4f4b-9a57-2f0e3f1c9b11",
            "lender": "Harbour Bank",
            "product_type": "car_loan",
            "rate_min": 8,
            "rate_max": 12,
            "application_fee": 199,
            "max_term_months": 84,
            "recommended": true,
            "features": ["early_repayment"],
            "score": 8.5
        });

        let offer: LoanOffer = serde_json::from_value(row).unwrap();
        assert_eq!(offer.product_type, ProductType::CarLoan);
        assert_eq!(offer.rate, RateQuote::range(Rate::from_percentage(8), Rate::from_percentage(12)));
        assert_eq!(offer.fees.application_fee, Some(Money::from_major(199)));
        assert_eq!(offer.score, Some(dec!(8.5)));
        assert!(offer.has_feature("early_repayment"));
        assert!(!offer.promoted);
        assert!(offer.validate().is_ok());
    }
}
