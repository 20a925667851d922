use rust_decimal::Decimal;

use crate::decimal::Rate;
use crate::filter::Filterable;
use crate::products::{BankAccount, BroadbandPlan, LoanOffer};
use crate::rates::{resolve_rate, RatePolicy, RateResolver};

/// loan listing whose rate is resolved by a configured resolver
pub(crate) struct ResolvedOffer<'a> {
    pub(crate) offer: &'a LoanOffer,
    pub(crate) resolver: &'a RateResolver,
}

impl Filterable for ResolvedOffer<'_> {
    fn numeric_field(&self, field: &str) -> Option<Decimal> {
        match field {
            "interest_rate" => self.resolver.resolve(self.offer).published_percent(),
            _ => self.offer.numeric_field(field),
        }
    }

    fn flag(&self, field: &str) -> bool {
        self.offer.flag(field)
    }

    fn category(&self, field: &str) -> Option<&str> {
        self.offer.category(field)
    }
}

impl Filterable for LoanOffer {
    /// `interest_rate` is the rate ranking uses under the built-in policy
    fn numeric_field(&self, field: &str) -> Option<Decimal> {
        match field {
            "interest_rate" => {
                resolve_rate(self, RatePolicy::default_for(self.product_type), Rate::ZERO).published_percent()
            }
            "comparison_rate" => self.comparison_rate.map(|r| r.as_percentage()),
            "min_amount" => self.min_amount.map(|m| m.as_decimal()),
            "max_amount" => self.max_amount.map(|m| m.as_decimal()),
            "min_term_months" => self.min_term_months.map(Decimal::from),
            "max_term_months" => self.max_term_months.map(Decimal::from),
            "application_fee" => self.fees.application_fee.map(|m| m.as_decimal()),
            "ongoing_fee" => self.fees.ongoing_annual().map(|m| m.as_decimal()),
            "max_lvr" => self.max_lvr.map(|r| r.as_percentage()),
            "score" => self.score,
            _ => None,
        }
    }

    fn flag(&self, field: &str) -> bool {
        match field {
            "recommended" => self.recommended,
            "promoted" => self.promoted,
            "no_application_fee" => self.fees.application_fee.map_or(true, |fee| fee.is_zero()),
            feature => self.has_feature(feature),
        }
    }

    fn category(&self, field: &str) -> Option<&str> {
        match field {
            "lender" => Some(self.lender.as_str()),
            _ => None,
        }
    }
}

impl Filterable for BankAccount {
    fn numeric_field(&self, field: &str) -> Option<Decimal> {
        match field {
            "monthly_fee" => self.monthly_fee.map(|m| m.as_decimal()),
            "opening_fee" => self.opening_fee.map(|m| m.as_decimal()),
            "interest_rate" => self.interest_rate.map(|r| r.as_percentage()),
            "score" => self.score,
            _ => None,
        }
    }

    fn flag(&self, field: &str) -> bool {
        match field {
            "recommended" => self.recommended,
            "no_monthly_fee" => self.monthly_fee.map_or(true, |fee| fee.is_zero()),
            feature => self.features.contains(feature),
        }
    }

    fn category(&self, field: &str) -> Option<&str> {
        match field {
            "provider" => Some(self.provider.as_str()),
            _ => None,
        }
    }
}

impl Filterable for BroadbandPlan {
    fn numeric_field(&self, field: &str) -> Option<Decimal> {
        match field {
            "monthly_price" => Some(self.monthly_price.as_decimal()),
            "setup_fee" => self.setup_fee.map(|m| m.as_decimal()),
            "download_mbps" => self.download_mbps.map(Decimal::from),
            "contract_months" => Some(Decimal::from(self.contract_months)),
            "score" => self.score,
            _ => None,
        }
    }

    fn flag(&self, field: &str) -> bool {
        match field {
            "recommended" => self.recommended,
            "no_contract" => self.contract_months == 0,
            feature => self.features.contains(feature),
        }
    }

    fn category(&self, field: &str) -> Option<&str> {
        match field {
            "provider" => Some(self.provider.as_str()),
            _ => None,
        }
    }
}
