use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::decimal::Rate;
use crate::products::LoanOffer;
use crate::types::ProductType;

/// rate assumed when a listing publishes none
pub const DEFAULT_FALLBACK_RATE_PERCENT: u32 = 12;

/// how a listing's rate quote is turned into a single rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatePolicy {
    /// mean of the published bounds, or the single bound present
    AverageRange,
    /// the published rate, or the lower bound of a range
    DirectValue,
}

impl RatePolicy {
    /// built-in policy for a loan product
    pub fn default_for(product_type: ProductType) -> Self {
        match product_type {
            ProductType::CarLoan => RatePolicy::AverageRange,
            _ => RatePolicy::DirectValue,
        }
    }
}

/// rate chosen for a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRate {
    pub rate: Rate,
    /// true when the rate is the assumed fallback rather than published data
    pub was_fallback: bool,
}

impl ResolvedRate {
    pub fn published(rate: Rate) -> Self {
        Self { rate, was_fallback: false }
    }

    pub fn fallback(rate: Rate) -> Self {
        Self { rate, was_fallback: true }
    }

    /// the rate as a percentage, `None` when it was only assumed
    pub fn published_percent(&self) -> Option<rust_decimal::Decimal> {
        (!self.was_fallback).then(|| self.rate.as_percentage())
    }
}

/// per-product rate resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateResolver {
    fallback_rate: Rate,
    policies: BTreeMap<ProductType, RatePolicy>,
    default_policy: RatePolicy,
}

impl RateResolver {
    pub fn new(fallback_rate: Rate) -> Self {
        Self {
            fallback_rate,
            policies: BTreeMap::new(),
            default_policy: RatePolicy::DirectValue,
        }
    }

    pub fn with_policy(mut self, product_type: ProductType, policy: RatePolicy) -> Self {
        self.policies.insert(product_type, policy);
        self
    }

    pub fn with_policies(mut self, policies: BTreeMap<ProductType, RatePolicy>) -> Self {
        self.policies.extend(policies);
        self
    }

    pub fn fallback_rate(&self) -> Rate {
        self.fallback_rate
    }

    pub fn policy_for(&self, product_type: ProductType) -> RatePolicy {
        self.policies
            .get(&product_type)
            .copied()
            .unwrap_or(self.default_policy)
    }

    /// rate to compute repayments with, flagging when the fallback was used
    pub fn resolve(&self, offer: &LoanOffer) -> ResolvedRate {
        let policy = self.policy_for(offer.product_type);
        let resolved = resolve_rate(offer, policy, self.fallback_rate);
        if resolved.was_fallback {
            debug!(
                offer_id = %offer.id,
                lender = %offer.lender,
                fallback = %resolved.rate,
                "no usable rate published, applying fallback"
            );
        }
        resolved
    }
}

impl Default for RateResolver {
    fn default() -> Self {
        Self::new(Rate::from_percentage(DEFAULT_FALLBACK_RATE_PERCENT)).with_policies(default_policies())
    }
}

/// built-in policy for every loan product
pub fn default_policies() -> BTreeMap<ProductType, RatePolicy> {
    [ProductType::HomeLoan, ProductType::CarLoan, ProductType::PersonalLoan]
        .into_iter()
        .map(|product_type| (product_type, RatePolicy::default_for(product_type)))
        .collect()
}

/// apply a policy to a listing's quote
///
/// A zero or absent rate is treated as unpublished and yields the fallback.
pub fn resolve_rate(offer: &LoanOffer, policy: RatePolicy, fallback: Rate) -> ResolvedRate {
    let quote = &offer.rate;
    let usable = |r: Option<Rate>| r.filter(|rate| !rate.is_zero());

    let chosen = match policy {
        RatePolicy::AverageRange => match (usable(quote.rate_min), usable(quote.rate_max)) {
            (Some(min), Some(max)) => Some(min.midpoint(max)),
            (Some(bound), None) | (None, Some(bound)) => Some(bound),
            (None, None) => usable(quote.rate),
        },
        RatePolicy::DirectValue => usable(quote.rate)
            .or_else(|| usable(quote.rate_min))
            .or_else(|| usable(quote.rate_max)),
    };

    match chosen {
        Some(rate) => ResolvedRate::published(rate),
        None => ResolvedRate::fallback(fallback),
    }
}
