mod accessors;
pub mod metric;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::decimal::Money;
use crate::products::LoanOffer;
use crate::rates::{RateResolver, ResolvedRate};
use crate::repayment::{AmortizationCalculator, CalculatorInput, RepaymentResult};
use crate::types::{OfferId, SortDirection};

pub use metric::Metric;

/// record that exposes values for comparison metrics
pub trait Comparable {
    fn record_id(&self) -> OfferId;

    /// value of the metric, or `None` when the record lacks the underlying field
    fn metric_value(&self, metric: Metric, ctx: &RankContext) -> Option<Decimal>;
}

/// repayment figures for a loan listing under the current calculator input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OfferRepayment {
    pub offer_id: OfferId,
    pub rate: ResolvedRate,
    pub repayment: RepaymentResult,
    /// repayments plus one-time and recurring fees over the term
    pub total_cost: Money,
}

/// inputs derived metrics are computed from
#[derive(Debug, Clone)]
pub struct RankContext {
    input: Option<CalculatorInput>,
    resolver: RateResolver,
    calculator: AmortizationCalculator,
}

impl RankContext {
    pub fn new(resolver: RateResolver) -> Self {
        Self {
            input: None,
            resolver,
            calculator: AmortizationCalculator::new(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.rate_resolver())
    }

    pub fn with_input(mut self, input: CalculatorInput) -> Self {
        self.input = Some(input);
        self
    }

    pub fn input(&self) -> Option<&CalculatorInput> {
        self.input.as_ref()
    }

    pub fn resolver(&self) -> &RateResolver {
        &self.resolver
    }

    /// repayment for a listing, `None` without calculator input or when the
    /// input cannot be computed
    pub fn offer_repayment(&self, offer: &LoanOffer) -> Option<OfferRepayment> {
        let input = self.input.as_ref()?;
        let rate = self.resolver.resolve(offer);
        let repayment = self.calculator.repayment(input, rate.rate).ok()?;
        let total_cost = repayment.total_payment
            + offer.fees.upfront_total()
            + offer.fees.ongoing_over(repayment.num_payments);

        Some(OfferRepayment {
            offer_id: offer.id,
            rate,
            repayment,
            total_cost: total_cost.round_cents(),
        })
    }
}

impl Default for RankContext {
    fn default() -> Self {
        Self::new(RateResolver::default())
    }
}

/// orders records by a metric and picks per-metric winners
#[derive(Debug, Clone, Default)]
pub struct ComparisonRanker {
    ctx: RankContext,
}

impl ComparisonRanker {
    pub fn new(ctx: RankContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &RankContext {
        &self.ctx
    }

    /// stable ordering by metric; records without a value keep input order at the end
    pub fn rank<'r, T, I>(&self, records: I, metric: Metric, direction: SortDirection) -> Vec<&'r T>
    where
        T: Comparable + ?Sized + 'r,
        I: IntoIterator<Item = &'r T>,
    {
        let (mut valued, missing): (Vec<_>, Vec<_>) = records
            .into_iter()
            .map(|record| (record, record.metric_value(metric, &self.ctx)))
            .partition(|(_, value)| value.is_some());

        valued.sort_by(|(_, a), (_, b)| match direction {
            SortDirection::Asc => a.cmp(b),
            SortDirection::Desc => b.cmp(a),
        });

        debug!(
            %metric,
            ?direction,
            ranked = valued.len(),
            missing = missing.len(),
            "ranked records"
        );

        valued
            .into_iter()
            .chain(missing)
            .map(|(record, _)| record)
            .collect()
    }

    /// ordering with the metric's best value first
    pub fn best_for<'r, T, I>(&self, records: I, metric: Metric) -> Vec<&'r T>
    where
        T: Comparable + ?Sized + 'r,
        I: IntoIterator<Item = &'r T>,
    {
        self.rank(records, metric, metric.preference().best_first())
    }

    /// id of the best record for the metric; the first in input order wins ties
    pub fn winner<'r, T, I>(&self, records: I, metric: Metric) -> Option<OfferId>
    where
        T: Comparable + ?Sized + 'r,
        I: IntoIterator<Item = &'r T>,
    {
        let preference = metric.preference();
        let mut best: Option<(&T, Decimal)> = None;

        for record in records {
            let Some(value) = record.metric_value(metric, &self.ctx) else {
                continue;
            };
            let improves = match &best {
                Some((_, incumbent)) => preference.prefers(&value, incumbent),
                None => true,
            };
            if improves {
                best = Some((record, value));
            }
        }

        best.map(|(record, _)| record.record_id())
    }
}
