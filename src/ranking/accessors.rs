use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::products::{BankAccount, BroadbandPlan, LoanOffer};
use crate::ranking::{Comparable, Metric, RankContext};
use crate::types::OfferId;

impl Comparable for LoanOffer {
    fn record_id(&self) -> OfferId {
        self.id
    }

    fn metric_value(&self, metric: Metric, ctx: &RankContext) -> Option<Decimal> {
        match metric {
            Metric::NominalRate => ctx.resolver().resolve(self).published_percent(),
            Metric::ComparisonRate => self.comparison_rate.map(|r| r.as_percentage()),
            Metric::ApplicationFee => self.fees.application_fee.map(|m| m.as_decimal()),
            Metric::OngoingFee => self.fees.ongoing_annual().map(|m| m.as_decimal()),
            Metric::MaxLvr => self.max_lvr.map(|r| r.as_percentage()),
            Metric::MaxTerm => self.max_term_months.map(Decimal::from),
            Metric::QualityScore => self.score,
            Metric::MonthlyPayment => ctx
                .offer_repayment(self)
                .map(|q| q.repayment.monthly_payment.as_decimal()),
            Metric::TotalCost => ctx.offer_repayment(self).map(|q| q.total_cost.as_decimal()),
        }
    }
}

impl Comparable for BankAccount {
    fn record_id(&self) -> OfferId {
        self.id
    }

    // an account's interest rate is paid to the holder, so it is not ranked
    // under the lower-is-better rate metric; filter on it instead
    fn metric_value(&self, metric: Metric, ctx: &RankContext) -> Option<Decimal> {
        match metric {
            Metric::ApplicationFee => self.opening_fee.map(|m| m.as_decimal()),
            Metric::OngoingFee => self.monthly_fee.map(|m| m.as_decimal() * dec!(12)),
            Metric::QualityScore => self.score,
            Metric::TotalCost => ctx
                .input()
                .map(|input| self.cost_over(input.term.num_payments()).as_decimal()),
            Metric::NominalRate
            | Metric::ComparisonRate
            | Metric::MaxLvr
            | Metric::MaxTerm
            | Metric::MonthlyPayment => None,
        }
    }
}

impl Comparable for BroadbandPlan {
    fn record_id(&self) -> OfferId {
        self.id
    }

    fn metric_value(&self, metric: Metric, _ctx: &RankContext) -> Option<Decimal> {
        match metric {
            Metric::ApplicationFee => self.setup_fee.map(|m| m.as_decimal()),
            Metric::OngoingFee => Some(self.monthly_price.as_decimal() * dec!(12)),
            Metric::MonthlyPayment => Some(self.monthly_price.as_decimal()),
            Metric::TotalCost => Some(self.minimum_total_cost().as_decimal()),
            Metric::QualityScore => self.score,
            Metric::NominalRate
            | Metric::ComparisonRate
            | Metric::MaxLvr
            | Metric::MaxTerm => None,
        }
    }
}
