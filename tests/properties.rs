use loan_compare_rs::{
    apply, matches, AmortizationCalculator, Bucket, ComparisonRanker, FilterCriteria, LoanOffer,
    Metric, Money, ProductType, Rate, RateResolver, SortDirection, Term,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn offer(index: usize, rate_bps: Option<u32>) -> LoanOffer {
    let builder = LoanOffer::builder()
        .lender(format!("lender-{}", index))
        .product_type(ProductType::HomeLoan);
    let builder = match rate_bps {
        Some(bps) => builder.rate(Rate::from_bps(bps)),
        None => builder,
    };
    builder.build().unwrap()
}

fn ids(ranked: &[&LoanOffer]) -> Vec<uuid::Uuid> {
    ranked.iter().map(|o| o.id).collect()
}

#[test]
fn test_home_loan_worked_example() {
    let calc = AmortizationCalculator::new();
    let result = calc
        .calculate(Money::from_major(500_000), Rate::from_percent(dec!(7.5)), Term::years(5))
        .unwrap();

    assert_eq!(result.monthly_payment, Money::from_decimal(dec!(10018.97)));
    assert_eq!(result.total_payment, Money::from_decimal(dec!(601138.20)));
    assert_eq!(result.total_interest, Money::from_decimal(dec!(101138.20)));
}

#[test]
fn test_interest_free_worked_example() {
    let calc = AmortizationCalculator::new();
    let monthly = calc
        .monthly_payment(Money::from_major(100_000), Rate::from_percentage(0), Term::years(2))
        .unwrap();
    assert_eq!(monthly, Money::from_decimal(dec!(4166.67)));
}

#[test]
fn test_car_loan_range_is_averaged() {
    let offer = LoanOffer::builder()
        .lender("ranged")
        .product_type(ProductType::CarLoan)
        .rate_range(Rate::from_percentage(8), Rate::from_percentage(12))
        .build()
        .unwrap();
    let resolved = RateResolver::default().resolve(&offer);

    assert_eq!(resolved.rate.as_percentage(), dec!(10));
    assert!(!resolved.was_fallback);
}

proptest! {
    #[test]
    fn prop_total_is_installment_times_payments(
        principal in 1_000i64..5_000_000,
        rate_bps in 0u32..3_000,
        years in 1u32..=30,
    ) {
        let calc = AmortizationCalculator::new();
        let result = calc
            .calculate(Money::from_major(principal), Rate::from_bps(rate_bps), Term::years(years))
            .unwrap();

        prop_assert!(result.monthly_payment.is_positive());
        prop_assert_eq!(
            result.monthly_payment * Decimal::from(years * 12),
            result.total_payment
        );
        prop_assert_eq!(
            result.total_payment - Money::from_major(principal),
            result.total_interest
        );
    }

    #[test]
    fn prop_zero_rate_is_principal_over_payments(
        principal in 1_000i64..5_000_000,
        months in 1u32..=360,
    ) {
        let calc = AmortizationCalculator::new();
        let monthly = calc
            .monthly_payment(Money::from_major(principal), Rate::from_percentage(0), Term::months(months))
            .unwrap();
        let expected = (Money::from_major(principal) / Decimal::from(months)).round_cents();
        prop_assert_eq!(monthly, expected);
    }

    #[test]
    fn prop_higher_rate_never_lowers_payment(
        principal in 1_000i64..2_000_000,
        low in 0u32..2_000,
        step in 1u32..1_000,
        years in 1u32..=30,
    ) {
        let calc = AmortizationCalculator::new();
        let principal = Money::from_major(principal);
        let cheap = calc.monthly_payment(principal, Rate::from_bps(low), Term::years(years)).unwrap();
        let dear = calc.monthly_payment(principal, Rate::from_bps(low + step), Term::years(years)).unwrap();
        prop_assert!(dear >= cheap);
    }

    #[test]
    fn prop_rank_is_idempotent(rates in prop::collection::vec(prop::option::of(100u32..2_500), 0..12)) {
        let offers: Vec<_> = rates.iter().enumerate().map(|(i, r)| offer(i, *r)).collect();
        let ranker = ComparisonRanker::default();

        let once = ranker.rank(&offers, Metric::NominalRate, SortDirection::Asc);
        let twice = ranker.rank(once.iter().copied(), Metric::NominalRate, SortDirection::Asc);
        prop_assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn prop_reversed_ascending_is_descending(
        rates in prop::collection::btree_set(100u32..2_500, 0..12),
    ) {
        let offers: Vec<_> = rates.iter().enumerate().map(|(i, r)| offer(i, Some(*r))).collect();
        let ranker = ComparisonRanker::default();

        let mut asc = ids(&ranker.rank(&offers, Metric::NominalRate, SortDirection::Asc));
        asc.reverse();
        let desc = ids(&ranker.rank(&offers, Metric::NominalRate, SortDirection::Desc));
        prop_assert_eq!(asc, desc);
    }

    #[test]
    fn prop_winner_is_no_worse_than_any_record(
        rates in prop::collection::vec(prop::option::of(100u32..2_500), 0..12),
    ) {
        let offers: Vec<_> = rates.iter().enumerate().map(|(i, r)| offer(i, *r)).collect();
        let ranker = ComparisonRanker::default();

        match ranker.winner(&offers, Metric::NominalRate) {
            Some(id) => {
                let winner = offers.iter().find(|o| o.id == id).unwrap();
                let best = winner.rate.headline().unwrap();
                for other in offers.iter().filter_map(|o| o.rate.headline()) {
                    prop_assert!(best <= other);
                }
                let first_best = offers.iter().find(|o| o.rate.headline() == Some(best)).unwrap();
                prop_assert_eq!(first_best.id, id);
            }
            None => prop_assert!(rates.iter().all(Option::is_none)),
        }
    }

    #[test]
    fn prop_empty_criteria_admits_everything(
        rates in prop::collection::vec(prop::option::of(100u32..2_500), 0..12),
    ) {
        let offers: Vec<_> = rates.iter().enumerate().map(|(i, r)| offer(i, *r)).collect();
        prop_assert_eq!(apply(&offers, &FilterCriteria::new()).len(), offers.len());
    }

    #[test]
    fn prop_range_bucket_excludes_outside_values(
        rates in prop::collection::vec(100u32..2_500, 0..12),
        lower in 0u32..20,
        width in 1u32..10,
    ) {
        let offers: Vec<_> = rates.iter().enumerate().map(|(i, r)| offer(i, Some(*r))).collect();
        let min = Decimal::from(lower);
        let max = Decimal::from(lower + width);
        let criteria = FilterCriteria::new()
            .toggle("interest_rate", Bucket::range("window", "interest_rate", min, Some(max)));

        for offer in &offers {
            let percent = offer.rate.headline().unwrap().as_percentage();
            prop_assert_eq!(matches(offer, &criteria), percent >= min && percent <= max);
        }
    }
}
