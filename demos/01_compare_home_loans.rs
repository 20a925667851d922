/// compare home loans - rank listings and pick winners for two selected offers
use loan_compare_rs::{
    CalculatorInput, ComparisonRanker, ComparisonReport, ComparisonSelection, EngineConfig,
    LoanOffer, Metric, Money, ProductType, RankContext, Rate, SelectionOutcome, Term,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== compare home loans ===\n");

    let offers = vec![
        LoanOffer::builder()
            .lender("Harbour Bank")
            .product_type(ProductType::HomeLoan)
            .rate(Rate::from_percent(dec!(6.19)))
            .comparison_rate(Rate::from_percent(dec!(6.31)))
            .application_fee(Money::from_major(600))
            .max_lvr(Rate::from_percentage(80))
            .score(dec!(8.4))
            .build()?,
        LoanOffer::builder()
            .lender("Summit Mutual")
            .product_type(ProductType::HomeLoan)
            .rate(Rate::from_percent(dec!(5.99)))
            .annual_fee(Money::from_major(395))
            .max_lvr(Rate::from_percentage(90))
            .score(dec!(7.9))
            .build()?,
        // publishes no rate; priced at the fallback rate
        LoanOffer::builder()
            .lender("Quiet Credit Union")
            .product_type(ProductType::HomeLoan)
            .build()?,
    ];

    let config = EngineConfig::default();
    let input = CalculatorInput::new(Money::from_major(650_000), Term::years(30))
        .with_down_payment(dec!(20));
    let ranker = ComparisonRanker::new(RankContext::from_config(&config).with_input(input));

    println!("cheapest monthly repayment first:");
    for offer in ranker.best_for(&offers, Metric::MonthlyPayment) {
        let repayment = ranker.context().offer_repayment(offer);
        match repayment {
            Some(r) if r.rate.was_fallback => {
                println!("  {:<20} ${} (assumed {})", offer.lender, r.repayment.monthly_payment, r.rate.rate)
            }
            Some(r) => println!("  {:<20} ${}", offer.lender, r.repayment.monthly_payment),
            None => println!("  {:<20} n/a", offer.lender),
        }
    }

    // the compare tray holds two offers
    let mut selection = ComparisonSelection::from_config(&config);
    for offer in &offers {
        if selection.add(offer.id) == SelectionOutcome::Rejected {
            println!("\ncompare tray full, skipped {}", offer.lender);
        }
    }

    let report = ComparisonReport::build(&ranker, &selection, &offers, &Metric::ALL);
    println!("\nwinners:");
    for winner in &report.winners {
        let lender = winner
            .winner
            .and_then(|id| offers.iter().find(|o| o.id == id))
            .map(|o| o.lender.as_str())
            .unwrap_or("-");
        println!("  {:<18} {}", winner.metric.label(), lender);
    }

    Ok(())
}
