/// quick start - monthly repayment for a single loan
use loan_compare_rs::{AmortizationCalculator, CalculatorInput, Rate};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // $500,000 over 5 years, as typed into the calculator
    let input = CalculatorInput::parse("$500,000", "5", None)?;

    let calc = AmortizationCalculator::new();
    let result = calc.repayment(&input, Rate::from_percent(dec!(7.5)))?;

    println!("monthly payment: ${}", result.monthly_payment);
    println!("total payment:   ${}", result.total_payment);
    println!("total interest:  ${}", result.total_interest);

    // first few rows of the schedule
    let schedule = calc.schedule(input.financed_principal()?, result.annual_rate, input.term)?;
    for payment in schedule.payments.iter().take(3) {
        println!(
            "#{:>2} principal ${} interest ${} balance ${}",
            payment.payment_number,
            payment.principal_portion,
            payment.interest_portion,
            payment.ending_balance
        );
    }

    Ok(())
}
