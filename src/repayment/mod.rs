pub mod amortization;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::decimal::{Money, Rate, Term};
use crate::errors::{CompareError, Result};

pub use amortization::{AmortizationCalculator, AmortizationSchedule, ScheduledPayment};

/// longest term the calculator accepts (50 years)
pub const MAX_TERM_MONTHS: u32 = 600;

/// user-entered calculator state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalculatorInput {
    pub principal: Money,
    pub term: Term,
    /// percentage of the price paid up front (home loans)
    pub down_payment_percent: Option<Decimal>,
}

impl CalculatorInput {
    pub fn new(principal: Money, term: Term) -> Self {
        Self {
            principal,
            term,
            down_payment_percent: None,
        }
    }

    pub fn with_down_payment(mut self, percent: Decimal) -> Self {
        self.down_payment_percent = Some(percent);
        self
    }

    /// parse the raw text fields of a calculator form
    ///
    /// Grouping separators, surrounding whitespace and a leading currency
    /// symbol are tolerated; the term is given in years and may be fractional
    /// as long as it lands on whole months.
    pub fn parse(principal: &str, term_years: &str, down_payment_percent: Option<&str>) -> Result<Self> {
        let principal = Money::from_decimal(parse_number("principal", principal)?);

        let years = parse_number("term", term_years)?;
        let months = (years * dec!(12))
            .to_u32()
            .filter(|m| Decimal::from(*m) == years * dec!(12))
            .ok_or_else(|| CompareError::MalformedNumber {
                field: "term".to_string(),
                input: term_years.to_string(),
            })?;

        let down_payment_percent = down_payment_percent
            .map(|text| parse_number("down_payment", text))
            .transpose()?;

        let input = Self {
            principal,
            term: Term::months(months),
            down_payment_percent,
        };
        input.validate()?;
        Ok(input)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.principal.is_positive() {
            return Err(CompareError::InvalidPrincipal { principal: self.principal });
        }
        if self.term.is_zero() || self.term.num_payments() > MAX_TERM_MONTHS {
            return Err(CompareError::InvalidTerm { months: self.term.num_payments() });
        }
        if let Some(percent) = self.down_payment_percent {
            if percent < Decimal::ZERO || percent >= dec!(100) {
                return Err(CompareError::InvalidDownPayment { percent });
            }
        }
        Ok(())
    }

    /// amount actually borrowed once the down payment is taken off
    pub fn financed_principal(&self) -> Result<Money> {
        self.validate()?;
        Ok(match self.down_payment_percent {
            Some(percent) => self.principal - self.principal.percentage(percent),
            None => self.principal,
        })
    }
}

fn parse_number(field: &str, text: &str) -> Result<Decimal> {
    let cleaned: String = text
        .trim()
        .trim_start_matches(&['$', '₹', '£', '€'][..])
        .chars()
        .filter(|c| *c != ',' && *c != '_' && !c.is_whitespace())
        .collect();

    Decimal::from_str(&cleaned).map_err(|_| CompareError::MalformedNumber {
        field: field.to_string(),
        input: text.to_string(),
    })
}

/// derived repayment figures, all monetary values rounded to cents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepaymentResult {
    /// amount financed
    pub principal: Money,
    pub annual_rate: Rate,
    pub num_payments: u32,
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_payment: Money,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_form_text() {
        let input = CalculatorInput::parse(" $500,000 ", "5", None).unwrap();
        assert_eq!(input.principal, Money::from_major(500_000));
        assert_eq!(input.term, Term::years(5));
        assert_eq!(input.down_payment_percent, None);

        let input = CalculatorInput::parse("250000", "2.5", Some("20")).unwrap();
        assert_eq!(input.term, Term::months(30));
        assert_eq!(input.down_payment_percent, Some(dec!(20)));
    }

    #[test]
    fn test_parse_rejects_malformed_text() {
        let err = CalculatorInput::parse("12abc", "5", None).unwrap_err();
        assert!(matches!(err, CompareError::MalformedNumber { ref field, .. } if field == "principal"));
        assert!(err.is_invalid_input());

        assert!(matches!(
            CalculatorInput::parse("1000", "", None),
            Err(CompareError::MalformedNumber { .. })
        ));
        assert!(matches!(
            CalculatorInput::parse("1000", "1.01", None),
            Err(CompareError::MalformedNumber { .. })
        ));
        assert!(matches!(
            CalculatorInput::parse("1000", "-2", None),
            Err(CompareError::MalformedNumber { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_nonsense_values() {
        assert!(matches!(
            CalculatorInput::parse("-1000", "5", None),
            Err(CompareError::InvalidPrincipal { .. })
        ));
        assert!(matches!(
            CalculatorInput::parse("1000", "0", None),
            Err(CompareError::InvalidTerm { .. })
        ));
        assert!(matches!(
            CalculatorInput::parse("1000", "300000000", None),
            Err(CompareError::InvalidTerm { .. })
        ));
        assert!(matches!(
            CalculatorInput::parse("1000", "50.5", None),
            Err(CompareError::InvalidTerm { months: 606 })
        ));
        assert!(CalculatorInput::parse("1000", "50", None).is_ok());
        assert!(matches!(
            CalculatorInput::parse("1000", "5", Some("100")),
            Err(CompareError::InvalidDownPayment { .. })
        ));
    }

    #[test]
    fn test_down_payment_reduces_financed_amount() {
        let input = CalculatorInput::new(Money::from_major(600_000), Term::years(30))
            .with_down_payment(dec!(20));
        assert_eq!(input.financed_principal().unwrap(), Money::from_major(480_000));

        let calc = AmortizationCalculator::new();
        let with_deposit = calc.repayment(&input, Rate::from_percentage(6)).unwrap();
        let without = calc
            .repayment(&CalculatorInput::new(Money::from_major(600_000), Term::years(30)), Rate::from_percentage(6))
            .unwrap();

        assert_eq!(with_deposit.principal, Money::from_major(480_000));
        assert!(with_deposit.monthly_payment < without.monthly_payment);
    }
}
