use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate, Term};
use crate::errors::{CompareError, Result};
use crate::repayment::{CalculatorInput, RepaymentResult, MAX_TERM_MONTHS};

/// scheduled payment in amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledPayment {
    pub payment_number: u32,
    pub beginning_balance: Money,
    pub payment_amount: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub ending_balance: Money,
    pub cumulative_interest: Money,
}

/// month-by-month amortization schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub principal: Money,
    pub interest_rate: Rate,
    pub term: Term,
    pub payments: Vec<ScheduledPayment>,
    pub total_interest: Money,
    pub total_payment: Money,
}

impl AmortizationSchedule {
    /// get payment for specific period (1-indexed)
    pub fn get_payment(&self, payment_number: u32) -> Option<&ScheduledPayment> {
        payment_number
            .checked_sub(1)
            .and_then(|i| self.payments.get(i as usize))
    }

    /// remaining balance after payment
    pub fn balance_after_payment(&self, payment_number: u32) -> Money {
        self.get_payment(payment_number)
            .map(|p| p.ending_balance)
            .unwrap_or(self.principal)
    }
}

/// fixed-rate equal-installment (EMI) calculator
#[derive(Debug, Clone, Copy, Default)]
pub struct AmortizationCalculator;

impl AmortizationCalculator {
    pub fn new() -> Self {
        Self
    }

    /// monthly installment rounded to cents
    pub fn monthly_payment(&self, principal: Money, annual_rate: Rate, term: Term) -> Result<Money> {
        validate(principal, annual_rate, term)?;
        let emi = raw_installment(principal.as_decimal(), annual_rate, term.num_payments())?;
        let emi = Money::from_decimal(emi).round_cents();
        if !emi.is_positive() {
            return Err(CompareError::InstallmentTooSmall {
                principal,
                months: term.num_payments(),
            });
        }
        Ok(emi)
    }

    /// total of all installments over the term
    pub fn total_payment(&self, principal: Money, annual_rate: Rate, term: Term) -> Result<Money> {
        Ok(self.calculate(principal, annual_rate, term)?.total_payment)
    }

    /// total payment less the principal borrowed
    pub fn total_interest(&self, principal: Money, annual_rate: Rate, term: Term) -> Result<Money> {
        Ok(self.calculate(principal, annual_rate, term)?.total_interest)
    }

    /// installment and totals for a principal/rate/term triple
    ///
    /// Totals are derived from the rounded installment, so
    /// `monthly_payment * num_payments == total_payment` holds exactly.
    pub fn calculate(&self, principal: Money, annual_rate: Rate, term: Term) -> Result<RepaymentResult> {
        let monthly_payment = self.monthly_payment(principal, annual_rate, term)?;
        let num_payments = term.num_payments();
        let total_payment = (monthly_payment * Decimal::from(num_payments)).round_cents();
        let total_interest = (total_payment - principal).round_cents();

        Ok(RepaymentResult {
            principal,
            annual_rate,
            num_payments,
            monthly_payment,
            total_interest,
            total_payment,
        })
    }

    /// repayment for calculator input, after any down payment
    pub fn repayment(&self, input: &CalculatorInput, annual_rate: Rate) -> Result<RepaymentResult> {
        let financed = input.financed_principal()?;
        self.calculate(financed, annual_rate, input.term)
    }

    /// full equal-installment schedule
    pub fn schedule(&self, principal: Money, annual_rate: Rate, term: Term) -> Result<AmortizationSchedule> {
        let emi = self.monthly_payment(principal, annual_rate, term)?;
        let monthly_rate = annual_rate.monthly_rate().as_decimal();
        let term_months = term.num_payments();

        let mut payments = Vec::with_capacity(term_months as usize);
        let mut balance = principal;
        let mut cumulative_interest = Money::ZERO;

        for i in 1..=term_months {
            let interest_portion = Money::from_decimal(balance.as_decimal() * monthly_rate).round_cents();
            let is_last = i == term_months;

            // last installment clears whatever rounding left on the balance
            let principal_portion = if is_last {
                balance
            } else {
                (emi - interest_portion).min(balance)
            };
            let payment_amount = principal_portion + interest_portion;
            let ending_balance = (balance - principal_portion).max(Money::ZERO);

            cumulative_interest += interest_portion;

            payments.push(ScheduledPayment {
                payment_number: i,
                beginning_balance: balance,
                payment_amount,
                principal_portion,
                interest_portion,
                ending_balance,
                cumulative_interest,
            });

            balance = ending_balance;
        }

        let total_payment = payments.iter().map(|p| p.payment_amount).sum();

        Ok(AmortizationSchedule {
            principal,
            interest_rate: annual_rate,
            term,
            payments,
            total_interest: cumulative_interest,
            total_payment,
        })
    }
}

fn validate(principal: Money, annual_rate: Rate, term: Term) -> Result<()> {
    if !principal.is_positive() {
        return Err(CompareError::InvalidPrincipal { principal });
    }
    if term.is_zero() || term.num_payments() > MAX_TERM_MONTHS {
        return Err(CompareError::InvalidTerm { months: term.num_payments() });
    }
    if annual_rate.is_negative() {
        return Err(CompareError::InvalidInterestRate { rate: annual_rate });
    }
    Ok(())
}

/// unrounded installment
///
/// EMI = P * r * (1 + r)^n / ((1 + r)^n - 1), or P / n when r is zero
pub(crate) fn raw_installment(principal: Decimal, annual_rate: Rate, months: u32) -> Result<Decimal> {
    let r = annual_rate.as_decimal() / dec!(12);
    let n = Decimal::from(months);

    if r.is_zero() {
        return Ok(principal / n);
    }

    let base = Decimal::ONE + r;
    let mut compound = Decimal::ONE;
    for _ in 0..months {
        compound = compound.checked_mul(base).ok_or_else(|| CompareError::CalculationError {
            message: format!("compound factor overflow at rate {} over {} months", annual_rate, months),
        })?;
    }

    let denominator = compound - Decimal::ONE;
    if denominator.is_zero() {
        // rate too small to register at decimal precision
        return Ok(principal / n);
    }

    principal
        .checked_mul(r)
        .and_then(|x| x.checked_mul(compound))
        .and_then(|x| x.checked_div(denominator))
        .ok_or_else(|| CompareError::CalculationError {
            message: format!("installment overflow for principal {}", principal),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_monthly_payment() {
        let calc = AmortizationCalculator::new();
        let result = calc
            .calculate(Money::from_major(500_000), Rate::from_percent(dec!(7.5)), Term::years(5))
            .unwrap();

        assert_eq!(result.monthly_payment.to_string(), "10018.97");
        assert_eq!(result.total_payment.to_string(), "601138.20");
        assert_eq!(result.total_interest.to_string(), "101138.20");
        assert_eq!(result.num_payments, 60);
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let raw = raw_installment(dec!(100000), Rate::ZERO, 24).unwrap();
        assert_eq!(raw, dec!(100000) / dec!(24));

        let calc = AmortizationCalculator::new();
        let emi = calc.monthly_payment(Money::from_major(100_000), Rate::ZERO, Term::years(2)).unwrap();
        assert_eq!(emi.to_string(), "4166.67");
    }

    #[test]
    fn test_totals_consistent_with_installment() {
        let calc = AmortizationCalculator::new();
        let result = calc
            .calculate(Money::from_major(25_000), Rate::from_percentage(12), Term::months(36))
            .unwrap();

        assert_eq!(result.monthly_payment * dec!(36), result.total_payment);
        assert_eq!(result.total_payment - Money::from_major(25_000), result.total_interest);
        assert_eq!(
            calc.total_interest(Money::from_major(25_000), Rate::from_percentage(12), Term::months(36)).unwrap(),
            result.total_interest
        );
    }

    #[test]
    fn test_rejects_invalid_input() {
        let calc = AmortizationCalculator::new();
        let rate = Rate::from_percentage(10);

        assert!(matches!(
            calc.monthly_payment(Money::ZERO, rate, Term::years(1)),
            Err(CompareError::InvalidPrincipal { .. })
        ));
        assert!(matches!(
            calc.monthly_payment(Money::from_major(-5), rate, Term::years(1)),
            Err(CompareError::InvalidPrincipal { .. })
        ));
        assert!(matches!(
            calc.monthly_payment(Money::from_major(1_000), rate, Term::months(0)),
            Err(CompareError::InvalidTerm { months: 0 })
        ));
        assert!(matches!(
            calc.monthly_payment(Money::from_major(1_000), Rate::from_percent(dec!(-1)), Term::years(1)),
            Err(CompareError::InvalidInterestRate { .. })
        ));
    }

    #[test]
    fn test_rejects_terms_beyond_fifty_years() {
        let calc = AmortizationCalculator::new();
        let principal = Money::from_major(1_000);

        assert!(calc.monthly_payment(principal, Rate::from_bps(1), Term::months(600)).is_ok());
        assert!(matches!(
            calc.monthly_payment(principal, Rate::from_bps(1), Term::months(50_000_000)),
            Err(CompareError::InvalidTerm { months: 50_000_000 })
        ));
        assert!(matches!(
            calc.schedule(principal, Rate::ZERO, Term::months(u32::MAX)),
            Err(CompareError::InvalidTerm { .. })
        ));
    }

    #[test]
    fn test_installment_rounding_to_zero_is_rejected() {
        let calc = AmortizationCalculator::new();

        let err = calc
            .calculate(Money::from_major(1), Rate::ZERO, Term::years(30))
            .unwrap_err();
        assert_eq!(err, CompareError::InstallmentTooSmall { principal: Money::from_major(1), months: 360 });
        assert!(err.is_invalid_input());

        // one cent a month is still a real installment
        let emi = calc.monthly_payment(Money::from_decimal(dec!(3.60)), Rate::ZERO, Term::years(30)).unwrap();
        assert_eq!(emi, Money::from_minor(1));
    }

    #[test]
    fn test_equal_installments_schedule() {
        let calc = AmortizationCalculator::new();
        let principal = Money::from_major(100_000);
        let schedule = calc.schedule(principal, Rate::from_percentage(12), Term::months(12)).unwrap();

        assert_eq!(schedule.payments.len(), 12);

        let first = schedule.get_payment(1).unwrap();
        assert_eq!(first.beginning_balance, principal);
        assert_eq!(first.interest_portion, Money::from_major(1_000));

        let last = schedule.get_payment(12).unwrap();
        assert_eq!(last.ending_balance, Money::ZERO);

        // all but the last installment equal the EMI
        let emi = calc.monthly_payment(principal, Rate::from_percentage(12), Term::months(12)).unwrap();
        for payment in &schedule.payments[..11] {
            assert_eq!(payment.payment_amount, emi);
        }
        assert!((last.payment_amount - emi).abs() < Money::ONE);

        let repaid: Money = schedule.payments.iter().map(|p| p.principal_portion).sum();
        assert_eq!(repaid, principal);
        assert_eq!(schedule.total_payment, principal + schedule.total_interest);
    }

    #[test]
    fn test_interest_declines_over_schedule() {
        let calc = AmortizationCalculator::new();
        let schedule = calc
            .schedule(Money::from_major(300_000), Rate::from_percent(dec!(6.25)), Term::years(25))
            .unwrap();

        for i in 1..schedule.payments.len() {
            assert!(schedule.payments[i].interest_portion <= schedule.payments[i - 1].interest_portion);
        }
        assert_eq!(schedule.balance_after_payment(300), Money::ZERO);
        assert_eq!(schedule.balance_after_payment(0), Money::from_major(300_000));
    }

    #[test]
    fn test_zero_rate_schedule_has_no_interest() {
        let calc = AmortizationCalculator::new();
        let schedule = calc.schedule(Money::from_major(1_200), Rate::ZERO, Term::years(1)).unwrap();

        assert_eq!(schedule.total_interest, Money::ZERO);
        assert!(schedule.payments.iter().all(|p| p.payment_amount == Money::from_major(100)));
    }
}
