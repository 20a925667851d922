use thiserror::Error;

use crate::decimal::{Money, Rate};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompareError {
    #[error("invalid principal: {principal} (must be greater than zero)")]
    InvalidPrincipal {
        principal: Money,
    },

    #[error("invalid term: {months} months (must be between 1 and 600 months)")]
    InvalidTerm {
        months: u32,
    },

    #[error("installment for {principal} over {months} months rounds to zero")]
    InstallmentTooSmall {
        principal: Money,
        months: u32,
    },

    #[error("invalid interest rate: {rate}")]
    InvalidInterestRate {
        rate: Rate,
    },

    #[error("invalid down payment: {percent}% (must be in [0, 100))")]
    InvalidDownPayment {
        percent: rust_decimal::Decimal,
    },

    #[error("malformed number in {field}: {input:?}")]
    MalformedNumber {
        field: String,
        input: String,
    },

    #[error("invalid rate range: min {min} exceeds max {max}")]
    InvalidRateRange {
        min: Rate,
        max: Rate,
    },

    #[error("invalid {field} bounds: min {min} exceeds max {max}")]
    InvalidBounds {
        field: String,
        min: String,
        max: String,
    },

    #[error("invalid quality score: {score} (must be in [0, 10])")]
    InvalidScore {
        score: rust_decimal::Decimal,
    },

    #[error("unknown filter bucket {bucket:?} in category {category:?}")]
    UnknownBucket {
        category: String,
        bucket: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("calculation error: {message}")]
    CalculationError {
        message: String,
    },

    #[error("failed to fetch {collection} after {attempts} attempt(s): {message}")]
    DataFetchFailure {
        collection: String,
        attempts: u32,
        message: String,
    },

    #[error("failed to decode {collection} row: {message}")]
    Decode {
        collection: String,
        message: String,
    },
}

impl CompareError {
    /// whether the error comes from user-supplied calculator input
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            CompareError::InvalidPrincipal { .. }
                | CompareError::InvalidTerm { .. }
                | CompareError::InstallmentTooSmall { .. }
                | CompareError::InvalidInterestRate { .. }
                | CompareError::InvalidDownPayment { .. }
                | CompareError::MalformedNumber { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CompareError>;
