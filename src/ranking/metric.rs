use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Preference;

/// quantity records can be sorted and compared on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    NominalRate,
    ComparisonRate,
    ApplicationFee,
    /// recurring fees normalised to a year
    OngoingFee,
    MaxLvr,
    MaxTerm,
    QualityScore,
    /// derived, needs calculator input for loans
    MonthlyPayment,
    /// derived, needs calculator input for loans and accounts
    TotalCost,
}

impl Metric {
    pub const ALL: [Metric; 9] = [
        Metric::NominalRate,
        Metric::ComparisonRate,
        Metric::ApplicationFee,
        Metric::OngoingFee,
        Metric::MaxLvr,
        Metric::MaxTerm,
        Metric::QualityScore,
        Metric::MonthlyPayment,
        Metric::TotalCost,
    ];

    pub fn preference(&self) -> Preference {
        match self {
            Metric::NominalRate
            | Metric::ComparisonRate
            | Metric::ApplicationFee
            | Metric::OngoingFee
            | Metric::MonthlyPayment
            | Metric::TotalCost => Preference::LowerIsBetter,
            Metric::MaxLvr | Metric::MaxTerm | Metric::QualityScore => Preference::HigherIsBetter,
        }
    }

    pub fn is_derived(&self) -> bool {
        matches!(self, Metric::MonthlyPayment | Metric::TotalCost)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::NominalRate => "Interest rate",
            Metric::ComparisonRate => "Comparison rate",
            Metric::ApplicationFee => "Application fee",
            Metric::OngoingFee => "Ongoing fees (p.a.)",
            Metric::MaxLvr => "Max LVR",
            Metric::MaxTerm => "Max term",
            Metric::QualityScore => "Rating",
            Metric::MonthlyPayment => "Monthly repayment",
            Metric::TotalCost => "Total cost",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
