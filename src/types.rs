use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// unique identifier for a fetched record (loan offer, account, plan)
pub type OfferId = Uuid;

/// product categories listed on the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    HomeLoan,
    CarLoan,
    PersonalLoan,
    BankAccount,
    Broadband,
}

impl ProductType {
    /// remote collection the rows are fetched from
    pub fn collection(&self) -> &'static str {
        match self {
            ProductType::HomeLoan => "home_loans",
            ProductType::CarLoan => "car_loans",
            ProductType::PersonalLoan => "personal_loans",
            ProductType::BankAccount => "bank_accounts",
            ProductType::Broadband => "broadband_plans",
        }
    }

    pub fn is_loan(&self) -> bool {
        matches!(
            self,
            ProductType::HomeLoan | ProductType::CarLoan | ProductType::PersonalLoan
        )
    }
}

/// ordering direction for sort-by-column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// which end of a metric's scale wins a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preference {
    LowerIsBetter,
    HigherIsBetter,
}

impl Preference {
    /// sort direction that puts the best value first
    pub fn best_first(self) -> SortDirection {
        match self {
            Preference::LowerIsBetter => SortDirection::Asc,
            Preference::HigherIsBetter => SortDirection::Desc,
        }
    }

    /// whether `candidate` strictly beats `incumbent`
    pub fn prefers<T: PartialOrd>(self, candidate: &T, incumbent: &T) -> bool {
        match self {
            Preference::LowerIsBetter => candidate < incumbent,
            Preference::HigherIsBetter => candidate > incumbent,
        }
    }
}
