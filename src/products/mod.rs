pub mod account;
pub mod broadband;
pub mod loan;

pub use account::BankAccount;
pub use broadband::BroadbandPlan;
pub use loan::{FeeSchedule, LoanOffer, LoanOfferBuilder, RateQuote};
