pub mod comparison;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod filter;
pub mod products;
pub mod ranking;
pub mod rates;
pub mod repayment;
pub mod source;
pub mod types;

// re-export key types
pub use comparison::{ComparisonReport, ComparisonSelection, MetricWinner, SelectionOutcome};
pub use config::{EngineConfig, RetryConfig};
pub use decimal::{Money, Rate, Term};
pub use errors::{CompareError, Result};
pub use filter::{apply, apply_offers, matches, Bucket, FilterCatalog, FilterCriteria, Filterable};
pub use products::{BankAccount, BroadbandPlan, FeeSchedule, LoanOffer, LoanOfferBuilder, RateQuote};
pub use ranking::{Comparable, ComparisonRanker, Metric, OfferRepayment, RankContext};
pub use rates::{default_policies, resolve_rate, RatePolicy, RateResolver, ResolvedRate};
pub use repayment::{
    AmortizationCalculator, AmortizationSchedule, CalculatorInput, RepaymentResult,
    ScheduledPayment,
};
pub use source::{
    fetch_records, FetchState, FetchTracker, InMemorySource, Query, RecordSource, RequestToken,
    RetryingSource, Snapshot, SourceRecord,
};
pub use types::{OfferId, Preference, ProductType, SortDirection};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
