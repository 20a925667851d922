/// fetch and filter - load listings through a retrying source, then narrow them
use chrono::{TimeZone, Utc};
use loan_compare_rs::source::fetch_records;
use loan_compare_rs::{
    apply, FetchState, FetchTracker, FilterCatalog, FilterCriteria, InMemorySource, LoanOffer,
    ProductType, Query, RetryConfig, RetryingSource, SafeTimeProvider, SortDirection, TimeSource,
};
use tracing_subscriber::EnvFilter;

const PERSONAL_LOANS: &str = r#"[
    { "id": "6f1c2a9e-2b7d-4c3e-9a51-0d8e7f6a5b41", "lender": "Brightside", "product_type": "personal_loan",
      "rate": 7.49, "max_amount": 50000, "recommended": true },
    { "id": "9a3e5c7b-1d2f-4e6a-8b9c-0f1e2d3c4b5a", "lender": "Oakridge", "product_type": "personal_loan",
      "rate_min": 9.9, "rate_max": 18.9, "max_amount": 70000 },
    { "id": "2c4e6a8b-0d1f-4a3c-9e5b-7d9f1b3d5f7a", "lender": "Lantern", "product_type": "personal_loan",
      "max_amount": 30000, "application_fee": 0 }
]"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap()
    ));

    let collection = ProductType::PersonalLoan.collection();
    let backend = InMemorySource::new().with_json(collection, PERSONAL_LOANS)?;
    let source = RetryingSource::new(backend, RetryConfig::default());

    let mut tracker = FetchTracker::new();
    let request = tracker.begin();
    let query = Query::collection(collection).order_by("rate", SortDirection::Asc);
    let result = fetch_records::<LoanOffer, _>(&source, &query);
    tracker.complete(request, result, &time);

    let offers = match tracker.state() {
        FetchState::Loaded(snapshot) => {
            println!("{} offers as of {}", snapshot.records.len(), snapshot.fetched_at.format("%Y-%m-%d %H:%M"));
            snapshot.records.clone()
        }
        FetchState::Failed { message, .. } => return Err(message.clone().into()),
        _ => Vec::new(),
    };

    let catalog = FilterCatalog::for_product(ProductType::PersonalLoan);
    let criteria = FilterCriteria::new();
    let criteria = catalog.toggle(&criteria, "interest_rate", "under-8")?;
    let criteria = catalog.toggle(&criteria, "interest_rate", "8-12")?;
    let criteria = catalog.toggle(&criteria, "features", "recommended")?;

    println!("\n{} filter(s) active:", criteria.active_count());
    for offer in apply(&offers, &criteria) {
        println!("  {}", offer.lender);
    }

    println!("\nafter clear all:");
    for offer in apply(&offers, &criteria.clear_all()) {
        println!("  {}", offer.lender);
    }

    Ok(())
}
