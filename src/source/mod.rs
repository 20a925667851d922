pub mod memory;
pub mod retry;
pub mod tracker;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::errors::{CompareError, Result};
use crate::products::{BankAccount, BroadbandPlan, LoanOffer};
use crate::types::SortDirection;

pub use memory::InMemorySource;
pub use retry::RetryingSource;
pub use tracker::{FetchState, FetchTracker, RequestToken, Snapshot};

/// raw row as returned by the data source
pub type Row = Value;

/// server-side ordering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

/// "select rows from collection, optionally ordered and filtered"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub collection: String,
    pub order_by: Option<OrderBy>,
    /// equality filters applied by the source
    pub filters: Vec<(String, Value)>,
}

impl Query {
    pub fn collection(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            order_by: None,
            filters: Vec::new(),
        }
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn filter_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }
}

/// remote table access
pub trait RecordSource {
    fn fetch_rows(&self, query: &Query) -> Result<Vec<Row>>;
}

impl<S: RecordSource + ?Sized> RecordSource for &S {
    fn fetch_rows(&self, query: &Query) -> Result<Vec<Row>> {
        (**self).fetch_rows(query)
    }
}

/// typed record that can be decoded from a source row
pub trait SourceRecord: DeserializeOwned {
    fn validate_record(&self) -> Result<()>;
}

impl SourceRecord for LoanOffer {
    fn validate_record(&self) -> Result<()> {
        self.validate()
    }
}

impl SourceRecord for BankAccount {
    fn validate_record(&self) -> Result<()> {
        self.validate()
    }
}

impl SourceRecord for BroadbandPlan {
    fn validate_record(&self) -> Result<()> {
        self.validate()
    }
}

/// fetch and decode rows; any undecodable or invalid row fails the load
pub fn fetch_records<T, S>(source: &S, query: &Query) -> Result<Vec<T>>
where
    T: SourceRecord,
    S: RecordSource + ?Sized,
{
    let rows = source.fetch_rows(query)?;
    let records = rows
        .into_iter()
        .map(|row| {
            let record: T = serde_json::from_value(row).map_err(|e| CompareError::Decode {
                collection: query.collection.clone(),
                message: e.to_string(),
            })?;
            record.validate_record()?;
            Ok(record)
        })
        .collect::<Result<Vec<T>>>()?;

    info!(collection = %query.collection, count = records.len(), "loaded records");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductType;
    use serde_json::json;

    fn car_rows() -> Vec<Row> {
        vec![
            json!({
                "id": "0b6f4c1e-31a7-4d55-9f0e-1b2f0c7d8e91",
                "lender": "Northline",
                "product_type": "car_loan",
                "rate_min": 7.9,
                "rate_max": 13.5
            }),
            json!({
                "id": "5d2b7a9c-6e13-4f80-a1c4-9e8b3f2d1a07",
                "lender": "Coastal",
                "product_type": "car_loan",
                "rate": 9.25,
                "recommended": true
            }),
        ]
    }

    #[test]
    fn test_fetch_records_decodes_rows() {
        let source = InMemorySource::new().with_rows("car_loans", car_rows());
        let offers: Vec<LoanOffer> =
            fetch_records(&source, &Query::collection(ProductType::CarLoan.collection())).unwrap();

        assert_eq!(offers.len(), 2);
        assert_eq!(offers[0].lender, "Northline");
        assert!(offers[1].recommended);
    }

    #[test]
    fn test_invalid_row_fails_load() {
        let source = InMemorySource::new().with_rows(
            "car_loans",
            vec![json!({
                "id": "0b6f4c1e-31a7-4d55-9f0e-1b2f0c7d8e91",
                "lender": "Backwards",
                "product_type": "car_loan",
                "rate_min": 14,
                "rate_max": 9
            })],
        );
        let result: Result<Vec<LoanOffer>> = fetch_records(&source, &Query::collection("car_loans"));
        assert!(matches!(result, Err(CompareError::InvalidRateRange { .. })));

        let source = InMemorySource::new().with_rows("car_loans", vec![json!({ "lender": 42 })]);
        let result: Result<Vec<LoanOffer>> = fetch_records(&source, &Query::collection("car_loans"));
        assert!(matches!(result, Err(CompareError::Decode { .. })));
    }
}
