use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::errors::{CompareError, Result};
use crate::source::{Query, RecordSource, Row};
use crate::types::SortDirection;

/// rows held in memory, queried the way the hosted backend answers them
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    collections: HashMap<String, Vec<Row>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, collection: impl Into<String>, rows: Vec<Row>) -> Self {
        self.collections.insert(collection.into(), rows);
        self
    }

    /// load a collection from a JSON array document
    pub fn with_json(self, collection: impl Into<String>, json: &str) -> Result<Self> {
        let collection = collection.into();
        let rows: Vec<Row> = serde_json::from_str(json).map_err(|e| CompareError::Decode {
            collection: collection.clone(),
            message: e.to_string(),
        })?;
        Ok(self.with_rows(collection, rows))
    }
}

impl RecordSource for InMemorySource {
    fn fetch_rows(&self, query: &Query) -> Result<Vec<Row>> {
        let rows = self
            .collections
            .get(&query.collection)
            .ok_or_else(|| CompareError::DataFetchFailure {
                collection: query.collection.clone(),
                attempts: 1,
                message: "relation does not exist".to_string(),
            })?;

        let mut selected: Vec<Row> = rows
            .iter()
            .filter(|row| {
                query
                    .filters
                    .iter()
                    .all(|(field, expected)| row.get(field) == Some(expected))
            })
            .cloned()
            .collect();

        if let Some(order) = &query.order_by {
            selected.sort_by(|a, b| {
                let ordering = compare_json(a.get(&order.field), b.get(&order.field));
                match order.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }

        Ok(selected)
    }
}

/// numbers by value, strings lexically, missing and null last in ascending order
fn compare_json(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}
