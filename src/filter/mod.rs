mod accessors;
pub mod catalog;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::products::LoanOffer;
use crate::rates::RateResolver;

pub use catalog::FilterCatalog;

/// field access for filter evaluation
///
/// Numeric fields are in display units: rates and LVR as percentages, money in
/// currency units, terms in months.
pub trait Filterable {
    fn numeric_field(&self, field: &str) -> Option<Decimal>;

    fn flag(&self, field: &str) -> bool;

    fn category(&self, field: &str) -> Option<&str>;
}

/// one selectable filter option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Bucket {
    /// inclusive numeric range; no max means unbounded above
    Range {
        id: String,
        field: String,
        min: Decimal,
        #[serde(default)]
        max: Option<Decimal>,
    },
    /// passes when the boolean field is set
    Flag { id: String, field: String },
    /// passes when the categorical field equals the value
    Member {
        id: String,
        field: String,
        value: String,
    },
}

impl Bucket {
    pub fn range(id: impl Into<String>, field: impl Into<String>, min: Decimal, max: Option<Decimal>) -> Self {
        Bucket::Range {
            id: id.into(),
            field: field.into(),
            min,
            max,
        }
    }

    pub fn flag(id: impl Into<String>, field: impl Into<String>) -> Self {
        Bucket::Flag {
            id: id.into(),
            field: field.into(),
        }
    }

    pub fn member(id: impl Into<String>, field: impl Into<String>, value: impl Into<String>) -> Self {
        Bucket::Member {
            id: id.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Bucket::Range { id, .. } | Bucket::Flag { id, .. } | Bucket::Member { id, .. } => id,
        }
    }

    pub fn admits<R: Filterable + ?Sized>(&self, record: &R) -> bool {
        match self {
            Bucket::Range { field, min, max, .. } => match record.numeric_field(field) {
                Some(value) => value >= *min && max.map_or(true, |max| value <= max),
                None => false,
            },
            Bucket::Flag { field, .. } => record.flag(field),
            Bucket::Member { field, value, .. } => record.category(field) == Some(value.as_str()),
        }
    }
}

/// active filter selections, keyed by category
///
/// Values are immutable; the transition methods return a new value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    categories: BTreeMap<String, Vec<Bucket>>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// select the bucket if absent, deselect it if present
    pub fn toggle(&self, category: &str, bucket: Bucket) -> Self {
        let mut next = self.clone();
        let selected = next.categories.entry(category.to_string()).or_default();

        match selected.iter().position(|b| b.id() == bucket.id()) {
            Some(index) => {
                selected.remove(index);
            }
            None => selected.push(bucket),
        }

        if selected.is_empty() {
            next.categories.remove(category);
        }
        next
    }

    pub fn clear_category(&self, category: &str) -> Self {
        let mut next = self.clone();
        next.categories.remove(category);
        next
    }

    pub fn clear_all(&self) -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// number of selected buckets across categories
    pub fn active_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_selected(&self, category: &str, bucket_id: &str) -> bool {
        self.categories
            .get(category)
            .is_some_and(|selected| selected.iter().any(|b| b.id() == bucket_id))
    }

    pub fn selected(&self, category: &str) -> &[Bucket] {
        self.categories.get(category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &[Bucket])> {
        self.categories
            .iter()
            .map(|(name, buckets)| (name.as_str(), buckets.as_slice()))
    }
}

/// whether the record passes every active category
///
/// Buckets within a category are OR-ed, categories are AND-ed, and a category
/// with nothing selected imposes no constraint.
pub fn matches<R: Filterable + ?Sized>(record: &R, criteria: &FilterCriteria) -> bool {
    criteria
        .categories()
        .all(|(_, buckets)| buckets.is_empty() || buckets.iter().any(|b| b.admits(record)))
}

/// records passing the criteria, in input order
pub fn apply<'r, R, I>(records: I, criteria: &FilterCriteria) -> Vec<&'r R>
where
    R: Filterable + ?Sized + 'r,
    I: IntoIterator<Item = &'r R>,
{
    records
        .into_iter()
        .filter(|record| matches(*record, criteria))
        .collect()
}

/// loan listings passing the criteria, with `interest_rate` resolved by the
/// configured per-product policies
pub fn apply_offers<'r, I>(offers: I, criteria: &FilterCriteria, resolver: &RateResolver) -> Vec<&'r LoanOffer>
where
    I: IntoIterator<Item = &'r LoanOffer>,
{
    offers
        .into_iter()
        .filter(|offer| matches(&accessors::ResolvedOffer { offer: *offer, resolver }, criteria))
        .collect()
}
