use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::{CompareError, Result};
use crate::filter::{Bucket, FilterCriteria};
use crate::types::ProductType;

/// filter options offered on a listing page, by category
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterCatalog {
    categories: BTreeMap<String, Vec<Bucket>>,
}

impl FilterCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: impl Into<String>, buckets: Vec<Bucket>) -> Self {
        self.categories.insert(category.into(), buckets);
        self
    }

    /// default options for a product page
    pub fn for_product(product_type: ProductType) -> Self {
        match product_type {
            ProductType::HomeLoan => Self::new()
                .with_category("interest_rate", rate_buckets())
                .with_category(
                    "loan_amount",
                    amount_buckets(&[(0, 250_000), (250_000, 500_000), (500_000, 1_000_000)], 1_000_000),
                )
                .with_category(
                    "max_lvr",
                    vec![
                        Bucket::range("up-to-80", "max_lvr", dec!(0), Some(dec!(80))),
                        Bucket::range("80-plus", "max_lvr", dec!(80), None),
                    ],
                )
                .with_category("features", loan_features(&["offset", "redraw", "extra_repayments"])),
            ProductType::CarLoan | ProductType::PersonalLoan => Self::new()
                .with_category("interest_rate", rate_buckets())
                .with_category(
                    "loan_amount",
                    amount_buckets(&[(0, 10_000), (10_000, 50_000), (50_000, 100_000)], 100_000),
                )
                .with_category(
                    "loan_term",
                    vec![
                        Bucket::range("up-to-3y", "max_term_months", dec!(0), Some(dec!(36))),
                        Bucket::range("3-5y", "max_term_months", dec!(36), Some(dec!(60))),
                        Bucket::range("5y-plus", "max_term_months", dec!(60), None),
                    ],
                )
                .with_category("features", loan_features(&["early_repayment", "secured"])),
            ProductType::BankAccount => Self::new()
                .with_category(
                    "monthly_fee",
                    vec![
                        Bucket::flag("no-fee", "no_monthly_fee"),
                        Bucket::range("under-10", "monthly_fee", dec!(0), Some(dec!(10))),
                    ],
                )
                .with_category(
                    "features",
                    vec![
                        Bucket::flag("recommended", "recommended"),
                        Bucket::flag("mobile-app", "mobile_app"),
                    ],
                ),
            ProductType::Broadband => Self::new()
                .with_category(
                    "speed",
                    vec![
                        Bucket::range("basic", "download_mbps", dec!(0), Some(dec!(25))),
                        Bucket::range("standard", "download_mbps", dec!(25), Some(dec!(100))),
                        Bucket::range("fast", "download_mbps", dec!(100), None),
                    ],
                )
                .with_category(
                    "price",
                    vec![
                        Bucket::range("under-60", "monthly_price", dec!(0), Some(dec!(60))),
                        Bucket::range("60-90", "monthly_price", dec!(60), Some(dec!(90))),
                        Bucket::range("90-plus", "monthly_price", dec!(90), None),
                    ],
                )
                .with_category(
                    "features",
                    vec![
                        Bucket::flag("no-contract", "no_contract"),
                        Bucket::flag("recommended", "recommended"),
                    ],
                ),
        }
    }

    pub fn buckets(&self, category: &str) -> &[Bucket] {
        self.categories.get(category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn bucket(&self, category: &str, bucket_id: &str) -> Result<&Bucket> {
        self.buckets(category)
            .iter()
            .find(|b| b.id() == bucket_id)
            .ok_or_else(|| CompareError::UnknownBucket {
                category: category.to_string(),
                bucket: bucket_id.to_string(),
            })
    }

    /// toggle a catalog bucket by id
    pub fn toggle(&self, criteria: &FilterCriteria, category: &str, bucket_id: &str) -> Result<FilterCriteria> {
        let bucket = self.bucket(category, bucket_id)?;
        Ok(criteria.toggle(category, bucket.clone()))
    }
}

fn rate_buckets() -> Vec<Bucket> {
    vec![
        Bucket::range("under-8", "interest_rate", dec!(0), Some(dec!(8))),
        Bucket::range("8-12", "interest_rate", dec!(8), Some(dec!(12))),
        Bucket::range("12-16", "interest_rate", dec!(12), Some(dec!(16))),
        Bucket::range("16-plus", "interest_rate", dec!(16), None),
    ]
}

fn amount_buckets(bounds: &[(i64, i64)], open_from: i64) -> Vec<Bucket> {
    bounds
        .iter()
        .map(|(min, max)| {
            Bucket::range(
                format!("{}-{}", min, max),
                "max_amount",
                Decimal::from(*min),
                Some(Decimal::from(*max)),
            )
        })
        .chain(std::iter::once(Bucket::range(
            format!("{}-plus", open_from),
            "max_amount",
            Decimal::from(open_from),
            None,
        )))
        .collect()
}

fn loan_features(features: &[&str]) -> Vec<Bucket> {
    std::iter::once(Bucket::flag("recommended", "recommended"))
        .chain(std::iter::once(Bucket::flag("no-application-fee", "no_application_fee")))
        .chain(features.iter().map(|f| Bucket::flag(f.replace('_', "-"), *f)))
        .collect()
}
