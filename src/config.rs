use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::decimal::Rate;
use crate::errors::{CompareError, Result};
use crate::filter::FilterCatalog;
use crate::rates::{default_policies, RatePolicy, RateResolver, DEFAULT_FALLBACK_RATE_PERCENT};
use crate::types::ProductType;

/// number of records that can sit side by side in a comparison
pub const DEFAULT_COMPARE_LIMIT: usize = 2;

/// engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// rate assumed for listings that publish none, as a percentage
    #[serde(default = "default_fallback_rate")]
    pub fallback_rate: Rate,
    /// merged over the built-in policies; unlisted products keep theirs
    #[serde(default = "default_policies", deserialize_with = "merge_rate_policies")]
    pub rate_policies: BTreeMap<ProductType, RatePolicy>,
    #[serde(default = "default_compare_limit")]
    pub compare_limit: usize,
    #[serde(default)]
    pub retry: RetryConfig,
    /// filter options replacing the built-in catalog for a product page
    #[serde(default)]
    pub catalogs: BTreeMap<ProductType, FilterCatalog>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fallback_rate: default_fallback_rate(),
            rate_policies: default_policies(),
            compare_limit: default_compare_limit(),
            retry: RetryConfig::default(),
            catalogs: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    /// parse and validate a JSON configuration document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| CompareError::InvalidConfiguration {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.fallback_rate.is_negative() || self.fallback_rate.is_zero() {
            return Err(CompareError::InvalidConfiguration {
                message: format!("fallback rate must be positive, got {}", self.fallback_rate),
            });
        }
        if self.compare_limit == 0 {
            return Err(CompareError::InvalidConfiguration {
                message: "compare limit must be at least 1".to_string(),
            });
        }
        if let Some(product) = self.rate_policies.keys().find(|p| !p.is_loan()) {
            return Err(CompareError::InvalidConfiguration {
                message: format!("rate policy configured for non-loan product {:?}", product),
            });
        }
        self.retry.validate()
    }

    /// rate resolver for the configured fallback and policies
    pub fn rate_resolver(&self) -> RateResolver {
        RateResolver::new(self.fallback_rate).with_policies(self.rate_policies.clone())
    }

    pub fn filter_catalog(&self, product_type: ProductType) -> FilterCatalog {
        self.catalogs
            .get(&product_type)
            .cloned()
            .unwrap_or_else(|| FilterCatalog::for_product(product_type))
    }
}

/// retry policy for data-source fetches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// total attempts including the first (default: 3)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// delay before the first retry in milliseconds (default: 200)
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// cap on a single delay in milliseconds (default: 5000)
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// backoff multiplier applied per retry (default: 2)
    #[serde(default = "default_multiplier")]
    pub multiplier: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            multiplier: default_multiplier(),
        }
    }
}

impl RetryConfig {
    /// single attempt, no retries
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }

    /// retries with no delay between attempts
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay_ms: 0,
            max_delay_ms: 0,
            multiplier: 1,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(CompareError::InvalidConfiguration {
                message: "retry max_attempts must be at least 1".to_string(),
            });
        }
        if self.multiplier == 0 {
            return Err(CompareError::InvalidConfiguration {
                message: "retry multiplier must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// delay to wait after the given failed attempt (1-indexed)
    ///
    /// base * multiplier^(attempt-1), capped at `max_delay_ms`
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = (self.multiplier as u64).saturating_pow(attempt.saturating_sub(1));
        let delay_ms = self.base_delay_ms.saturating_mul(factor).min(self.max_delay_ms);
        Duration::from_millis(delay_ms)
    }
}

fn default_fallback_rate() -> Rate {
    Rate::from_percentage(DEFAULT_FALLBACK_RATE_PERCENT)
}

fn merge_rate_policies<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<ProductType, RatePolicy>, D::Error>
where
    D: Deserializer<'de>,
{
    let configured = BTreeMap::<ProductType, RatePolicy>::deserialize(deserializer)?;
    let mut policies = default_policies();
    policies.extend(configured);
    Ok(policies)
}

fn default_compare_limit() -> usize {
    DEFAULT_COMPARE_LIMIT
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    200
}

fn default_max_delay_ms() -> u64 {
    5_000
}

fn default_multiplier() -> u32 {
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.fallback_rate, Rate::from_percentage(12));
        assert_eq!(config.compare_limit, 2);
        assert_eq!(config.rate_policies[&ProductType::CarLoan], RatePolicy::AverageRange);
        assert!(config.validate().is_ok());
        assert_eq!(config.rate_resolver(), RateResolver::default());
    }

    #[test]
    fn test_from_json_with_partial_document() {
        let config = EngineConfig::from_json(
            r#"{
                "fallback_rate": 14.5,
                "compare_limit": 3,
                "retry": { "max_attempts": 5 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.fallback_rate.as_percentage().to_string(), "14.5");
        assert_eq!(config.compare_limit, 3);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.base_delay_ms, 200);
        assert_eq!(config.rate_policies.len(), 3);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(EngineConfig::from_json(r#"{ "compare_limit": 0 }"#).is_err());
        assert!(EngineConfig::from_json(r#"{ "fallback_rate": -1 }"#).is_err());
        assert!(EngineConfig::from_json(r#"{ "rate_policies": { "broadband": "direct_value" } }"#).is_err());
        assert!(EngineConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_partial_rate_policies_keep_defaults() {
        let config = EngineConfig::from_json(r#"{ "rate_policies": { "home_loan": "average_range" } }"#).unwrap();

        assert_eq!(config.rate_policies[&ProductType::HomeLoan], RatePolicy::AverageRange);
        assert_eq!(config.rate_policies[&ProductType::CarLoan], RatePolicy::AverageRange);
        assert_eq!(config.rate_policies[&ProductType::PersonalLoan], RatePolicy::DirectValue);
        assert_eq!(config.rate_resolver().policy_for(ProductType::CarLoan), RatePolicy::AverageRange);
    }

    #[test]
    fn test_catalog_override() {
        let config = EngineConfig::from_json(
            r#"{
                "catalogs": {
                    "broadband": {
                        "categories": {
                            "speed": [
                                { "kind": "range", "id": "gigabit", "field": "download_mbps", "min": "1000", "max": null }
                            ]
                        }
                    }
                }
            }"#,
        )
        .unwrap();

        let broadband = config.filter_catalog(ProductType::Broadband);
        assert_eq!(broadband.buckets("speed").len(), 1);
        assert!(broadband.bucket("speed", "gigabit").is_ok());
        assert_eq!(
            config.filter_catalog(ProductType::HomeLoan),
            FilterCatalog::for_product(ProductType::HomeLoan)
        );
    }

    #[test]
    fn test_exponential_backoff() {
        let retry = RetryConfig {
            max_attempts: 5,
            base_delay_ms: 100,
            max_delay_ms: 350,
            multiplier: 2,
        };
        assert_eq!(retry.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(retry.delay_for_attempt(2), Duration::from_millis(200));
        assert_eq!(retry.delay_for_attempt(3), Duration::from_millis(350));
        assert_eq!(RetryConfig::immediate(3).delay_for_attempt(3), Duration::ZERO);
    }
}
