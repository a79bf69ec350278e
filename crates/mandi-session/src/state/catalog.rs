//! # Catalog & Rules Caches
//!
//! Session-local caches for fetched product details and repayment rules.
//!
//! Product fetches are independent, idempotent GET reads with no ordering
//! guarantee; results merge additively by product id, so a slow or stale
//! response simply populates an entry that may no longer be displayed.

use std::collections::HashMap;

use mandi_core::types::{Product, RepaymentRules};

/// Additive product cache keyed by product id.
#[derive(Debug, Default)]
pub struct Catalog {
    products: HashMap<String, Product>,
}

impl Catalog {
    /// Creates an empty catalog cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges fetched products into the cache, last write per id wins.
    /// Returns how many entries the cache holds afterwards.
    pub fn merge(&mut self, products: Vec<Product>) -> usize {
        for product in products {
            self.products.insert(product.id.clone(), product);
        }
        self.products.len()
    }

    /// Looks up a cached product.
    pub fn get(&self, product_id: &str) -> Option<&Product> {
        self.products.get(product_id)
    }

    /// Whether a product has been fetched.
    pub fn contains(&self, product_id: &str) -> bool {
        self.products.contains_key(product_id)
    }

    /// The full cache map, for the aggregation core.
    pub fn products(&self) -> &HashMap<String, Product> {
        &self.products
    }

    /// Number of cached products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Cached repayment rules with a hardcoded fallback.
#[derive(Debug, Default)]
pub struct RulesState {
    rules: Option<RepaymentRules>,
}

impl RulesState {
    /// Creates an empty rules cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the rules fetched from the rules endpoint.
    pub fn set(&mut self, rules: RepaymentRules) {
        self.rules = Some(rules);
    }

    /// The rules to calculate with: the fetched configuration, or the
    /// hardcoded fallback when the endpoint has not supplied any.
    pub fn effective(&self) -> RepaymentRules {
        self.rules.clone().unwrap_or_else(RepaymentRules::fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mandi_core::types::StockUnit;

    fn product(id: &str, user_price: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            description: None,
            category: None,
            price_to_user_paise: user_price,
            price_to_vendor_paise: user_price - 1_000,
            stock: Some(10),
            stock_unit: Some(StockUnit::Kilogram),
            attribute_stocks: Vec::new(),
            variant_name_key: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_merge_is_additive_and_idempotent() {
        let mut catalog = Catalog::new();
        catalog.merge(vec![product("p-1", 10_000)]);
        catalog.merge(vec![product("p-2", 5_000)]);
        assert_eq!(catalog.len(), 2);

        // A late response for an already-cached id just overwrites it.
        catalog.merge(vec![product("p-1", 11_000)]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("p-1").unwrap().price_to_user_paise, 11_000);
    }

    #[test]
    fn test_missing_product_is_none() {
        let catalog = Catalog::new();
        assert!(catalog.get("p-404").is_none());
        assert!(!catalog.contains("p-404"));
    }

    #[test]
    fn test_rules_fall_back_when_unset() {
        let rules = RulesState::new();
        assert_eq!(rules.effective(), RepaymentRules::fallback());
    }

    #[test]
    fn test_rules_prefer_fetched_configuration() {
        let mut rules = RulesState::new();
        rules.set(RepaymentRules::default());
        assert_eq!(rules.effective(), RepaymentRules::default());
    }
}
