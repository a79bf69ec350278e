//! # Checkout Commands
//!
//! Read-side commands for the cart drawer and the vendor settlement
//! slider, plus the cache-feeding commands the data-fetching layer calls
//! when responses land.

use tracing::debug;

use mandi_core::cart::{compute_totals, CartTotals, CheckoutPolicy};
use mandi_core::credit::{credit_quote as quote, CreditQuote};
use mandi_core::types::{Product, RepaymentRules};

use crate::state::SessionState;

/// Computes the cart's grouped totals and checkout eligibility for the
/// session's role.
pub fn cart_totals(state: &SessionState) -> CartTotals {
    debug!("cart_totals command");

    let lines = state.cart.with_cart(|c| c.lines());
    state.with_catalog(|catalog| {
        compute_totals(
            &lines,
            catalog.products(),
            state.role(),
            CheckoutPolicy::for_role(state.role()),
        )
    })
}

/// Quotes the payable total for a settlement-slider position.
///
/// Recomputed on every slider move; the rules come from the session's
/// rules cache (fetched configuration or the hardcoded fallback).
pub fn credit_quote(state: &SessionState, progress: f64) -> CreditQuote {
    debug!(progress = %progress, "credit_quote command");

    let subtotal = cart_totals(state).subtotal_paise;
    let rules = state.with_rules(|r| r.effective());
    quote(subtotal, progress, &rules)
}

/// Merges fetched products into the session's catalog cache. Returns the
/// cache size afterwards.
///
/// Fetches are unordered and idempotent; a late response for a product
/// that is no longer displayed just overwrites its cache entry.
pub fn merge_products(state: &SessionState, products: Vec<Product>) -> usize {
    debug!(count = products.len(), "merge_products command");

    state.with_catalog_mut(|catalog| catalog.merge(products))
}

/// Stores the repayment rules fetched from the rules endpoint.
pub fn set_repayment_rules(state: &SessionState, rules: RepaymentRules) {
    debug!("set_repayment_rules command");

    state.with_rules_mut(|r| r.set(rules));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::add_to_cart;
    use chrono::Utc;
    use mandi_core::attrs::VariantSelection;
    use mandi_core::credit::SegmentKind;
    use mandi_core::types::{BuyerRole, StockUnit, Tier};

    fn product(id: &str, user_price: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            description: None,
            category: None,
            price_to_user_paise: user_price,
            price_to_vendor_paise: user_price - 2_000,
            stock: Some(100),
            stock_unit: Some(StockUnit::Bag),
            attribute_stocks: Vec::new(),
            variant_name_key: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn tier(start: i64, end: i64, rate: f64) -> Tier {
        Tier {
            start,
            end,
            rate,
            name: None,
        }
    }

    /// A vendor session holding ₹10,000 of stock in the cart.
    fn vendor_session() -> SessionState {
        let state = SessionState::new(BuyerRole::Vendor);
        merge_products(&state, vec![product("p-1", 102_000)]);
        add_to_cart(&state, "p-1", &VariantSelection::new(), Some(10)).unwrap();
        state
    }

    #[test]
    fn test_totals_use_role_pricing() {
        let state = vendor_session();
        let totals = cart_totals(&state);
        // Vendor price is ₹1,000 per unit.
        assert_eq!(totals.subtotal_paise, 1_000_000);
        assert_eq!(totals.delivery_paise, 0);
        assert!(totals.meets_minimum);
    }

    #[test]
    fn test_credit_quote_over_slider_range() {
        let state = vendor_session();
        set_repayment_rules(
            &state,
            RepaymentRules {
                discount_tiers: vec![tier(0, 15, 5.0)],
                interest_tiers: vec![tier(45, 60, 2.0)],
            },
        );

        let early = credit_quote(&state, 0.0);
        assert_eq!(early.kind, SegmentKind::Discount);
        assert_eq!(early.payable_paise, 950_000);

        let mid = credit_quote(&state, 50.0);
        assert_eq!(mid.kind, SegmentKind::None);
        assert_eq!(mid.payable_paise, 1_000_000);

        let late = credit_quote(&state, 100.0);
        assert_eq!(late.kind, SegmentKind::Interest);
        assert_eq!(late.payable_paise, 1_020_000);
        assert_eq!(late.days, 60);
    }

    #[test]
    fn test_credit_quote_uses_fallback_rules() {
        let state = vendor_session();
        // No rules fetched: the hardcoded fallback applies (5% early
        // discount tier at progress 0).
        let early = credit_quote(&state, 0.0);
        assert_eq!(early.kind, SegmentKind::Discount);
        assert_eq!(early.rate.bps(), 500);
    }

    #[test]
    fn test_merge_products_reports_cache_size() {
        let state = SessionState::new(BuyerRole::User);
        assert_eq!(merge_products(&state, vec![product("a", 1_000)]), 1);
        assert_eq!(merge_products(&state, vec![product("b", 1_000)]), 2);
        assert_eq!(merge_products(&state, vec![product("a", 2_000)]), 2);
    }
}
