//! # Cart Commands
//!
//! Commands for cart manipulation.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐                        │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │                        │
//! │  │  Cart    │     │          │     │  (gated) │                        │
//! │  └──────────┘     └──────────┘     └──────────┘                        │
//! │                        │                 │                              │
//! │                   add_to_cart       cart_totals.meets_minimum           │
//! │                   update_cart_item  (checkout.rs)                       │
//! │                   remove_from_cart                                      │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart ──────────────────────►  (back to empty)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::debug;
use ts_rs::TS;

use mandi_core::attrs::{ensure_variant_chosen, AttributeSet, VariantKey, VariantSelection};
use mandi_core::cart::{compute_totals, CartTotals, CheckoutPolicy};

use crate::error::ApiError;
use crate::state::{CartEntry, SessionState};

/// Cart response including entries and totals.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub entries: Vec<CartEntry>,
    pub totals: CartTotals,
}

/// Builds the response view: current entries plus recomputed totals.
fn view(state: &SessionState) -> CartView {
    let (entries, lines) = state.cart.with_cart(|c| (c.entries.clone(), c.lines()));
    let totals = state.with_catalog(|catalog| {
        compute_totals(
            &lines,
            catalog.products(),
            state.role(),
            CheckoutPolicy::for_role(state.role()),
        )
    });
    CartView { entries, totals }
}

/// Gets the current cart contents with totals.
pub fn get_cart(state: &SessionState) -> CartView {
    debug!("get_cart command");
    view(state)
}

/// Adds a product to the cart.
///
/// ## Behavior
/// - Variant products: every selected variant becomes (or merges into) its
///   own cart line, with the quantity tracked in the selection. An empty
///   selection is a validation failure; the UI surfaces the message and
///   scrolls the variant picker into view, and no cart state changes.
/// - Simple products: one line with the given quantity (default 1).
/// - Prices are frozen at time of adding.
pub fn add_to_cart(
    state: &SessionState,
    product_id: &str,
    selection: &VariantSelection,
    quantity: Option<i64>,
) -> Result<CartView, ApiError> {
    debug!(product_id = %product_id, variants = selection.len(), "add_to_cart command");

    let product = state
        .with_catalog(|catalog| catalog.get(product_id).cloned())
        .ok_or_else(|| ApiError::not_found("Product", product_id))?;

    if !product.is_active {
        return Err(ApiError::validation("Product is not available for sale"));
    }

    ensure_variant_chosen(&product, selection)?;

    let role = state.role();
    state.cart.with_cart_mut(|cart| {
        if product.has_variants() {
            for (_, chosen) in selection.iter() {
                cart.add_entry(CartEntry::from_product(
                    &product,
                    Some(&chosen.stock),
                    chosen.quantity,
                    role,
                ))?;
            }
        } else {
            let quantity = quantity.unwrap_or(1).max(1);
            cart.add_entry(CartEntry::from_product(&product, None, quantity, role))?;
        }
        Ok::<(), mandi_core::CoreError>(())
    })?;

    Ok(view(state))
}

/// Updates the quantity of a cart line.
///
/// Optimistic: applied immediately, floored at 1, unbounded upward at
/// this layer.
pub fn update_cart_item(
    state: &SessionState,
    product_id: &str,
    attributes: &AttributeSet,
    quantity: i64,
) -> Result<CartView, ApiError> {
    debug!(product_id = %product_id, quantity = %quantity, "update_cart_item command");

    let key = VariantKey::from_attributes(attributes);
    state
        .cart
        .with_cart_mut(|cart| cart.update_quantity(product_id, &key, quantity))?;

    Ok(view(state))
}

/// Removes a cart line.
pub fn remove_from_cart(
    state: &SessionState,
    product_id: &str,
    attributes: &AttributeSet,
) -> Result<CartView, ApiError> {
    debug!(product_id = %product_id, "remove_from_cart command");

    let key = VariantKey::from_attributes(attributes);
    state
        .cart
        .with_cart_mut(|cart| cart.remove_entry(product_id, &key))?;

    Ok(view(state))
}

/// Clears all lines from the cart.
pub fn clear_cart(state: &SessionState) -> CartView {
    debug!("clear_cart command");

    state.cart.with_cart_mut(|cart| cart.clear());
    view(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::merge_products;
    use crate::error::ErrorCode;
    use chrono::Utc;
    use mandi_core::types::{AttributeStock, BuyerRole, Product, StockUnit};

    fn attrs(pairs: &[(&str, &str)]) -> AttributeSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn stock(pairs: &[(&str, &str)], user: i64, vendor: i64, display: i64) -> AttributeStock {
        AttributeStock {
            attributes: attrs(pairs),
            actual_stock: display + 10,
            display_stock: display,
            stock_unit: StockUnit::Kilogram,
            vendor_price_paise: vendor,
            user_price_paise: user,
        }
    }

    fn product(id: &str, user_price: i64, stocks: Vec<AttributeStock>) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            description: None,
            category: Some("seeds".to_string()),
            price_to_user_paise: user_price,
            price_to_vendor_paise: user_price - 2_000,
            stock: Some(100),
            stock_unit: Some(StockUnit::Bag),
            attribute_stocks: stocks,
            variant_name_key: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn session_with(products: Vec<Product>) -> SessionState {
        let state = SessionState::new(BuyerRole::User);
        merge_products(&state, products);
        state
    }

    #[test]
    fn test_add_simple_product() {
        let state = session_with(vec![product("p-1", 10_000, vec![])]);
        let view = add_to_cart(&state, "p-1", &VariantSelection::new(), Some(3)).unwrap();

        assert_eq!(view.entries.len(), 1);
        assert_eq!(view.entries[0].quantity, 3);
        assert_eq!(view.entries[0].unit_price_paise, 10_000);
        assert_eq!(view.totals.subtotal_paise, 30_000);
    }

    #[test]
    fn test_add_variant_product_requires_selection() {
        let state = session_with(vec![product(
            "p-1",
            10_000,
            vec![stock(&[("variety", "Basmati")], 12_000, 9_000, 40)],
        )]);

        let err = add_to_cart(&state, "p-1", &VariantSelection::new(), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        // No state mutation on failure.
        assert!(state.cart.with_cart(|c| c.is_empty()));
    }

    #[test]
    fn test_add_multiple_variants_at_once() {
        let basmati = stock(&[("variety", "Basmati")], 12_000, 9_000, 40);
        let sona = stock(&[("variety", "Sona")], 8_000, 6_000, 40);
        let state = session_with(vec![product("p-1", 10_000, vec![basmati.clone(), sona.clone()])]);

        let mut selection = VariantSelection::new();
        selection.toggle(&basmati);
        selection.toggle(&sona);
        selection.set_quantity(&basmati.variant_key(), 2);

        let view = add_to_cart(&state, "p-1", &selection, None).unwrap();
        assert_eq!(view.entries.len(), 2);
        assert_eq!(view.totals.subtotal_paise, 2 * 12_000 + 8_000);
    }

    #[test]
    fn test_add_unknown_product() {
        let state = session_with(vec![]);
        let err = add_to_cart(&state, "p-404", &VariantSelection::new(), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_add_inactive_product() {
        let mut p = product("p-1", 10_000, vec![]);
        p.is_active = false;
        let state = session_with(vec![p]);

        let err = add_to_cart(&state, "p-1", &VariantSelection::new(), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_update_and_remove_line() {
        let state = session_with(vec![product("p-1", 10_000, vec![])]);
        add_to_cart(&state, "p-1", &VariantSelection::new(), Some(2)).unwrap();

        let view = update_cart_item(&state, "p-1", &AttributeSet::new(), 0).unwrap();
        assert_eq!(view.entries[0].quantity, 1);

        let view = remove_from_cart(&state, "p-1", &AttributeSet::new()).unwrap();
        assert!(view.entries.is_empty());
    }

    #[test]
    fn test_clear_cart() {
        let state = session_with(vec![product("p-1", 10_000, vec![])]);
        add_to_cart(&state, "p-1", &VariantSelection::new(), Some(2)).unwrap();

        let view = clear_cart(&state);
        assert!(view.entries.is_empty());
        assert_eq!(view.totals.total_paise, 0);
    }

    #[test]
    fn test_cart_view_wire_shape() {
        let state = session_with(vec![product("p-1", 10_000, vec![])]);
        let view = add_to_cart(&state, "p-1", &VariantSelection::new(), None).unwrap();

        let json = serde_json::to_value(&view).unwrap();
        assert!(json["entries"][0]["productId"].is_string());
        assert!(json["totals"]["subtotalPaise"].is_i64());
        assert!(json["totals"]["meetsMinimum"].is_boolean());
    }
}
