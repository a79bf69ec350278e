//! # Cart Aggregation
//!
//! Combines raw cart lines (persisted client-side) with cached product
//! details to produce grouped, display-ready totals.
//!
//! ## Aggregation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   CartLine[]  +  product cache  +  role  +  CheckoutPolicy              │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   group_lines()   ──► groups by product, one line per variant           │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   compute_totals() ──► subtotal, delivery, total,                       │
//! │                        meets_minimum, shortfall                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A product missing from the cache (fetch not yet resolved) is treated as
//! absent: the line falls back to its own price fields and the display is
//! simply less precise until the fetch completes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::attrs::{deserialize_attribute_map, resolve_match, AttributeSet, VariantKey};
use crate::types::{BuyerRole, Product};
use crate::{DELIVERY_FEE_PAISE, FREE_DELIVERY_THRESHOLD_PAISE};

// =============================================================================
// Cart Line
// =============================================================================

/// A raw cart line as persisted in client-side application state.
///
/// Both price fields are optional: `unit_price_paise` is the current
/// field, `price_paise` the legacy one. Resolution order lives in
/// [`resolve_unit_price`].
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: String,

    pub quantity: i64,

    /// Price frozen when the line was added, in paise.
    #[serde(default)]
    pub unit_price_paise: Option<i64>,

    /// Legacy price field, in paise.
    #[serde(default)]
    pub price_paise: Option<i64>,

    /// Variant attributes; empty for simple products.
    #[serde(default, deserialize_with = "deserialize_attribute_map")]
    pub attributes: AttributeSet,
}

/// Resolves the unit price for a cart line, in paise.
///
/// ## Resolution order
/// 1. Explicit `unit_price_paise` on the line
/// 2. Legacy `price_paise` on the line
/// 3. The matching attribute-stock's role price
/// 4. The product's base role price
/// 5. 0 (product not yet fetched and line carries no price)
pub fn resolve_unit_price(line: &CartLine, product: Option<&Product>, role: BuyerRole) -> i64 {
    if let Some(price) = line.unit_price_paise {
        return price;
    }
    if let Some(price) = line.price_paise {
        return price;
    }
    if let Some(product) = product {
        if !line.attributes.is_empty() {
            if let Some(stock) = resolve_match(product, &line.attributes) {
                return stock.price_for(role);
            }
        }
        return product.price_for(role);
    }
    0
}

// =============================================================================
// Grouping
// =============================================================================

/// One variant line within a product group.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VariantLine {
    pub attributes: AttributeSet,
    pub quantity: i64,
    pub unit_price_paise: i64,
    pub line_total_paise: i64,
}

/// All of one product's variant lines, for grouped cart display.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartGroup {
    pub product_id: String,
    /// Product name when the product has been fetched.
    pub product_name: Option<String>,
    pub variants: Vec<VariantLine>,
}

impl CartGroup {
    /// Sum of this group's line totals, in paise.
    pub fn subtotal_paise(&self) -> i64 {
        self.variants.iter().map(|v| v.line_total_paise).sum()
    }
}

/// Groups cart lines by product, one line per distinct attribute set.
///
/// ## Behavior
/// - Groups appear in first-seen order of their product
/// - Within a group, each distinct canonical attribute set is one line
/// - Duplicate (product, attributes) pairs merge their quantities
pub fn group_lines(
    lines: &[CartLine],
    products: &HashMap<String, Product>,
    role: BuyerRole,
) -> Vec<CartGroup> {
    let mut groups: Vec<CartGroup> = Vec::new();
    let mut group_index: HashMap<String, usize> = HashMap::new();

    for line in lines {
        let index = *group_index.entry(line.product_id.clone()).or_insert_with(|| {
            groups.push(CartGroup {
                product_id: line.product_id.clone(),
                product_name: products.get(&line.product_id).map(|p| p.name.clone()),
                variants: Vec::new(),
            });
            groups.len() - 1
        });

        let key = VariantKey::from_attributes(&line.attributes);
        let group = &mut groups[index];

        if let Some(existing) = group
            .variants
            .iter_mut()
            .find(|v| VariantKey::from_attributes(&v.attributes) == key)
        {
            existing.quantity += line.quantity;
            existing.line_total_paise = existing.unit_price_paise * existing.quantity;
            continue;
        }

        let unit_price = resolve_unit_price(line, products.get(&line.product_id), role);
        group.variants.push(VariantLine {
            attributes: line.attributes.clone(),
            quantity: line.quantity,
            unit_price_paise: unit_price,
            line_total_paise: unit_price * line.quantity,
        });
    }

    groups
}

// =============================================================================
// Totals
// =============================================================================

/// Delivery and checkout-eligibility thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPolicy {
    /// Subtotal at or above which delivery is free, in paise.
    pub free_delivery_threshold_paise: i64,
    /// Flat delivery fee below the threshold, in paise.
    pub delivery_fee_paise: i64,
    /// Minimum order value for checkout, in paise.
    pub minimum_order_paise: i64,
}

impl CheckoutPolicy {
    /// Default policy for a buyer role: shared delivery thresholds, a
    /// role-dependent order minimum.
    pub const fn for_role(role: BuyerRole) -> Self {
        CheckoutPolicy {
            free_delivery_threshold_paise: FREE_DELIVERY_THRESHOLD_PAISE,
            delivery_fee_paise: DELIVERY_FEE_PAISE,
            minimum_order_paise: role.min_order_paise(),
        }
    }
}

/// Cart totals summary for display and the checkout gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    /// Number of variant lines across all groups.
    pub item_count: usize,
    /// Total quantity over all lines.
    pub total_quantity: i64,
    pub subtotal_paise: i64,
    pub delivery_paise: i64,
    pub total_paise: i64,
    /// Whether the cart clears the role's minimum order value.
    pub meets_minimum: bool,
    /// Amount still needed to reach the minimum; 0 when met.
    pub shortfall_paise: i64,
}

/// Computes grouped totals plus the checkout-eligibility verdict.
///
/// Delivery is free at or above the threshold and a flat fee otherwise;
/// an empty cart pays no delivery. Eligibility compares the grand total
/// against the policy minimum and surfaces the shortfall when unmet.
pub fn compute_totals(
    lines: &[CartLine],
    products: &HashMap<String, Product>,
    role: BuyerRole,
    policy: CheckoutPolicy,
) -> CartTotals {
    let groups = group_lines(lines, products, role);

    let subtotal: i64 = groups.iter().map(|g| g.subtotal_paise()).sum();
    let item_count: usize = groups.iter().map(|g| g.variants.len()).sum();
    let total_quantity: i64 = groups
        .iter()
        .flat_map(|g| g.variants.iter())
        .map(|v| v.quantity)
        .sum();

    let delivery = if subtotal == 0 || subtotal >= policy.free_delivery_threshold_paise {
        0
    } else {
        policy.delivery_fee_paise
    };
    let total = subtotal + delivery;

    let meets_minimum = total >= policy.minimum_order_paise;
    let shortfall = if meets_minimum {
        0
    } else {
        policy.minimum_order_paise - total
    };

    CartTotals {
        item_count,
        total_quantity,
        subtotal_paise: subtotal,
        delivery_paise: delivery,
        total_paise: total,
        meets_minimum,
        shortfall_paise: shortfall,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
