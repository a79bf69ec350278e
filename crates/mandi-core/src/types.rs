//! # Domain Types
//!
//! Core domain types for the Mandi storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │ AttributeStock  │   │ RepaymentRules  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (opaque)    │   │  attributes     │   │  discount_tiers │       │
//! │  │  name           │   │  display_stock  │   │  interest_tiers │       │
//! │  │  user price     │   │  user price     │   └─────────────────┘       │
//! │  │  vendor price   │   │  vendor price   │                             │
//! │  │  attr stocks[]  │   │  stock unit     │   ┌─────────────────┐       │
//! │  └─────────────────┘   └─────────────────┘   │      Rate       │       │
//! │                                              │  bps (u32)      │       │
//! │  ┌─────────────────┐   ┌─────────────────┐   │  500 = 5.00%    │       │
//! │  │   BuyerRole     │   │    StockUnit    │   └─────────────────┘       │
//! │  │  User | Vendor  │   │  mg g kg ml L.. │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Products and repayment rules arrive from the catalog/rules REST
//! collaborators and are read-only here; everything the core derives from
//! them is recomputed, never written back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::attrs::{deserialize_attribute_map, AttributeSet, VariantKey};
use crate::MAX_ITEM_QUANTITY;

// =============================================================================
// Rate
// =============================================================================

/// Percentage rate represented in basis points (bps).
///
/// 1 basis point = 0.01% = 1/10000. 500 bps = 5.00% (a typical
/// early-settlement discount tier).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Creates a rate from a percentage (admin configuration uses percent).
    pub fn from_percentage(pct: f64) -> Self {
        Rate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

// =============================================================================
// Stock Unit
// =============================================================================

/// Unit in which a stock figure is measured.
///
/// Wire strings match the catalog API exactly ("mg", "g", "kg", "ml",
/// "L", "bag", "unit", "packet", "bottle").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum StockUnit {
    #[serde(rename = "mg")]
    Milligram,
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "ml")]
    Millilitre,
    #[serde(rename = "L")]
    Litre,
    #[serde(rename = "bag")]
    Bag,
    #[serde(rename = "unit")]
    Unit,
    #[serde(rename = "packet")]
    Packet,
    #[serde(rename = "bottle")]
    Bottle,
}

impl Default for StockUnit {
    fn default() -> Self {
        StockUnit::Unit
    }
}

// =============================================================================
// Buyer Role
// =============================================================================

/// Who is shopping. Selects the applicable price column and the
/// minimum-order threshold that gates checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BuyerRole {
    /// End customer buying retail quantities.
    User,
    /// Vendor placing bulk orders, eligible for credit settlement.
    Vendor,
}

impl BuyerRole {
    /// Minimum order value for this role, in paise.
    pub const fn min_order_paise(&self) -> i64 {
        match self {
            BuyerRole::User => crate::MIN_ORDER_USER_PAISE,
            BuyerRole::Vendor => crate::MIN_ORDER_VENDOR_PAISE,
        }
    }
}

impl Default for BuyerRole {
    fn default() -> Self {
        BuyerRole::User
    }
}

// =============================================================================
// Attribute Stock
// =============================================================================

/// One purchasable combination of a product: a set of named attribute
/// values carrying its own stock figures and prices.
///
/// ## Invariants (enforced at admin data entry, not re-checked here)
/// - `display_stock <= actual_stock`
/// - `user_price_paise > vendor_price_paise`
///
/// ## Legacy attributes
/// Historical records stored attribute values as string arrays. The
/// deserializer collapses any array to its first element, so everything
/// past this boundary sees single-valued, canonically ordered attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AttributeStock {
    /// Attribute name → attribute value, canonical (sorted-key) order.
    #[serde(deserialize_with = "deserialize_attribute_map")]
    pub attributes: AttributeSet,

    /// Internal quantity on hand.
    pub actual_stock: i64,

    /// Customer-visible quantity.
    pub display_stock: i64,

    /// Unit the stock figures are measured in.
    #[serde(default)]
    pub stock_unit: StockUnit,

    /// Price for vendor bulk purchases, in paise.
    pub vendor_price_paise: i64,

    /// Price for end customers, in paise.
    pub user_price_paise: i64,
}

impl AttributeStock {
    /// Returns the unit price for the given buyer role, in paise.
    #[inline]
    pub fn price_for(&self, role: BuyerRole) -> i64 {
        match role {
            BuyerRole::User => self.user_price_paise,
            BuyerRole::Vendor => self.vendor_price_paise,
        }
    }

    /// Upper clamp for quantities of this variant.
    ///
    /// Display stock when present, else actual stock, else the crate-wide
    /// quantity cap.
    pub fn quantity_ceiling(&self) -> i64 {
        if self.display_stock > 0 {
            self.display_stock
        } else if self.actual_stock > 0 {
            self.actual_stock
        } else {
            MAX_ITEM_QUANTITY
        }
    }

    /// Canonical key identifying this variant by its attribute set.
    pub fn variant_key(&self) -> VariantKey {
        VariantKey::from_attributes(&self.attributes)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog, as served by the product read endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Opaque identifier assigned by the backend.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Optional description.
    pub description: Option<String>,

    /// Category the product is listed under.
    pub category: Option<String>,

    /// Base price for end customers, in paise.
    pub price_to_user_paise: i64,

    /// Base price for vendors, in paise.
    pub price_to_vendor_paise: i64,

    /// Base stock figure, used when no attribute stocks exist.
    pub stock: Option<i64>,

    /// Unit for the base stock figure.
    pub stock_unit: Option<StockUnit>,

    /// Purchasable attribute combinations. Empty for simple products.
    #[serde(default)]
    pub attribute_stocks: Vec<AttributeStock>,

    /// Explicit grouping key for the variant picker. Legacy products lack
    /// it and fall back to the structuring heuristic.
    #[serde(default)]
    pub variant_name_key: Option<String>,

    /// Whether the product is visible in the storefront.
    #[serde(default = "default_true")]
    pub is_active: bool,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Whether this product is sold in attribute-stock variants.
    #[inline]
    pub fn has_variants(&self) -> bool {
        !self.attribute_stocks.is_empty()
    }

    /// Base unit price for the given buyer role, in paise.
    #[inline]
    pub fn price_for(&self, role: BuyerRole) -> i64 {
        match role {
            BuyerRole::User => self.price_to_user_paise,
            BuyerRole::Vendor => self.price_to_vendor_paise,
        }
    }
}

// =============================================================================
// Repayment Tiers
// =============================================================================

/// One admin-configured day range with an associated percentage rate.
///
/// `rate` is a percentage as the admin entered it (5 = 5%, 2.5 = 2.5%);
/// the calculator converts to basis points when building segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Tier {
    /// First day of the range (inclusive).
    pub start: i64,
    /// Last day of the range (inclusive).
    pub end: i64,
    /// Rate in percent.
    pub rate: f64,
    /// Optional display name ("Early payment", "Late settlement", ...).
    #[serde(default)]
    pub name: Option<String>,
}

impl Tier {
    /// Whether the range and rate are internally coherent.
    pub fn is_well_formed(&self) -> bool {
        self.start >= 0 && self.end >= self.start && self.rate >= 0.0 && self.rate <= 100.0
    }
}

/// Admin-configured repayment rules: discount tiers for paying early,
/// interest tiers for paying late.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RepaymentRules {
    #[serde(default)]
    pub discount_tiers: Vec<Tier>,
    #[serde(default)]
    pub interest_tiers: Vec<Tier>,
}

impl RepaymentRules {
    /// Whether both tier lists are empty.
    pub fn is_empty(&self) -> bool {
        self.discount_tiers.is_empty() && self.interest_tiers.is_empty()
    }

    /// Returns a copy with each list sorted by `start`, malformed tiers
    /// dropped, and tiers overlapping their predecessor dropped (the
    /// earlier range wins).
    ///
    /// Admin configuration is not trusted to be sorted or non-overlapping;
    /// the calculator only ever consumes sanitized rules.
    pub fn sanitized(&self) -> RepaymentRules {
        RepaymentRules {
            discount_tiers: sanitize_tiers(&self.discount_tiers),
            interest_tiers: sanitize_tiers(&self.interest_tiers),
        }
    }

    /// Hardcoded fallback used when the rules endpoint has nothing for us.
    pub fn fallback() -> RepaymentRules {
        RepaymentRules {
            discount_tiers: vec![Tier {
                start: 0,
                end: 15,
                rate: 5.0,
                name: Some("Early payment".to_string()),
            }],
            interest_tiers: vec![Tier {
                start: 45,
                end: 60,
                rate: 2.0,
                name: Some("Late settlement".to_string()),
            }],
        }
    }
}

fn sanitize_tiers(tiers: &[Tier]) -> Vec<Tier> {
    let mut sorted: Vec<Tier> = tiers.iter().filter(|t| t.is_well_formed()).cloned().collect();
    sorted.sort_by_key(|t| t.start);

    let mut out: Vec<Tier> = Vec::with_capacity(sorted.len());
    for tier in sorted {
        match out.last() {
            Some(prev) if tier.start <= prev.end => continue,
            _ => out.push(tier),
        }
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(start: i64, end: i64, rate: f64) -> Tier {
        Tier {
            start,
            end,
            rate,
            name: None,
        }
    }

    #[test]
    fn test_rate_from_bps() {
        let rate = Rate::from_bps(500);
        assert_eq!(rate.bps(), 500);
        assert!((rate.percentage() - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_rate_from_percentage() {
        assert_eq!(Rate::from_percentage(5.0).bps(), 500);
        assert_eq!(Rate::from_percentage(2.5).bps(), 250);
    }

    #[test]
    fn test_stock_unit_wire_names() {
        assert_eq!(serde_json::to_string(&StockUnit::Kilogram).unwrap(), "\"kg\"");
        assert_eq!(serde_json::to_string(&StockUnit::Litre).unwrap(), "\"L\"");
        let unit: StockUnit = serde_json::from_str("\"packet\"").unwrap();
        assert_eq!(unit, StockUnit::Packet);
    }

    #[test]
    fn test_buyer_role_minimums() {
        assert_eq!(BuyerRole::User.min_order_paise(), crate::MIN_ORDER_USER_PAISE);
        assert_eq!(BuyerRole::Vendor.min_order_paise(), crate::MIN_ORDER_VENDOR_PAISE);
    }

    #[test]
    fn test_attribute_stock_legacy_array_values() {
        // Historical records store some attribute values as arrays; the
        // first element wins.
        let json = r#"{
            "attributes": {"variety": ["Basmati", "Sona Masoori"], "grade": "A"},
            "actualStock": 50,
            "displayStock": 40,
            "stockUnit": "kg",
            "vendorPricePaise": 9000,
            "userPricePaise": 12000
        }"#;
        let stock: AttributeStock = serde_json::from_str(json).unwrap();
        assert_eq!(stock.attributes.get("variety").map(String::as_str), Some("Basmati"));
        assert_eq!(stock.attributes.get("grade").map(String::as_str), Some("A"));
    }

    #[test]
    fn test_quantity_ceiling_fallbacks() {
        let mut stock = AttributeStock {
            attributes: AttributeSet::new(),
            actual_stock: 50,
            display_stock: 40,
            stock_unit: StockUnit::Kilogram,
            vendor_price_paise: 9000,
            user_price_paise: 12000,
        };
        assert_eq!(stock.quantity_ceiling(), 40);

        stock.display_stock = 0;
        assert_eq!(stock.quantity_ceiling(), 50);

        stock.actual_stock = 0;
        assert_eq!(stock.quantity_ceiling(), MAX_ITEM_QUANTITY);
    }

    #[test]
    fn test_sanitized_sorts_and_drops_overlaps() {
        let rules = RepaymentRules {
            discount_tiers: vec![tier(16, 30, 3.0), tier(0, 15, 5.0), tier(10, 40, 1.0)],
            interest_tiers: vec![tier(45, 60, 2.0)],
        };
        let clean = rules.sanitized();
        // Sorted by start; the 10-40 tier overlaps 0-15 and is dropped.
        assert_eq!(clean.discount_tiers.len(), 2);
        assert_eq!(clean.discount_tiers[0].start, 0);
        assert_eq!(clean.discount_tiers[1].start, 16);
        assert_eq!(clean.interest_tiers.len(), 1);
    }

    #[test]
    fn test_sanitized_drops_malformed() {
        let rules = RepaymentRules {
            discount_tiers: vec![tier(15, 0, 5.0), tier(-3, 10, 5.0), tier(0, 10, 150.0)],
            interest_tiers: vec![],
        };
        assert!(rules.sanitized().discount_tiers.is_empty());
    }
}
