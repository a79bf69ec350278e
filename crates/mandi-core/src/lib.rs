//! # mandi-core: Pure Business Logic for the Mandi Storefront
//!
//! This crate is the **heart** of the Mandi agricultural-goods storefront.
//! It contains all business logic as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Mandi Storefront Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     Frontend (React SPA)                        │   │
//! │  │   Catalog UI ──► Variant Picker ──► Cart UI ──► Checkout UI    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                mandi-session (Command Layer)                    │   │
//! │  │   get_cart, add_to_cart, cart_totals, credit_quote, ...        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                ★ mandi-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌────────┐ ┌────────┐ ┌────────┐ ┌────────┐ ┌────────────┐  │   │
//! │  │   │ types  │ │ money  │ │ attrs  │ │ credit │ │ cart       │  │   │
//! │  │   │Product │ │ Money  │ │Variants│ │ Tiers  │ │ Totals     │  │   │
//! │  │   │ Tiers  │ │ Rate   │ │Matching│ │ Quote  │ │ Grouping   │  │   │
//! │  │   └────────┘ └────────┘ └────────┘ └────────┘ └────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO PERSISTENCE • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, AttributeStock, Tier, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`attrs`] - Attribute/variant resolution and multi-variant selection
//! - [`credit`] - Tiered credit/discount calculator for settlement sliders
//! - [`cart`] - Cart grouping and totals aggregation
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Network, file system, persistence access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in paise (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use mandi_core::money::Money;
//! use mandi_core::types::Rate;
//!
//! // Create money from paise (never from floats!)
//! let subtotal = Money::from_paise(1_000_000); // ₹10,000.00
//!
//! // Apply an early-settlement discount of 5%
//! let rate = Rate::from_bps(500); // 5.00%
//! let discount = subtotal.apply_rate(rate);
//!
//! assert_eq!(discount.paise(), 50_000); // ₹500.00
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod attrs;
pub mod cart;
pub mod credit;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use mandi_core::Money` instead of
// `use mandi_core::money::Money`

pub use attrs::{
    attribute_structure, ensure_variant_chosen, price_view, resolve_match, select_value,
    stock_matches, AttributeSet, AttributeStructure, PriceView, VariantKey, VariantSelection,
};
pub use cart::{compute_totals, group_lines, CartGroup, CartLine, CartTotals, CheckoutPolicy};
pub use credit::{build_segments, credit_quote, CreditQuote, Segment, SegmentKind};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable order sizes.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single cart line
///
/// Also the clamp ceiling for variant quantities when a stock entry
/// carries neither a display stock nor an actual stock figure.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Minimum order value for end customers, in paise (₹500.00)
pub const MIN_ORDER_USER_PAISE: i64 = 50_000;

/// Minimum order value for vendor bulk purchases, in paise (₹5,000.00)
pub const MIN_ORDER_VENDOR_PAISE: i64 = 500_000;

/// Subtotal at or above which delivery is free, in paise (₹1,000.00)
pub const FREE_DELIVERY_THRESHOLD_PAISE: i64 = 100_000;

/// Flat delivery fee below the free-delivery threshold, in paise (₹50.00)
pub const DELIVERY_FEE_PAISE: i64 = 5_000;
