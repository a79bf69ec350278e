//! # mandi-session: Storefront Session Layer
//!
//! Holds the transient state of one shopper's UI session and exposes the
//! command-style API the frontend invokes.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Session Layer Responsibilities                      │
//! │                                                                         │
//! │  Frontend Action           Command                 State Change         │
//! │  ───────────────           ───────                 ────────────         │
//! │                                                                         │
//! │  Add to cart ────────────► add_to_cart() ────────► cart entries merge   │
//! │  Change quantity ────────► update_cart_item() ───► qty floored at 1     │
//! │  Remove line ────────────► remove_from_cart() ───► entry removed        │
//! │  Product fetch lands ────► merge_products() ─────► cache grows          │
//! │  Move settlement slider ─► credit_quote() ───────► (read only)          │
//! │  Open cart drawer ───────► cart_totals() ────────► (read only)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All state is owned exclusively by the UI session; nothing here is
//! shared across sessions or persisted. Math is delegated to
//! [`mandi_core`]; this crate owns state, logging, and error translation.

pub mod commands;
pub mod error;
pub mod state;

pub use commands::{
    add_to_cart, cart_totals, clear_cart, credit_quote, get_cart, merge_products,
    remove_from_cart, set_repayment_rules, update_cart_item, CartView,
};
pub use error::{ApiError, ErrorCode};
pub use state::{Cart, CartEntry, CartState, Catalog, RulesState, SessionState};
