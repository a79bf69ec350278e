//! # Commands Module
//!
//! The command-style API the storefront frontend invokes. Each command
//! logs its entry, borrows the session state it needs, delegates math to
//! mandi-core, and returns a serializable response or an [`ApiError`].
//!
//! [`ApiError`]: crate::error::ApiError

mod cart;
mod checkout;

pub use cart::{add_to_cart, clear_cart, get_cart, remove_from_cart, update_cart_item, CartView};
pub use checkout::{cart_totals, credit_quote, merge_products, set_repayment_rules};
