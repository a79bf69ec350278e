//! # State Module
//!
//! Manages the transient state of one shopper's UI session.
//!
//! Separate state types rather than one monolith: the cart, the product
//! cache, and the rules cache are independently locked, so a product
//! fetch landing never blocks a cart mutation.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       SessionState                                      │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │  CartState   │  │   Catalog    │  │    RulesState    │              │
//! │  │              │  │              │  │                  │              │
//! │  │  Arc<Mutex<  │  │  HashMap by  │  │  fetched rules   │              │
//! │  │    Cart>>    │  │  product id  │  │  or fallback     │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  All state is owned by this session; no cross-session sharing.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod catalog;

pub use cart::{Cart, CartEntry, CartState};
pub use catalog::{Catalog, RulesState};

use std::sync::Mutex;

use mandi_core::types::BuyerRole;

/// Everything one shopper's session owns.
#[derive(Debug)]
pub struct SessionState {
    /// The shopping cart.
    pub cart: CartState,

    /// Who is shopping; fixed for the lifetime of the session.
    role: BuyerRole,

    catalog: Mutex<Catalog>,
    rules: Mutex<RulesState>,
}

impl SessionState {
    /// Creates a fresh session for a buyer role.
    pub fn new(role: BuyerRole) -> Self {
        SessionState {
            cart: CartState::new(),
            role,
            catalog: Mutex::new(Catalog::new()),
            rules: Mutex::new(RulesState::new()),
        }
    }

    /// The session's buyer role.
    pub fn role(&self) -> BuyerRole {
        self.role
    }

    /// Executes a function with read access to the product cache.
    pub fn with_catalog<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Catalog) -> R,
    {
        let catalog = self.catalog.lock().expect("Catalog mutex poisoned");
        f(&catalog)
    }

    /// Executes a function with write access to the product cache.
    pub fn with_catalog_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Catalog) -> R,
    {
        let mut catalog = self.catalog.lock().expect("Catalog mutex poisoned");
        f(&mut catalog)
    }

    /// Executes a function with read access to the rules cache.
    pub fn with_rules<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&RulesState) -> R,
    {
        let rules = self.rules.lock().expect("Rules mutex poisoned");
        f(&rules)
    }

    /// Executes a function with write access to the rules cache.
    pub fn with_rules_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut RulesState) -> R,
    {
        let mut rules = self.rules.lock().expect("Rules mutex poisoned");
        f(&mut rules)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(BuyerRole::User)
    }
}
