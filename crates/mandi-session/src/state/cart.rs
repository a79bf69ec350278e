//! # Cart State
//!
//! Manages the session's shopping cart.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>`: UI event handlers may invoke
//! commands concurrently, and only one may mutate the cart at a time.
//!
//! ## Invariants
//! - Entries are unique by (product id, variant key); adding the same
//!   variant again merges quantities
//! - Quantities are at least 1; decrementing floors at 1 and never
//!   removes the entry (removal is explicit)
//! - Incrementing is unbounded here; the stock ceiling is enforced by the
//!   variant resolver before entries are created
//! - Maximum distinct entries: `MAX_CART_ITEMS`

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

use mandi_core::attrs::{AttributeSet, VariantKey};
use mandi_core::cart::CartLine;
use mandi_core::types::{AttributeStock, BuyerRole, Product, StockUnit};
use mandi_core::{CoreError, MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// One line in the session cart.
///
/// Product data is frozen at the moment of adding: if the catalog updates
/// afterwards, the cart keeps displaying what the shopper agreed to.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    /// Entry identifier (UUID v4), assigned when the entry is created.
    pub id: String,

    /// Product ID (opaque backend identifier).
    pub product_id: String,

    /// Product name at time of adding (frozen).
    pub product_name: String,

    /// Variant attributes; empty for simple products.
    pub attributes: AttributeSet,

    /// Price in paise at time of adding (frozen).
    pub unit_price_paise: i64,

    /// Unit the quantity is measured in.
    pub stock_unit: StockUnit,

    /// Quantity in cart.
    pub quantity: i64,

    /// When this entry was added.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartEntry {
    /// Creates a cart entry from a product, optionally a selected variant
    /// stock, and a quantity.
    pub fn from_product(
        product: &Product,
        stock: Option<&AttributeStock>,
        quantity: i64,
        role: BuyerRole,
    ) -> Self {
        let (attributes, unit_price, stock_unit) = match stock {
            Some(stock) => (
                stock.attributes.clone(),
                stock.price_for(role),
                stock.stock_unit,
            ),
            None => (
                AttributeSet::new(),
                product.price_for(role),
                product.stock_unit.unwrap_or_default(),
            ),
        };

        CartEntry {
            id: uuid::Uuid::new_v4().to_string(),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            attributes,
            unit_price_paise: unit_price,
            stock_unit,
            quantity,
            added_at: Utc::now(),
        }
    }

    /// Canonical key for this entry's variant.
    pub fn variant_key(&self) -> VariantKey {
        VariantKey::from_attributes(&self.attributes)
    }

    /// Line total (unit price × quantity), in paise.
    pub fn line_total_paise(&self) -> i64 {
        self.unit_price_paise * self.quantity
    }

    /// The persisted cart-line shape the aggregation core consumes.
    pub fn to_line(&self) -> CartLine {
        CartLine {
            product_id: self.product_id.clone(),
            quantity: self.quantity,
            unit_price_paise: Some(self.unit_price_paise),
            price_paise: None,
            attributes: self.attributes.clone(),
        }
    }
}

/// The session shopping cart.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Entries in the cart.
    pub entries: Vec<CartEntry>,

    /// When the cart was created/last cleared.
    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            entries: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds an entry, merging quantities when the same (product, variant)
    /// pair is already present.
    pub fn add_entry(&mut self, entry: CartEntry) -> Result<(), CoreError> {
        let key = entry.variant_key();
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|e| e.product_id == entry.product_id && e.variant_key() == key)
        {
            let new_qty = existing.quantity + entry.quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            existing.quantity = new_qty;
            return Ok(());
        }

        if self.entries.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.entries.push(entry);
        Ok(())
    }

    /// Sets a line's quantity, floored at 1. The optimistic UI applies
    /// quantity changes immediately; going below 1 is disallowed rather
    /// than treated as removal, and there is no upper bound at this layer.
    pub fn update_quantity(
        &mut self,
        product_id: &str,
        key: &VariantKey,
        quantity: i64,
    ) -> Result<(), CoreError> {
        match self
            .entries
            .iter_mut()
            .find(|e| e.product_id == product_id && &e.variant_key() == key)
        {
            Some(entry) => {
                entry.quantity = quantity.max(1);
                Ok(())
            }
            None => Err(CoreError::ProductNotFound(product_id.to_string())),
        }
    }

    /// Removes a line by product id and variant key.
    pub fn remove_entry(&mut self, product_id: &str, key: &VariantKey) -> Result<(), CoreError> {
        let initial_len = self.entries.len();
        self.entries
            .retain(|e| !(e.product_id == product_id && &e.variant_key() == key));

        if self.entries.len() == initial_len {
            Err(CoreError::ProductNotFound(product_id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Clears all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.created_at = Utc::now();
    }

    /// Number of distinct entries.
    pub fn item_count(&self) -> usize {
        self.entries.len()
    }

    /// Total quantity over all entries.
    pub fn total_quantity(&self) -> i64 {
        self.entries.iter().map(|e| e.quantity).sum()
    }

    /// Whether the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The persisted cart-line shapes for the aggregation core.
    pub fn lines(&self) -> Vec<CartLine> {
        self.entries.iter().map(CartEntry::to_line).collect()
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutex-guarded cart state shared with command handlers.
#[derive(Debug)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        CartState {
            cart: Arc::new(Mutex::new(Cart::new())),
        }
    }

    /// Executes a function with read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&mut cart)
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::new()
    }
}
