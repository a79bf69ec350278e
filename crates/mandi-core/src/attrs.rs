//! # Attribute/Variant Resolver
//!
//! Maps a product's heterogeneous attribute-stock entries into a two-level
//! selectable structure (grouping attribute → properties) and resolves a
//! shopper's selections back to matching stock entries.
//!
//! ## Resolution Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Variant Resolution Flow                              │
//! │                                                                         │
//! │  Product.attribute_stocks                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  attribute_structure() ──► { name_key, names[], properties }            │
//! │       │                        (drives the variant picker UI)           │
//! │       ▼                                                                 │
//! │  select_value() ──► Selection (attribute key → chosen value)            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  resolve_match() ──► matching AttributeStock                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  VariantSelection.toggle() ──► multi-variant set, quantities clamped    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  price_view() / total_paise() ──► what the shopper sees                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Canonical attribute sets
//! Attribute sets live in a `BTreeMap`, so two logically equal sets always
//! produce the same [`VariantKey`] regardless of the key order the backend
//! happened to serialize. Legacy array-valued attributes are collapsed to
//! their first element at the serde boundary and never reach this module.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::types::{AttributeStock, BuyerRole, Product, StockUnit};

/// A canonical (sorted-key) attribute set: attribute name → value.
pub type AttributeSet = BTreeMap<String, String>;

// =============================================================================
// Legacy Value Normalization
// =============================================================================

/// Attribute values as the backend historically stored them: a plain
/// string, or an array of strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawAttributeValue {
    One(String),
    Many(Vec<String>),
}

/// Deserializes an attribute map, collapsing legacy array values to their
/// first element. Keys whose array is empty are dropped.
pub(crate) fn deserialize_attribute_map<'de, D>(deserializer: D) -> Result<AttributeSet, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: BTreeMap<String, RawAttributeValue> = BTreeMap::deserialize(deserializer)?;
    let mut out = AttributeSet::new();
    for (key, value) in raw {
        match value {
            RawAttributeValue::One(v) => {
                out.insert(key, v);
            }
            RawAttributeValue::Many(vs) => {
                if let Some(first) = vs.into_iter().next() {
                    out.insert(key, first);
                }
            }
        }
    }
    Ok(out)
}

// =============================================================================
// Variant Key
// =============================================================================

/// Canonical identity of a variant, derived from its attribute set.
///
/// Built from sorted `key=value` pairs, so logically equal attribute sets
/// always compare equal, never depending on incidental serialization order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VariantKey(String);

impl VariantKey {
    /// Derives the key for an attribute set.
    ///
    /// ## Example
    /// ```rust
    /// use mandi_core::attrs::{AttributeSet, VariantKey};
    ///
    /// let mut attrs = AttributeSet::new();
    /// attrs.insert("variety".to_string(), "Basmati".to_string());
    /// attrs.insert("grade".to_string(), "A".to_string());
    ///
    /// // BTreeMap ordering makes the key canonical
    /// assert_eq!(VariantKey::from_attributes(&attrs).as_str(), "grade=A|variety=Basmati");
    /// ```
    pub fn from_attributes(attributes: &AttributeSet) -> Self {
        let joined = attributes
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("|");
        VariantKey(joined)
    }

    /// The canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Attribute Structure
// =============================================================================

/// The two-level selectable structure the variant picker renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AttributeStructure {
    /// The attribute key chosen as the grouping "name" field.
    pub name_key: Option<String>,

    /// Distinct values of the grouping key, in first-seen order.
    pub names: Vec<String>,

    /// Per grouping value: the other attribute keys and their values
    /// (deduplicated, sorted ascending).
    pub properties: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

/// Builds the selectable structure for a product's attribute stocks.
///
/// ## Grouping key
/// A product's stored `variant_name_key` wins when it actually appears on
/// the stock entries. Legacy products carry no stored key; for those the
/// heuristic applies:
/// 1. Prefer a key whose name contains "name" or "attribute", or that
///    equals "type" when more than two keys exist in total.
/// 2. Otherwise pick the key with the most distinct values, excluding any
///    key whose value is unique per entry (a property, not a grouping
///    name). Ties break on iteration order.
/// 3. If nothing qualifies, the first key in iteration order is used.
///
/// Pure function of the product: repeated invocation returns an identical
/// structure.
pub fn attribute_structure(product: &Product) -> AttributeStructure {
    let entries = &product.attribute_stocks;
    if entries.is_empty() {
        return AttributeStructure::default();
    }

    let stored_key = product
        .variant_name_key
        .clone()
        .filter(|key| entries.iter().any(|e| e.attributes.contains_key(key)));
    let name_key = match stored_key.or_else(|| grouping_key(entries)) {
        Some(k) => k,
        None => return AttributeStructure::default(),
    };

    // Distinct grouping values, first-seen order.
    let mut names: Vec<String> = Vec::new();
    for entry in entries {
        if let Some(value) = entry.attributes.get(&name_key) {
            if !names.iter().any(|n| n == value) {
                names.push(value.clone());
            }
        }
    }

    // Per grouping value: every other key's values, deduplicated + sorted.
    let mut properties: BTreeMap<String, BTreeMap<String, Vec<String>>> = BTreeMap::new();
    for name in &names {
        let mut props: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for entry in entries {
            if entry.attributes.get(&name_key) != Some(name) {
                continue;
            }
            for (key, value) in &entry.attributes {
                if key != &name_key {
                    props.entry(key.clone()).or_default().insert(value.clone());
                }
            }
        }
        properties.insert(
            name.clone(),
            props
                .into_iter()
                .map(|(k, vs)| (k, vs.into_iter().collect()))
                .collect(),
        );
    }

    AttributeStructure {
        name_key: Some(name_key),
        names,
        properties,
    }
}

fn grouping_key(entries: &[AttributeStock]) -> Option<String> {
    // Union of attribute keys, first-seen order.
    let mut keys: Vec<&str> = Vec::new();
    for entry in entries {
        for key in entry.attributes.keys() {
            if !keys.contains(&key.as_str()) {
                keys.push(key);
            }
        }
    }
    if keys.is_empty() {
        return None;
    }

    // Pass 1: naming convention.
    for key in &keys {
        let lower = key.to_lowercase();
        if lower.contains("name")
            || lower.contains("attribute")
            || (keys.len() > 2 && lower == "type")
        {
            return Some((*key).to_string());
        }
    }

    // Pass 2: most distinct values. A key whose value is unique per entry
    // is a property, not a grouping name.
    let mut best: Option<(&str, usize)> = None;
    for key in &keys {
        let values: Vec<&str> = entries
            .iter()
            .filter_map(|e| e.attributes.get(*key))
            .map(String::as_str)
            .collect();
        let occurrences = values.len();
        let distinct = values.into_iter().collect::<BTreeSet<_>>().len();
        if distinct == occurrences {
            continue;
        }
        if distinct > best.map(|(_, n)| n).unwrap_or(0) {
            best = Some((*key, distinct));
        }
    }

    Some(match best {
        Some((key, _)) => key.to_string(),
        None => keys[0].to_string(),
    })
}

// =============================================================================
// Selection & Matching
// =============================================================================

/// Records a choice in the selection map. Choosing a new value for the
/// grouping key clears every previously chosen property value (property
/// sets are scoped to the grouping value).
pub fn select_value(
    structure: &AttributeStructure,
    selection: &mut AttributeSet,
    key: &str,
    value: &str,
) {
    if structure.name_key.as_deref() == Some(key) {
        selection.clear();
    }
    selection.insert(key.to_string(), value.to_string());
}

/// A stock entry matches a selection when, for every key present in the
/// selection, the entry's value equals the selected value.
pub fn stock_matches(stock: &AttributeStock, selection: &AttributeSet) -> bool {
    selection
        .iter()
        .all(|(key, value)| stock.attributes.get(key) == Some(value))
}

/// Resolves a selection to the first matching stock entry, if any.
pub fn resolve_match<'a>(product: &'a Product, selection: &AttributeSet) -> Option<&'a AttributeStock> {
    product
        .attribute_stocks
        .iter()
        .find(|stock| stock_matches(stock, selection))
}

// =============================================================================
// Multi-Variant Selection
// =============================================================================

/// A variant the shopper has toggled on, with its frozen stock entry and
/// an independently tracked quantity.
#[derive(Debug, Clone, Serialize)]
pub struct ChosenVariant {
    pub stock: AttributeStock,
    pub quantity: i64,
}

/// The set of variants chosen for a simultaneous cart add.
///
/// ## Invariants
/// - Every tracked quantity `q` satisfies `1 <= q <= quantity_ceiling()`
/// - Toggling a variant off discards its quantity state; toggling it back
///   on starts again at 1
#[derive(Debug, Clone, Default, Serialize)]
pub struct VariantSelection {
    chosen: BTreeMap<VariantKey, ChosenVariant>,
}

impl VariantSelection {
    /// Creates an empty selection set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles a variant in or out of the set. Returns `true` when the
    /// variant is selected after the call.
    pub fn toggle(&mut self, stock: &AttributeStock) -> bool {
        let key = stock.variant_key();
        if self.chosen.remove(&key).is_some() {
            false
        } else {
            self.chosen.insert(
                key,
                ChosenVariant {
                    stock: stock.clone(),
                    quantity: 1,
                },
            );
            true
        }
    }

    /// Whether the given variant is currently selected.
    pub fn is_selected(&self, key: &VariantKey) -> bool {
        self.chosen.contains_key(key)
    }

    /// Current quantity for a selected variant.
    pub fn quantity(&self, key: &VariantKey) -> Option<i64> {
        self.chosen.get(key).map(|c| c.quantity)
    }

    /// Sets a variant's quantity, silently clamped to
    /// `[1, quantity_ceiling()]`. Unknown keys are ignored.
    pub fn set_quantity(&mut self, key: &VariantKey, quantity: i64) {
        if let Some(chosen) = self.chosen.get_mut(key) {
            chosen.quantity = quantity.clamp(1, chosen.stock.quantity_ceiling());
        }
    }

    /// Increments a variant's quantity by one, clamped at the ceiling.
    pub fn increment(&mut self, key: &VariantKey) {
        if let Some(q) = self.quantity(key) {
            self.set_quantity(key, q + 1);
        }
    }

    /// Decrements a variant's quantity by one, floored at 1.
    pub fn decrement(&mut self, key: &VariantKey) {
        if let Some(q) = self.quantity(key) {
            self.set_quantity(key, q - 1);
        }
    }

    /// Number of selected variants.
    pub fn len(&self) -> usize {
        self.chosen.len()
    }

    /// Whether no variant is selected.
    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }

    /// Clears the entire set, discarding all quantity state.
    pub fn clear(&mut self) {
        self.chosen.clear();
    }

    /// Iterates over selected variants in canonical key order.
    pub fn iter(&self) -> impl Iterator<Item = (&VariantKey, &ChosenVariant)> {
        self.chosen.iter()
    }

    /// The single selected variant, when exactly one is selected.
    pub fn single(&self) -> Option<&ChosenVariant> {
        if self.chosen.len() == 1 {
            self.chosen.values().next()
        } else {
            None
        }
    }

    /// Total over all selected variants: Σ unit price × quantity.
    pub fn total_paise(&self, role: BuyerRole) -> i64 {
        self.chosen
            .values()
            .map(|c| c.stock.price_for(role) * c.quantity)
            .sum()
    }
}

// =============================================================================
// Price/Stock View
// =============================================================================

/// The "current" price/stock/unit panel shown next to the variant picker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceView {
    pub unit_price_paise: i64,
    pub stock: i64,
    pub stock_unit: StockUnit,
}

/// Resolves the displayed price/stock/unit: the single selected entry's
/// values when exactly one variant is selected, the product's base fields
/// otherwise. (With multiple variants selected the UI shows
/// [`VariantSelection::total_paise`] instead of a unit price.)
pub fn price_view(product: &Product, selection: &VariantSelection, role: BuyerRole) -> PriceView {
    match selection.single() {
        Some(chosen) => PriceView {
            unit_price_paise: chosen.stock.price_for(role),
            stock: chosen.stock.display_stock,
            stock_unit: chosen.stock.stock_unit,
        },
        None => PriceView {
            unit_price_paise: product.price_for(role),
            stock: product.stock.unwrap_or(0),
            stock_unit: product.stock_unit.unwrap_or_default(),
        },
    }
}

/// Gate for the add-to-cart action: a product sold in variants requires at
/// least one selected variant. Reported as a value for the UI to surface,
/// never a panic.
pub fn ensure_variant_chosen(product: &Product, selection: &VariantSelection) -> Result<(), CoreError> {
    if product.has_variants() && selection.is_empty() {
        return Err(CoreError::VariantRequired {
            product: product.name.clone(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
