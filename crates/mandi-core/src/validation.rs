//! # Validation Module
//!
//! Input validation utilities for the storefront core.
//!
//! These run at the edges (admin forms, command parameters) before
//! business logic. Runtime paths prefer silent clamping and sanitizing
//! over rejection; the strict validators here exist for data-entry
//! surfaces that want to tell the operator what is wrong.
//!
//! ## Usage
//! ```rust,no_run
//! use mandi_core::validation::{validate_product_name, validate_quantity};
//!
//! validate_product_name("Wheat Seed 5kg").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::types::Tier;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates an attribute key.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
pub fn validate_attribute_key(key: &str) -> ValidationResult<()> {
    let key = key.trim();

    if key.is_empty() {
        return Err(ValidationError::Required {
            field: "attribute key".to_string(),
        });
    }

    if key.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "attribute key".to_string(),
            max: 50,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in paise.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items, samples)
pub fn validate_price_paise(paise: i64) -> ValidationResult<()> {
    if paise < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Tier Validators
// =============================================================================

/// Validates a single repayment tier.
///
/// ## Rules
/// - `start >= 0` and `end >= start`
/// - Rate between 0% and 100%
pub fn validate_tier(tier: &Tier) -> ValidationResult<()> {
    if tier.start < 0 || tier.end < tier.start {
        return Err(ValidationError::InvalidFormat {
            field: "tier".to_string(),
            reason: format!("day range {}-{} is not ascending", tier.start, tier.end),
        });
    }

    if !(0.0..=100.0).contains(&tier.rate) {
        return Err(ValidationError::OutOfRange {
            field: "tier rate".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

/// Validates an ordered tier list: each tier well-formed, sorted by
/// `start`, no overlap with its predecessor.
///
/// The runtime calculator sanitizes instead of rejecting; this strict
/// variant is for the admin configuration surface.
pub fn validate_tiers(tiers: &[Tier]) -> ValidationResult<()> {
    let mut prev_end: Option<i64> = None;
    for tier in tiers {
        validate_tier(tier)?;
        if let Some(end) = prev_end {
            if tier.start <= end {
                return Err(ValidationError::OverlappingTier { start: tier.start });
            }
        }
        prev_end = Some(tier.end);
    }
    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates cart size (number of distinct lines).
///
/// ## Rules
/// - Must not exceed MAX_CART_ITEMS (100)
pub fn validate_cart_size(current_items: usize) -> ValidationResult<()> {
    if current_items >= MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: MAX_CART_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates a UUID string format.
///
/// Cart entry identifiers are UUID v4; product identifiers are opaque
/// backend strings and are only checked for non-emptiness.
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

/// Validates an opaque product identifier.
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "product id".to_string(),
        });
    }
    Ok(())
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
    fn test_validate_product_name() {
        assert!(validate_product_name("Wheat Seed 5kg").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_attribute_key() {
        assert!(validate_attribute_key("variety").is_ok());
        assert!(validate_attribute_key("").is_err());
        assert!(validate_attribute_key(&"k".repeat(60)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price_paise() {
        assert!(validate_price_paise(0).is_ok());
        assert!(validate_price_paise(1099).is_ok());
        assert!(validate_price_paise(-100).is_err());
    }

    #[test]
    fn test_validate_tier() {
        assert!(validate_tier(&tier(0, 15, 5.0)).is_ok());
        assert!(validate_tier(&tier(15, 0, 5.0)).is_err());
        assert!(validate_tier(&tier(0, 15, 150.0)).is_err());
        assert!(validate_tier(&tier(-1, 15, 5.0)).is_err());
    }

    #[test]
    fn test_validate_tiers_rejects_overlap_and_disorder() {
        assert!(validate_tiers(&[tier(0, 15, 5.0), tier(16, 30, 3.0)]).is_ok());
        assert!(validate_tiers(&[tier(0, 15, 5.0), tier(10, 30, 3.0)]).is_err());
        assert!(validate_tiers(&[tier(16, 30, 3.0), tier(0, 15, 5.0)]).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }

    #[test]
    fn test_validate_product_id() {
        assert!(validate_product_id("64a1f0c2e5b3a9d8c7f6e5d4").is_ok());
        assert!(validate_product_id("  ").is_err());
    }
}
