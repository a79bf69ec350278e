//! # API Error Type
//!
//! Unified error type for storefront commands.
//!
//! Commands return `Result<T, ApiError>`; the serialized form is what the
//! frontend receives when a command fails:
//!
//! ```json
//! {
//!   "code": "VALIDATION_ERROR",
//!   "message": "Select at least one variant of Wheat Seed"
//! }
//! ```
//!
//! Both a machine-readable `code` (for programmatic handling, e.g.
//! scrolling the variant picker into view) and a human-readable `message`
//! are included.

use serde::Serialize;
use ts_rs::TS;

use mandi_core::CoreError;

/// API error returned from storefront commands.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Business rule violation
    BusinessLogic,

    /// Cart operation failed
    CartError,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a cart error.
    pub fn cart(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CartError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::VariantRequired { .. } => ApiError::validation(err.to_string()),
            CoreError::CartTooLarge { .. } => ApiError::cart(err.to_string()),
            CoreError::QuantityTooLarge { .. } => ApiError::cart(err.to_string()),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_required_maps_to_validation() {
        let err: ApiError = CoreError::VariantRequired {
            product: "Wheat Seed".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "Select at least one variant of Wheat Seed");
    }

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::not_found("Product", "p-1");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Product not found: p-1");
    }
}
