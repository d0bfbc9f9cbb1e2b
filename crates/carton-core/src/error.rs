//! # Error Types
//!
//! Domain error types for carton-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  carton-core errors (this file)                                     │
//! │  ├── PolicyError  - discount code rejections                        │
//! │  └── CartError    - cart operation preconditions                    │
//! │                                                                     │
//! │  carton-store errors (separate crate)                               │
//! │  ├── StorageError - persistence failures                            │
//! │  └── SyncError    - reconciliation failures                         │
//! │                                                                     │
//! │  Safe wrappers render these to the cart-level error string; the     │
//! │  Display impls below ARE the user-facing messages.                  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Policy Error
// =============================================================================

/// Discount-code rejections from the validation layer.
///
/// Raised before any state mutation; a rejected code leaves the cart
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// The code is already in the active set.
    #[error("Discount '{code}' is already applied")]
    DuplicateDiscount { code: String },

    /// Discount value must be positive for every kind.
    #[error("Discount '{code}' has a non-positive value")]
    NonPositiveValue { code: String },

    /// A percentage discount cannot exceed 100% (10000 bps).
    #[error("Discount '{code}' exceeds 100%")]
    PercentageOutOfRange { code: String },
}

// =============================================================================
// Cart Error
// =============================================================================

/// Cart operation precondition failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Quantity must be at least 1.
    #[error("Quantity must be positive")]
    NonPositiveQuantity,

    /// Quantity exceeds the per-line maximum.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Cart has reached its maximum number of distinct lines.
    #[error("Cart cannot have more than {max} items")]
    CartFull { max: usize },

    /// Referenced line item is not in the cart (safe wrappers only; the
    /// store-level operations are permissive).
    #[error("Item not found in cart: {id}")]
    ItemNotFound { id: String },

    /// Discount policy rejection (wraps PolicyError).
    #[error(transparent)]
    Policy(#[from] PolicyError),
}

/// Convenience alias for cart-rule results.
pub type CartResult<T> = Result<T, CartError>;

// =============================================================================
// Unit Tests
// =============================================================================
