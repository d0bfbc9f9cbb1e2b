//! # Discount & Cart Policy
//!
//! Validation rules that sit above the raw cart mutations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                              │
//! │                                                                     │
//! │  Layer 1: Frontend                                                  │
//! │  └── Format checks, immediate feedback                              │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: THIS MODULE (pure rules)                                  │
//! │  ├── Discount policy (duplicate / bounds)                           │
//! │  └── Quantity and cart-size bounds                                  │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: CartStore safe wrappers                                   │
//! │  └── Fire-and-report: rejection → cart-level error string           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use crate::error::{CartError, CartResult, PolicyError};
use crate::types::{Discount, DiscountKind, LineItem, ProductSnapshot, VariantSnapshot};

// =============================================================================
// Discount Policy
// =============================================================================

/// Validates a discount against the currently active set.
///
/// ## Rules
/// - the code must not already be present (no duplicates),
/// - `value` must be positive for every kind,
/// - a percentage discount must not exceed 100% (10000 bps).
///
/// Kinds are deliberately NOT mutually exclusive: stacking multiple
/// discounts is allowed and any change to that is a product decision,
/// not a validation fix.
pub fn validate_discount(discount: &Discount, active: &[Discount]) -> Result<(), PolicyError> {
    if active.iter().any(|d| d.code == discount.code) {
        return Err(PolicyError::DuplicateDiscount {
            code: discount.code.clone(),
        });
    }

    if discount.value <= 0 {
        return Err(PolicyError::NonPositiveValue {
            code: discount.code.clone(),
        });
    }

    if discount.kind == DiscountKind::Percentage && discount.value > 10_000 {
        return Err(PolicyError::PercentageOutOfRange {
            code: discount.code.clone(),
        });
    }

    Ok(())
}

// =============================================================================
// Quantity & Size Bounds
// =============================================================================

/// Validates a requested line quantity.
///
/// ## Rules
/// - must be positive (zero means "remove", handled elsewhere)
/// - must not exceed the per-line maximum
pub fn validate_quantity(quantity: i64, max: i64) -> CartResult<()> {
    if quantity <= 0 {
        return Err(CartError::NonPositiveQuantity);
    }

    if quantity > max {
        return Err(CartError::QuantityTooLarge {
            requested: quantity,
            max,
        });
    }

    Ok(())
}

/// Validates that the cart can accept another distinct line.
pub fn validate_cart_size(current_lines: usize, max: usize) -> CartResult<()> {
    if current_lines >= max {
        return Err(CartError::CartFull { max });
    }

    Ok(())
}

// =============================================================================
// Catalog Revalidation
// =============================================================================

/// Freshly fetched catalog state for one product, including its current
/// variants. The input to [`validate_against_catalog`].
///
/// The stored cart only keeps frozen snapshots; revalidation needs the
/// live variant list too, because inventory moves after add-to-cart.
#[derive(Debug, Clone, PartialEq)]
pub struct FreshProduct {
    /// Current product data.
    pub product: ProductSnapshot,

    /// Current variants with up-to-date inventory. May be empty when
    /// the catalog did not return variant detail.
    pub variants: Vec<VariantSnapshot>,
}

impl FreshProduct {
    /// Fresh product with no variant detail.
    pub fn new(product: ProductSnapshot) -> Self {
        FreshProduct {
            product,
            variants: Vec::new(),
        }
    }

    /// Attaches current variant data.
    pub fn with_variants(mut self, variants: Vec<VariantSnapshot>) -> Self {
        self.variants = variants;
        self
    }
}

/// Compares stored cart snapshots against freshly fetched catalog data.
///
/// The cart never re-fetches the catalog itself; the embedder fetches
/// current products (keyed by product id) and hands them here. Returns
/// human-readable problem strings, one per violated expectation:
///
/// - product no longer in the catalog,
/// - product deactivated since it was added,
/// - product out of stock,
/// - chosen variant short on current inventory.
///
/// Variant inventory is read from the freshly fetched variant; the
/// number frozen at add time is only a fallback when the fresh fetch
/// carried no matching variant. `None` inventory means the catalog does
/// not track it.
///
/// An empty result means the cart is still valid as stored.
pub fn validate_against_catalog(
    items: &[LineItem],
    fresh: &HashMap<String, FreshProduct>,
) -> Vec<String> {
    let mut problems = Vec::new();

    for item in items {
        let Some(current) = fresh.get(&item.product_id) else {
            problems.push(format!("{} is no longer available", item.product.name));
            continue;
        };

        if !current.product.is_active {
            problems.push(format!("{} is no longer available", current.product.name));
            continue;
        }

        if !current.product.is_in_stock {
            problems.push(format!("{} is out of stock", current.product.name));
            continue;
        }

        if let Some(variant) = &item.variant {
            let inventory = current
                .variants
                .iter()
                .find(|v| v.id == variant.id)
                .map(|v| v.inventory)
                .unwrap_or(variant.inventory);

            if let Some(inventory) = inventory {
                if inventory < item.quantity {
                    problems.push(format!(
                        "Only {} of {} ({}) available",
                        inventory, current.product.name, variant.name
                    ));
                }
            }
        }
    }

    problems
}

// =============================================================================
// Unit Tests
// =============================================================================
