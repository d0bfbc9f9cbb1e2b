//! # Pricing Calculator
//!
//! Pure summary computation over cart contents.
//!
//! ## Pricing Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     compute_summary                                 │
//! │                                                                     │
//! │  items ──────────► subtotal = Σ line totals                         │
//! │                    item_count = Σ quantities                        │
//! │                    weight = Σ grams × quantity                      │
//! │                                                                     │
//! │  shipping ───────► shipping = selected cost (or 0)                  │
//! │                                                                     │
//! │  discounts ──────► applied IN ORDER:                                │
//! │   (stacking)        percentage   → subtotal × bps                   │
//! │                     fixed_amount → min(value, subtotal)             │
//! │                     free_ship    → shipping = 0 (idempotent)        │
//! │                                                                     │
//! │  taxable = max(0, subtotal − discounts)   ← clamped                 │
//! │  tax     = taxable × tax_rate                                       │
//! │  total   = taxable + tax + shipping                                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Deterministic and side-effect free: identical inputs always produce
//! an identical [`CartSummary`].

use crate::money::Money;
use crate::types::{CartSummary, Discount, DiscountKind, LineItem, ShippingSelection, TaxRate};

// =============================================================================
// Configuration
// =============================================================================

/// Pricing and bounds configuration, constructed by the embedder and
/// passed into the store. No globals.
#[derive(Debug, Clone, Copy)]
pub struct CartConfig {
    /// Flat tax rate applied to the discounted subtotal.
    pub tax_rate: TaxRate,

    /// Maximum number of distinct cart lines.
    pub max_lines: usize,

    /// Maximum quantity on a single line.
    pub max_line_quantity: i64,
}

impl Default for CartConfig {
    fn default() -> Self {
        CartConfig {
            tax_rate: TaxRate::default(),
            max_lines: crate::MAX_CART_LINES,
            max_line_quantity: crate::MAX_LINE_QUANTITY,
        }
    }
}

// =============================================================================
// Summary Computation
// =============================================================================

/// Computes the cart summary from items, discounts, and shipping.
///
/// Discounts apply in the order given (the order they were added to the
/// cart) and stack freely; the only uniqueness rule is by code and that
/// is enforced upstream by the store. A `free_shipping` discount zeroes
/// the shipping charge and is idempotent; removing it restores the
/// selected cost on the next recomputation, because shipping always
/// starts from the live selection.
///
/// ## Negative-total clamp
/// When stacked discounts exceed the subtotal, the taxable amount is
/// clamped at zero, so tax and total never go negative. The reported
/// `discount_cents` still reflects the full accumulated discount.
///
/// ## Example
/// ```rust
/// use carton_core::pricing::{compute_summary, CartConfig};
/// use carton_core::types::{Discount, LineItem, ProductSnapshot};
///
/// let product = ProductSnapshot {
///     id: "p1".into(),
///     slug: "widget".into(),
///     name: "Widget".into(),
///     price_cents: 2000,
///     shipping_weight_grams: None,
///     is_active: true,
///     is_in_stock: true,
/// };
/// let items = vec![LineItem::new(product, None, 2)];
/// let discounts = vec![Discount::percentage("TEN", 1000, "10% off")];
///
/// let summary = compute_summary(&items, &discounts, None, &CartConfig::default());
/// assert_eq!(summary.subtotal_cents, 4000);
/// assert_eq!(summary.discount_cents, 400);
/// assert_eq!(summary.tax_cents, 288); // 8% of $36.00
/// assert_eq!(summary.total_cents, 3888);
/// ```
pub fn compute_summary(
    items: &[LineItem],
    discounts: &[Discount],
    shipping: Option<&ShippingSelection>,
    config: &CartConfig,
) -> CartSummary {
    let subtotal: Money = items
        .iter()
        .fold(Money::zero(), |acc, item| acc + item.total());
    let item_count: i64 = items.iter().map(|i| i.quantity).sum();
    let weight_grams: i64 = items.iter().map(|i| i.weight_grams()).sum();

    // Shipping starts from the live selection; free-shipping discounts
    // below may zero it.
    let mut shipping_amount = shipping.map(|s| s.cost()).unwrap_or_else(Money::zero);

    let mut discount_total = Money::zero();
    for discount in discounts {
        match discount.kind {
            DiscountKind::Percentage => {
                // Policy rejects non-positive values upstream; clamp here
                // anyway so an unchecked apply cannot wrap the cast.
                discount_total += subtotal.percentage_of(discount.value.clamp(0, 10_000) as u32);
            }
            DiscountKind::FixedAmount => {
                // A single fixed discount never contributes more than the
                // subtotal itself.
                discount_total += Money::from_cents(discount.value).min(subtotal);
            }
            DiscountKind::FreeShipping => {
                shipping_amount = Money::zero();
            }
        }
    }

    let taxable = (subtotal - discount_total).clamp_non_negative();
    let tax = taxable.percentage_of(config.tax_rate.bps());
    let total = taxable + tax + shipping_amount;

    CartSummary {
        subtotal_cents: subtotal.cents(),
        tax_cents: tax.cents(),
        shipping_cents: shipping_amount.cents(),
        discount_cents: discount_total.cents(),
        total_cents: total.cents(),
        item_count,
        weight_grams,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductSnapshot;

    fn product(id: &str, price_cents: i64, weight: Option<i64>) -> ProductSnapshot {
        ProductSnapshot {
            id: id.to_string(),
            slug: format!("product-{}", id),
            name: format!("Product {}", id),
            price_cents,
            shipping_weight_grams: weight,
            is_active: true,
            is_in_stock: true,
        }
    }

    fn standard_shipping(cost_cents: i64) -> ShippingSelection {
        ShippingSelection {
            method: "standard".to_string(),
            cost_cents,
            estimated_days: 5,
            carrier: Some("UPS".to_string()),
        }
    }

    #[test]
    fn test_empty_cart() {
        let summary = compute_summary(&[], &[], None, &CartConfig::default());
        assert_eq!(summary, CartSummary::default());
    }

    #[test]
    fn test_checkout_scenario_percentage_discount() {
        // One item, $20.00 × 2 → subtotal $40.00
        // 10% discount → $4.00 off, taxable $36.00
        // Tax 8% → $2.88; no shipping selected → total $38.88
        let items = vec![LineItem::new(product("p1", 2000, None), None, 2)];
        let discounts = vec![Discount::percentage("TEN", 1000, "10% off")];

        let summary = compute_summary(&items, &discounts, None, &CartConfig::default());
        assert_eq!(summary.subtotal_cents, 4000);
        assert_eq!(summary.discount_cents, 400);
        assert_eq!(summary.tax_cents, 288);
        assert_eq!(summary.shipping_cents, 0);
        assert_eq!(summary.total_cents, 3888);
        assert_eq!(summary.item_count, 2);
    }

    #[test]
    fn test_free_shipping_overrides_selected_cost() {
        let items = vec![LineItem::new(product("p1", 2000, None), None, 2)];
        let shipping = standard_shipping(500);

        let without = compute_summary(&items, &[], Some(&shipping), &CartConfig::default());
        assert_eq!(without.shipping_cents, 500);

        let discounts = vec![Discount::free_shipping("FREESHIP", "Free shipping")];
        let with = compute_summary(&items, &discounts, Some(&shipping), &CartConfig::default());
        assert_eq!(with.shipping_cents, 0);
        // Total unaffected by the $5.00 shipping cost
        assert_eq!(with.total_cents, without.total_cents - 500);
    }

    #[test]
    fn test_removing_free_shipping_restores_cost() {
        // Shipping always starts from the live selection, so dropping the
        // discount restores the charge on the next recomputation.
        let items = vec![LineItem::new(product("p1", 2000, None), None, 1)];
        let shipping = standard_shipping(750);

        let discounts = vec![Discount::free_shipping("FREESHIP", "Free shipping")];
        let with = compute_summary(&items, &discounts, Some(&shipping), &CartConfig::default());
        assert_eq!(with.shipping_cents, 0);

        let after_removal = compute_summary(&items, &[], Some(&shipping), &CartConfig::default());
        assert_eq!(after_removal.shipping_cents, 750);
    }

    #[test]
    fn test_free_shipping_is_idempotent() {
        let items = vec![LineItem::new(product("p1", 2000, None), None, 1)];
        let shipping = standard_shipping(500);
        let discounts = vec![
            Discount::free_shipping("SHIP1", "Free shipping"),
            Discount::free_shipping("SHIP2", "Also free shipping"),
        ];

        let summary = compute_summary(&items, &discounts, Some(&shipping), &CartConfig::default());
        assert_eq!(summary.shipping_cents, 0);
    }

    #[test]
    fn test_fixed_amount_capped_at_subtotal() {
        let items = vec![LineItem::new(product("p1", 1000, None), None, 1)];
        let discounts = vec![Discount::fixed_amount("BIG", 5000, "$50 off")];

        let summary = compute_summary(&items, &discounts, None, &CartConfig::default());
        assert_eq!(summary.discount_cents, 1000); // capped at the $10 subtotal
        assert_eq!(summary.tax_cents, 0);
        assert_eq!(summary.total_cents, 0);
    }

    #[test]
    fn test_stacked_discounts_clamp_taxable_at_zero() {
        // Two capped fixed discounts together exceed the subtotal; the
        // taxable amount clamps at zero instead of going negative.
        let items = vec![LineItem::new(product("p1", 1000, None), None, 1)];
        let discounts = vec![
            Discount::fixed_amount("A", 800, "$8 off"),
            Discount::fixed_amount("B", 800, "$8 off again"),
        ];

        let summary = compute_summary(&items, &discounts, None, &CartConfig::default());
        assert_eq!(summary.discount_cents, 1600);
        assert_eq!(summary.tax_cents, 0);
        assert_eq!(summary.total_cents, 0);
    }

    #[test]
    fn test_discounts_stack() {
        let items = vec![LineItem::new(product("p1", 10000, None), None, 1)];
        let discounts = vec![
            Discount::percentage("TEN", 1000, "10% off"),
            Discount::fixed_amount("FIVE", 500, "$5 off"),
        ];

        let summary = compute_summary(&items, &discounts, None, &CartConfig::default());
        // $10.00 + $5.00 = $15.00 total discount
        assert_eq!(summary.discount_cents, 1500);
        // taxable $85.00, tax $6.80, total $91.80
        assert_eq!(summary.tax_cents, 680);
        assert_eq!(summary.total_cents, 9180);
    }

    #[test]
    fn test_weight_and_item_count() {
        let items = vec![
            LineItem::new(product("p1", 2000, Some(250)), None, 2),
            LineItem::new(product("p2", 500, None), None, 3),
        ];

        let summary = compute_summary(&items, &[], None, &CartConfig::default());
        assert_eq!(summary.item_count, 5);
        assert_eq!(summary.weight_grams, 500); // missing weight contributes 0
    }

    #[test]
    fn test_pure_function_determinism() {
        let items = vec![LineItem::new(product("p1", 1234, Some(100)), None, 3)];
        let discounts = vec![Discount::percentage("P", 750, "7.5% off")];
        let shipping = standard_shipping(999);
        let config = CartConfig::default();

        let a = compute_summary(&items, &discounts, Some(&shipping), &config);
        let b = compute_summary(&items, &discounts, Some(&shipping), &config);
        assert_eq!(a, b);
    }
}
