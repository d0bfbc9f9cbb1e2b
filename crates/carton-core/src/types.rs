//! # Domain Types
//!
//! Core domain types for the cart engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────┐   │
//! │  │    LineItem     │   │    Discount     │   │ ShippingSelection│   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ──────────────  │   │
//! │  │  id (derived)   │   │  code (unique)  │   │  method          │   │
//! │  │  product (snap) │   │  kind + value   │   │  cost_cents      │   │
//! │  │  variant (snap) │   │  applied_at     │   │  estimated_days  │   │
//! │  │  qty × price    │   └─────────────────┘   └──────────────────┘   │
//! │  └─────────────────┘                                                │
//! │                                                                     │
//! │  CartSnapshot = items + discounts + shipping + CartSummary          │
//! │  (the durable subset of cart state; transient flags stay in RAM)    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A `LineItem` carries a frozen copy of the catalog product at
//! add-to-cart time. The cart stays displayable and priceable even if
//! the catalog changes underneath it; `policy::validate_against_catalog`
//! is the explicit re-check against live data.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate in basis points (1 bps = 0.01%).
///
/// 800 bps = 8%, the configured default. Single flat rate; this engine
/// does not derive tax from jurisdiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate(crate::DEFAULT_TAX_RATE_BPS)
    }
}

// =============================================================================
// Catalog Snapshots
// =============================================================================

/// Frozen copy of a catalog product, captured at add-to-cart time.
///
/// The cart never re-fetches the catalog on its own; `is_active` and
/// `is_in_stock` reflect the moment the item was added and are only
/// re-checked by an explicit catalog revalidation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    /// Catalog identifier for the product.
    pub id: String,

    /// URL slug (frozen for display/links).
    pub slug: String,

    /// Display name shown in the cart.
    pub name: String,

    /// Base price in cents.
    pub price_cents: i64,

    /// Shipping weight in grams; `None` contributes 0 to cart weight.
    pub shipping_weight_grams: Option<i64>,

    /// Whether the product was active (not soft-deleted) when added.
    pub is_active: bool,

    /// Whether the product was in stock when added.
    pub is_in_stock: bool,
}

impl ProductSnapshot {
    /// Returns the base price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Frozen copy of a chosen product variant.
///
/// Variants refine a product (size, color) and may override its price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VariantSnapshot {
    /// Catalog identifier for the variant.
    pub id: String,

    /// Display name (e.g. "Large / Black").
    pub name: String,

    /// Variant SKU.
    pub sku: String,

    /// Attribute map (e.g. size → "L", color → "black").
    ///
    /// Opaque to pricing: the engine stores and round-trips it but never
    /// branches on its contents. BTreeMap keeps serialization stable.
    pub attributes: BTreeMap<String, String>,

    /// Variant-specific price override in cents, when the variant prices
    /// differently from the base product.
    pub price_cents: Option<i64>,

    /// Units in stock when the variant was added, when the catalog
    /// tracks variant inventory.
    pub inventory: Option<i64>,
}

// =============================================================================
// Discounts
// =============================================================================

/// The kind of promotional adjustment a discount applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// Percentage off the subtotal; `value` is basis points (1000 = 10%).
    Percentage,
    /// Flat amount off; `value` is cents, capped at the subtotal.
    FixedAmount,
    /// Zeroes the shipping charge; `value` is ignored.
    FreeShipping,
}

/// A named promotional adjustment applied to the cart.
///
/// ## Invariants
/// - At most one discount per `code` in the active set
/// - Discounts stack: multiple codes of any kind may coexist, applied
///   in the order they were added
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    /// Unique key within the cart (e.g. "SUMMER10").
    pub code: String,

    /// What kind of adjustment this is.
    pub kind: DiscountKind,

    /// Magnitude; meaning depends on `kind` (bps for percentage, cents
    /// for fixed amount, ignored for free shipping).
    pub value: i64,

    /// Human-readable description for display.
    pub description: String,

    /// When the discount was applied; drives application order.
    #[ts(as = "String")]
    pub applied_at: DateTime<Utc>,
}

impl Discount {
    /// Creates a percentage discount (`bps` basis points off the subtotal).
    pub fn percentage(code: impl Into<String>, bps: i64, description: impl Into<String>) -> Self {
        Discount {
            code: code.into(),
            kind: DiscountKind::Percentage,
            value: bps,
            description: description.into(),
            applied_at: Utc::now(),
        }
    }

    /// Creates a fixed-amount discount (`cents` off the subtotal).
    pub fn fixed_amount(code: impl Into<String>, cents: i64, description: impl Into<String>) -> Self {
        Discount {
            code: code.into(),
            kind: DiscountKind::FixedAmount,
            value: cents,
            description: description.into(),
            applied_at: Utc::now(),
        }
    }

    /// Creates a free-shipping discount.
    pub fn free_shipping(code: impl Into<String>, description: impl Into<String>) -> Self {
        Discount {
            code: code.into(),
            kind: DiscountKind::FreeShipping,
            // Nominal positive value so the uniform "value must be
            // positive" policy check holds for every kind.
            value: 1,
            description: description.into(),
            applied_at: Utc::now(),
        }
    }
}

// =============================================================================
// Shipping
// =============================================================================

/// The chosen delivery method. At most one is active at a time;
/// selecting a new one discards the previous selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ShippingSelection {
    /// Method identifier (e.g. "standard", "express").
    pub method: String,

    /// Shipping cost in cents.
    pub cost_cents: i64,

    /// Estimated delivery window in days.
    pub estimated_days: u32,

    /// Carrier name, when known.
    pub carrier: Option<String>,
}

impl ShippingSelection {
    /// Returns the shipping cost as Money.
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }
}

// =============================================================================
// Line Items
// =============================================================================

/// One product/variant combination with a quantity in the cart.
///
/// ## Identity
/// `id` is derived deterministically from `(product_id, variant_id)` and
/// is the dedup/merge key: adding the same pair again increases quantity
/// instead of appending a duplicate entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Derived identity; see [`LineItem::derive_id`].
    pub id: String,

    /// Catalog product id (duplicated out of the snapshot for lookups).
    pub product_id: String,

    /// Frozen catalog product data.
    pub product: ProductSnapshot,

    /// Frozen variant data, when a variant was chosen.
    pub variant: Option<VariantSnapshot>,

    /// Quantity in cart (always ≥ 1; zero means the item is removed).
    pub quantity: i64,

    /// Unit price in cents: the variant override when present, else the
    /// product base price. Frozen at add time.
    pub unit_price_cents: i64,

    /// Line total in cents (`unit_price × quantity`). Kept in sync by
    /// every quantity mutation.
    pub total_cents: i64,
}

impl LineItem {
    /// Derives the line-item id for a `(product_id, variant_id)` pair.
    ///
    /// Format: `"{product_id}:{variant_id}"`, with an empty variant
    /// segment when no variant is chosen. Deterministic, so the same
    /// pair always maps to the same cart line. Assumes catalog ids do
    /// not contain `:`.
    pub fn derive_id(product_id: &str, variant_id: Option<&str>) -> String {
        format!("{}:{}", product_id, variant_id.unwrap_or(""))
    }

    /// Builds a new line item from frozen catalog data.
    ///
    /// The unit price resolves to the variant override when the chosen
    /// variant carries one, otherwise the product base price.
    pub fn new(product: ProductSnapshot, variant: Option<VariantSnapshot>, quantity: i64) -> Self {
        let unit_price_cents = variant
            .as_ref()
            .and_then(|v| v.price_cents)
            .unwrap_or(product.price_cents);

        LineItem {
            id: Self::derive_id(&product.id, variant.as_ref().map(|v| v.id.as_str())),
            product_id: product.id.clone(),
            product,
            variant,
            quantity,
            unit_price_cents,
            total_cents: unit_price_cents * quantity,
        }
    }

    /// Sets the quantity and recomputes the line total.
    pub fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
        self.total_cents = self.unit_price_cents * quantity;
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Shipping weight contribution of this line in grams.
    pub fn weight_grams(&self) -> i64 {
        self.product.shipping_weight_grams.unwrap_or(0) * self.quantity
    }
}

// =============================================================================
// Cart Summary
// =============================================================================

/// Derived monetary/quantity rollup of the cart.
///
/// Never independently assigned: always the output of
/// [`crate::pricing::compute_summary`] over the current items,
/// discounts, and shipping selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    /// Sum of line totals, before any adjustment.
    pub subtotal_cents: i64,

    /// Tax on the discounted subtotal.
    pub tax_cents: i64,

    /// Shipping charge after free-shipping discounts.
    pub shipping_cents: i64,

    /// Total discount applied against the subtotal.
    pub discount_cents: i64,

    /// Grand total: taxable + tax + shipping.
    pub total_cents: i64,

    /// Total quantity across all lines (not the line count).
    pub item_count: i64,

    /// Total shipping weight in grams.
    pub weight_grams: i64,
}

// =============================================================================
// Cart Snapshot
// =============================================================================

/// The durable subset of cart state: what persistence round-trips and
/// what reconciliation exchanges with a server.
///
/// Transient flags (error string, loading/initialized) deliberately do
/// not appear here, so they can never leak to disk or the wire.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    /// Line items in insertion order. Order is semantically irrelevant
    /// but must stay stable for display.
    pub items: Vec<LineItem>,

    /// Active discounts in application order.
    pub discounts: Vec<Discount>,

    /// Chosen shipping method, if any.
    pub shipping: Option<ShippingSelection>,

    /// Summary as of the last recomputation. Recomputed, never trusted,
    /// when a snapshot is loaded or received from a server.
    pub summary: CartSummary,
}

// =============================================================================
// Unit Tests
// =============================================================================
