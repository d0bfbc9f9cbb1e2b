//! # carton-core: Pure Business Logic for the Carton Cart Engine
//!
//! This crate is the heart of Carton. It contains the cart math and
//! rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Carton Architecture                           │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐    │
//! │  │                 Storefront Frontend                         │    │
//! │  │    Product page ──► Cart UI ──► Checkout UI                 │    │
//! │  └────────────────────────────┬────────────────────────────────┘    │
//! │                               │ generated TS bindings               │
//! │  ┌────────────────────────────▼────────────────────────────────┐    │
//! │  │              ★ carton-core (THIS CRATE) ★                   │    │
//! │  │                                                             │    │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌─────────┐        │    │
//! │  │   │  types  │  │  money  │  │ pricing │  │ policy  │        │    │
//! │  │   │LineItem │  │  Money  │  │ summary │  │discount │        │    │
//! │  │   │Discount │  │ TaxRate │  │  math   │  │  rules  │        │    │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └─────────┘        │    │
//! │  │                                                             │    │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS        │    │
//! │  └────────────────────────────┬────────────────────────────────┘    │
//! │                               │                                     │
//! │  ┌────────────────────────────▼────────────────────────────────┐    │
//! │  │                carton-store (Stateful Layer)                │    │
//! │  │        CartStore, SQLite snapshots, reconciliation          │    │
//! │  └─────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (LineItem, Discount, ShippingSelection, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Pure summary computation
//! - [`policy`] - Discount and quantity validation, catalog revalidation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: the summary is a deterministic function of
//!    (items, discounts, shipping) - never independently assigned
//! 2. **No I/O**: database, network, and file system access are forbidden
//! 3. **Integer Money**: all monetary values are cents (i64)
//! 4. **Explicit Errors**: typed errors via thiserror, never panics
//!
//! ## Example
//!
//! ```rust
//! use carton_core::pricing::{compute_summary, CartConfig};
//! use carton_core::types::{Discount, LineItem, ProductSnapshot};
//!
//! let product = ProductSnapshot {
//!     id: "p1".into(),
//!     slug: "widget".into(),
//!     name: "Widget".into(),
//!     price_cents: 2000,
//!     shipping_weight_grams: None,
//!     is_active: true,
//!     is_in_stock: true,
//! };
//!
//! let items = vec![LineItem::new(product, None, 2)];
//! let discounts = vec![Discount::percentage("TEN", 1000, "10% off")];
//! let summary = compute_summary(&items, &discounts, None, &CartConfig::default());
//!
//! assert_eq!(summary.total_cents, 3888); // $40 − 10%, plus 8% tax
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod policy;
pub mod pricing;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CartError, CartResult, PolicyError};
pub use money::Money;
pub use pricing::{compute_summary, CartConfig};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default flat tax rate in basis points (800 = 8%).
///
/// Configured, not derived from jurisdiction; the embedder overrides it
/// through [`CartConfig`].
pub const DEFAULT_TAX_RATE_BPS: u32 = 800;

/// Maximum number of distinct lines in a single cart.
///
/// Keeps carts (and their serialized snapshots) at a reasonable size.
/// Overridable per deployment through [`CartConfig`].
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity on a single cart line.
///
/// Guards against accidental over-ordering (1000 typed instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;
