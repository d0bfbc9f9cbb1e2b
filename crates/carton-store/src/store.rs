//! # Cart Store
//!
//! The single authoritative holder of cart state.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      CartStore Operations                           │
//! │                                                                     │
//! │  Caller Action            Store Operation        State Change       │
//! │  ─────────────            ───────────────        ────────────       │
//! │  Add to cart ───────────► add_item() ──────────► merge or append    │
//! │  Change quantity ───────► update_quantity() ───► set qty / remove   │
//! │  Remove line ───────────► remove_item() ───────► drop line          │
//! │  Apply code ────────────► apply_discount() ────► upsert by code     │
//! │  Pick shipping ─────────► set_shipping() ──────► replace selection  │
//! │  Empty cart ────────────► clear() ─────────────► drop everything    │
//! │                                                                     │
//! │  EVERY mutation then runs the same tail:                            │
//! │      recompute summary  →  save snapshot (fire-and-forget)          │
//! │                                                                     │
//! │  so a read after any operation never sees a stale summary.          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Safe Wrappers
//! The `try_*` family validates first and reports rejections through the
//! cart-level `error` string instead of returning `Err` - the frontend
//! renders the message next to the cart rather than handling exceptions.
//!
//! ## Ownership
//! One `CartStore` per session owns its `CartState` exclusively. All
//! mutations run to completion before the next is observed; there is no
//! concurrent mutation (wrap the store in a `tokio::sync::Mutex` if
//! multiple tasks must share one).

use tracing::{debug, info, warn};

use carton_core::pricing::{compute_summary, CartConfig};
use carton_core::types::{
    CartSnapshot, CartSummary, Discount, LineItem, ProductSnapshot, ShippingSelection,
    VariantSnapshot,
};
use carton_core::{policy, CartError, CartResult};

use crate::storage::{CartKey, CartStorage};
use crate::sync::ReconcileBackend;

// =============================================================================
// Cart State
// =============================================================================

/// Full in-memory cart state: the durable contents plus transient flags.
///
/// Only the [`CartStore`] mutates this; everything else reads snapshots.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    /// Line items in insertion order (stable for display).
    pub items: Vec<LineItem>,

    /// Active discounts in application order.
    pub discounts: Vec<Discount>,

    /// Chosen shipping method, if any.
    pub shipping: Option<ShippingSelection>,

    /// Derived rollup; consistent with the fields above after every
    /// public store operation.
    pub summary: CartSummary,

    /// Whether the one-time hydration from storage has completed.
    pub is_initialized: bool,

    /// Whether a reconcile is in flight. Mutations serialize around it
    /// (the store is exclusively borrowed for the exchange); this flag
    /// exists so the frontend can show progress.
    pub is_loading: bool,

    /// Last rejection or sync failure, human-readable. Transient: never
    /// persisted, cleared by the next successful safe operation.
    pub error: Option<String>,
}

impl CartState {
    /// Rebuilds state from a durable snapshot, recomputing the summary
    /// rather than trusting the stored one.
    fn from_snapshot(snapshot: CartSnapshot, config: &CartConfig) -> Self {
        let mut state = CartState {
            items: snapshot.items,
            discounts: snapshot.discounts,
            shipping: snapshot.shipping,
            ..Default::default()
        };
        state.recalculate(config);
        state
    }

    /// Extracts the durable subset for persistence or reconciliation.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            discounts: self.discounts.clone(),
            shipping: self.shipping.clone(),
            summary: self.summary,
        }
    }

    fn recalculate(&mut self, config: &CartConfig) {
        self.summary = compute_summary(
            &self.items,
            &self.discounts,
            self.shipping.as_ref(),
            config,
        );
    }
}

// =============================================================================
// Cart Store
// =============================================================================

/// Owns [`CartState`] and funnels every mutation through the
/// recompute-then-persist tail.
#[derive(Debug)]
pub struct CartStore<S: CartStorage> {
    state: CartState,
    storage: S,
    key: CartKey,
    config: CartConfig,
}

impl<S: CartStorage> CartStore<S> {
    /// Opens the cart for `key`, hydrating once from storage.
    ///
    /// Never fails: a missing snapshot starts empty, and a load or
    /// deserialization failure is logged and also starts empty - a
    /// shopper gets a working (if empty) cart, not an error page.
    pub async fn open(storage: S, key: CartKey, config: CartConfig) -> Self {
        let state = match storage.load(&key).await {
            Ok(Some(snapshot)) => {
                debug!(cart_key = %key, lines = snapshot.items.len(), "Cart hydrated");
                CartState::from_snapshot(snapshot, &config)
            }
            Ok(None) => {
                debug!(cart_key = %key, "No stored cart; starting empty");
                CartState::default()
            }
            Err(err) => {
                warn!(cart_key = %key, error = %err, "Cart load failed; starting empty");
                CartState::default()
            }
        };

        let mut store = CartStore {
            state,
            storage,
            key,
            config,
        };
        store.state.is_initialized = true;
        store
    }

    // -------------------------------------------------------------------------
    // Read Projections
    // -------------------------------------------------------------------------

    /// Current state (read-only).
    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// Current summary; consistent with the cart contents.
    pub fn summary(&self) -> &CartSummary {
        &self.state.summary
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.state.items
    }

    /// Total quantity across all lines.
    pub fn total_items(&self) -> i64 {
        self.state.summary.item_count
    }

    /// Whether a `(product, variant)` pair is in the cart.
    pub fn contains(&self, product_id: &str, variant_id: Option<&str>) -> bool {
        let id = LineItem::derive_id(product_id, variant_id);
        self.item(&id).is_some()
    }

    /// Looks up a line item by derived id.
    pub fn item(&self, id: &str) -> Option<&LineItem> {
        self.state.items.iter().find(|i| i.id == id)
    }

    /// Whether the cart holds no items.
    pub fn is_empty(&self) -> bool {
        self.state.items.is_empty()
    }

    /// Last reported rejection or sync failure.
    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    /// The key this cart persists under.
    pub fn key(&self) -> &CartKey {
        &self.key
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Adds a product (optionally a specific variant) to the cart.
    ///
    /// Merges by `(product_id, variant_id)`: an already-present pair
    /// gains quantity instead of producing a duplicate line. Bounds are
    /// enforced before anything mutates.
    pub async fn add_item(
        &mut self,
        product: ProductSnapshot,
        variant: Option<VariantSnapshot>,
        quantity: i64,
    ) -> CartResult<()> {
        policy::validate_quantity(quantity, self.config.max_line_quantity)?;

        let id = LineItem::derive_id(&product.id, variant.as_ref().map(|v| v.id.as_str()));

        if let Some(existing) = self.state.items.iter_mut().find(|i| i.id == id) {
            let merged = existing.quantity + quantity;
            if merged > self.config.max_line_quantity {
                return Err(CartError::QuantityTooLarge {
                    requested: merged,
                    max: self.config.max_line_quantity,
                });
            }
            existing.set_quantity(merged);
        } else {
            policy::validate_cart_size(self.state.items.len(), self.config.max_lines)?;
            self.state.items.push(LineItem::new(product, variant, quantity));
        }

        self.commit().await;
        Ok(())
    }

    /// Removes a line item by derived id. Permissive: absent ids are a
    /// no-op, not an error (the safe wrapper surfaces "not found").
    pub async fn remove_item(&mut self, id: &str) {
        let before = self.state.items.len();
        self.state.items.retain(|i| i.id != id);

        if self.state.items.len() != before {
            self.commit().await;
        }
    }

    /// Sets a line's quantity; `quantity ≤ 0` behaves as removal.
    /// Permissive on unknown ids.
    pub async fn update_quantity(&mut self, id: &str, quantity: i64) -> CartResult<()> {
        if quantity <= 0 {
            self.remove_item(id).await;
            return Ok(());
        }

        if quantity > self.config.max_line_quantity {
            return Err(CartError::QuantityTooLarge {
                requested: quantity,
                max: self.config.max_line_quantity,
            });
        }

        if let Some(item) = self.state.items.iter_mut().find(|i| i.id == id) {
            item.set_quantity(quantity);
            self.commit().await;
        }
        Ok(())
    }

    /// Empties items, discounts, and shipping together. Atomic from the
    /// caller's perspective: no read observes a half-cleared cart.
    pub async fn clear(&mut self) {
        self.state.items.clear();
        self.state.discounts.clear();
        self.state.shipping = None;
        self.commit().await;
    }

    /// Upserts a discount by code. A code already present is replaced in
    /// place, keeping its position in the application order; the active
    /// set never holds two discounts with one code.
    pub async fn apply_discount(&mut self, discount: Discount) {
        if let Some(existing) = self
            .state
            .discounts
            .iter_mut()
            .find(|d| d.code == discount.code)
        {
            *existing = discount;
        } else {
            self.state.discounts.push(discount);
        }
        self.commit().await;
    }

    /// Removes a discount by code. No-op when absent.
    pub async fn remove_discount(&mut self, code: &str) {
        let before = self.state.discounts.len();
        self.state.discounts.retain(|d| d.code != code);

        if self.state.discounts.len() != before {
            self.commit().await;
        }
    }

    /// Replaces the active shipping selection.
    pub async fn set_shipping(&mut self, selection: ShippingSelection) {
        self.state.shipping = Some(selection);
        self.commit().await;
    }

    /// Explicit recomputation entry point. Every mutation already calls
    /// this; it exists for callers that changed the config or simply
    /// want to re-derive the summary.
    pub fn calculate_summary(&mut self) {
        self.state.recalculate(&self.config);
    }

    // -------------------------------------------------------------------------
    // Safe Wrappers (fire-and-report)
    // -------------------------------------------------------------------------

    /// Adds an item, reporting rejections through the cart error string.
    pub async fn try_add_item(
        &mut self,
        product: ProductSnapshot,
        variant: Option<VariantSnapshot>,
        quantity: i64,
    ) {
        match self.add_item(product, variant, quantity).await {
            Ok(()) => self.state.error = None,
            // Bounds are checked before any mutation, so Err means the
            // cart is untouched.
            Err(err) => self.state.error = Some(err.to_string()),
        }
    }

    /// Applies a discount after policy validation. Rejections (duplicate
    /// code, non-positive value, percentage over 100%) set the error
    /// string and mutate nothing.
    pub async fn try_apply_discount(&mut self, discount: Discount) {
        if let Err(err) = policy::validate_discount(&discount, &self.state.discounts) {
            debug!(code = %discount.code, error = %err, "Discount rejected");
            self.state.error = Some(err.to_string());
            return;
        }

        self.state.error = None;
        self.apply_discount(discount).await;
    }

    /// Removes a line item, surfacing "not found" as a cart error where
    /// the unchecked operation stays silent.
    pub async fn try_remove_item(&mut self, id: &str) {
        if self.item(id).is_none() {
            self.state.error = Some(
                CartError::ItemNotFound { id: id.to_string() }.to_string(),
            );
            return;
        }

        self.state.error = None;
        self.remove_item(id).await;
    }

    /// Updates a quantity with full reporting: unknown ids and bound
    /// violations both land in the cart error string.
    pub async fn try_update_quantity(&mut self, id: &str, quantity: i64) {
        if quantity > 0 && self.item(id).is_none() {
            self.state.error = Some(
                CartError::ItemNotFound { id: id.to_string() }.to_string(),
            );
            return;
        }

        match self.update_quantity(id, quantity).await {
            Ok(()) => self.state.error = None,
            Err(err) => self.state.error = Some(err.to_string()),
        }
    }

    // -------------------------------------------------------------------------
    // Reconciliation
    // -------------------------------------------------------------------------

    /// Reconciles the local cart with a server-held copy.
    ///
    /// The backend call is the only suspension point in the store, and
    /// the exclusive borrow means other mutations serialize around it -
    /// no local edit can interleave with a pending exchange. An
    /// authoritative snapshot from the server replaces local contents
    /// (last-writer-wins; the summary is recomputed locally, never
    /// trusted from the wire). A backend failure surfaces as the cart
    /// error string and leaves local state untouched.
    pub async fn sync_with_server<B: ReconcileBackend>(&mut self, backend: &B) {
        self.state.is_loading = true;
        let local = self.state.snapshot();

        match backend.reconcile(&local).await {
            Ok(Some(remote)) => {
                info!(cart_key = %self.key, lines = remote.items.len(), "Adopting server cart");
                self.state.items = remote.items;
                self.state.discounts = remote.discounts;
                self.state.shipping = remote.shipping;
                self.state.error = None;
                self.commit().await;
            }
            Ok(None) => {
                debug!(cart_key = %self.key, "Server had no competing cart");
            }
            Err(err) => {
                warn!(cart_key = %self.key, error = %err, "Cart sync failed");
                self.state.error = Some(err.to_string());
            }
        }

        self.state.is_loading = false;
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// The shared mutation tail: recompute the summary, then persist.
    ///
    /// Saves are fire-and-forget - a failure is logged and the in-memory
    /// mutation stands. The worst outcome is a stale snapshot on disk.
    async fn commit(&mut self) {
        self.state.recalculate(&self.config);

        let snapshot = self.state.snapshot();
        if let Err(err) = self.storage.save(&self.key, &snapshot).await {
            warn!(cart_key = %self.key, error = %err, "Cart save failed; keeping in-memory state");
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use carton_core::types::DiscountKind;
    use std::collections::BTreeMap;

    fn product(id: &str, price_cents: i64) -> ProductSnapshot {
        ProductSnapshot {
            id: id.to_string(),
            slug: format!("product-{}", id),
            name: format!("Product {}", id),
            price_cents,
            shipping_weight_grams: Some(100),
            is_active: true,
            is_in_stock: true,
        }
    }

    fn variant(id: &str, price_cents: Option<i64>) -> VariantSnapshot {
        VariantSnapshot {
            id: id.to_string(),
            name: format!("Variant {}", id),
            sku: format!("SKU-{}", id),
            attributes: BTreeMap::new(),
            price_cents,
            inventory: None,
        }
    }

    async fn empty_store() -> CartStore<MemoryStorage> {
        CartStore::open(
            MemoryStorage::new(),
            CartKey::new("test-cart"),
            CartConfig::default(),
        )
        .await
    }

    #[tokio::test]
    async fn test_repeated_adds_merge_into_one_line() {
        let mut store = empty_store().await;

        store.add_item(product("p1", 999), None, 2).await.unwrap();
        store.add_item(product("p1", 999), None, 3).await.unwrap();

        assert_eq!(store.items().len(), 1);
        assert_eq!(store.items()[0].quantity, 5);
        assert_eq!(store.total_items(), 5);
    }

    #[tokio::test]
    async fn test_distinct_variants_get_distinct_lines() {
        let mut store = empty_store().await;

        store
            .add_item(product("p1", 999), Some(variant("v1", None)), 1)
            .await
            .unwrap();
        store
            .add_item(product("p1", 999), Some(variant("v2", Some(1299))), 1)
            .await
            .unwrap();

        assert_eq!(store.items().len(), 2);
        assert!(store.contains("p1", Some("v1")));
        assert!(store.contains("p1", Some("v2")));
        assert!(!store.contains("p1", None));
    }

    #[tokio::test]
    async fn test_update_quantity_zero_removes() {
        let mut store = empty_store().await;
        store.add_item(product("p1", 999), None, 2).await.unwrap();
        let id = store.items()[0].id.clone();

        store.update_quantity(&id, 0).await.unwrap();
        assert!(store.is_empty());
        assert_eq!(store.summary().total_cents, 0);
    }

    #[tokio::test]
    async fn test_remove_nonexistent_leaves_state_unchanged() {
        let mut store = empty_store().await;
        store.add_item(product("p1", 2000), None, 2).await.unwrap();
        let before = store.state().snapshot();

        store.remove_item("p9:").await;

        assert_eq!(store.state().snapshot(), before);
        assert!(store.error().is_none());
    }

    #[tokio::test]
    async fn test_summary_tracks_every_mutation() {
        let mut store = empty_store().await;

        store.add_item(product("p1", 2000), None, 2).await.unwrap();
        assert_eq!(store.summary().subtotal_cents, 4000);

        store
            .set_shipping(ShippingSelection {
                method: "standard".to_string(),
                cost_cents: 500,
                estimated_days: 5,
                carrier: None,
            })
            .await;
        assert_eq!(store.summary().shipping_cents, 500);

        store
            .apply_discount(Discount::percentage("TEN", 1000, "10% off"))
            .await;
        assert_eq!(store.summary().discount_cents, 400);
        // $36 taxable + $2.88 tax + $5 shipping
        assert_eq!(store.summary().total_cents, 4388);

        store.remove_discount("TEN").await;
        assert_eq!(store.summary().discount_cents, 0);
    }

    #[tokio::test]
    async fn test_clear_empties_everything_together() {
        let mut store = empty_store().await;
        store.add_item(product("p1", 2000), None, 1).await.unwrap();
        store
            .apply_discount(Discount::fixed_amount("FIVE", 500, "$5 off"))
            .await;
        store
            .set_shipping(ShippingSelection {
                method: "express".to_string(),
                cost_cents: 1500,
                estimated_days: 1,
                carrier: Some("FedEx".to_string()),
            })
            .await;

        store.clear().await;

        assert!(store.is_empty());
        assert!(store.state().discounts.is_empty());
        assert!(store.state().shipping.is_none());
        assert_eq!(*store.summary(), CartSummary::default());
    }

    #[tokio::test]
    async fn test_apply_discount_upserts_by_code() {
        let mut store = empty_store().await;
        store.add_item(product("p1", 10000), None, 1).await.unwrap();

        store
            .apply_discount(Discount::percentage("DEAL", 1000, "10% off"))
            .await;
        store
            .apply_discount(Discount::fixed_amount("DEAL", 500, "$5 off"))
            .await;

        assert_eq!(store.state().discounts.len(), 1);
        assert_eq!(store.state().discounts[0].kind, DiscountKind::FixedAmount);
        assert_eq!(store.summary().discount_cents, 500);
    }

    #[tokio::test]
    async fn test_try_apply_discount_rejects_duplicate_code() {
        let mut store = empty_store().await;
        store.add_item(product("p1", 10000), None, 1).await.unwrap();

        store
            .try_apply_discount(Discount::percentage("DEAL", 1000, "10% off"))
            .await;
        assert!(store.error().is_none());

        let before = store.state().snapshot();
        store
            .try_apply_discount(Discount::fixed_amount("DEAL", 500, "$5 off"))
            .await;

        assert_eq!(store.error(), Some("Discount 'DEAL' is already applied"));
        assert_eq!(store.state().snapshot(), before);
    }

    #[tokio::test]
    async fn test_try_apply_discount_rejects_bad_values() {
        let mut store = empty_store().await;

        store
            .try_apply_discount(Discount::fixed_amount("ZERO", 0, "nothing"))
            .await;
        assert_eq!(store.error(), Some("Discount 'ZERO' has a non-positive value"));

        store
            .try_apply_discount(Discount::percentage("HUGE", 10_001, "101%"))
            .await;
        assert_eq!(store.error(), Some("Discount 'HUGE' exceeds 100%"));

        assert!(store.state().discounts.is_empty());
    }

    #[tokio::test]
    async fn test_successful_safe_operation_clears_error() {
        let mut store = empty_store().await;
        store
            .try_apply_discount(Discount::fixed_amount("ZERO", 0, "nothing"))
            .await;
        assert!(store.error().is_some());

        store
            .try_apply_discount(Discount::fixed_amount("FIVE", 500, "$5 off"))
            .await;
        assert!(store.error().is_none());
    }

    #[tokio::test]
    async fn test_try_add_item_reports_bound_violations() {
        let mut store = empty_store().await;

        store.try_add_item(product("p1", 999), None, 0).await;
        assert_eq!(store.error(), Some("Quantity must be positive"));
        assert!(store.is_empty());

        store.try_add_item(product("p1", 999), None, 1).await;
        assert!(store.error().is_none());
        assert_eq!(store.total_items(), 1);
    }

    #[tokio::test]
    async fn test_try_remove_missing_item_reports_error() {
        let mut store = empty_store().await;
        store.try_remove_item("p9:").await;
        assert_eq!(store.error(), Some("Item not found in cart: p9:"));
    }

    #[tokio::test]
    async fn test_add_item_enforces_quantity_bounds() {
        let mut store = empty_store().await;

        assert!(matches!(
            store.add_item(product("p1", 999), None, 0).await,
            Err(CartError::NonPositiveQuantity)
        ));

        store.add_item(product("p1", 999), None, 998).await.unwrap();
        assert!(matches!(
            store.add_item(product("p1", 999), None, 2).await,
            Err(CartError::QuantityTooLarge { .. })
        ));
        // Failed merge left the original quantity alone
        assert_eq!(store.items()[0].quantity, 998);
    }

    #[tokio::test]
    async fn test_add_item_enforces_cart_size() {
        let config = CartConfig {
            max_lines: 1,
            ..CartConfig::default()
        };
        let mut store =
            CartStore::open(MemoryStorage::new(), CartKey::new("small"), config).await;

        store.add_item(product("p1", 999), None, 1).await.unwrap();
        assert!(matches!(
            store.add_item(product("p2", 999), None, 1).await,
            Err(CartError::CartFull { max: 1 })
        ));
    }

    #[tokio::test]
    async fn test_open_falls_back_to_empty_on_corrupt_snapshot() {
        let storage = MemoryStorage::new();
        let key = CartKey::new("cart");
        storage.seed_raw(&key, "{definitely not a snapshot");

        let store = CartStore::open(storage, key, CartConfig::default()).await;
        assert!(store.is_empty());
        assert!(store.state().is_initialized);
    }
}
