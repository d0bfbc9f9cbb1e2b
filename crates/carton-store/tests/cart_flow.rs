//! End-to-end cart flows: checkout math through the store, save-failure
//! resilience, and reconciliation behavior.

use carton_core::pricing::CartConfig;
use carton_core::types::{
    CartSnapshot, Discount, LineItem, ProductSnapshot, ShippingSelection,
};
use carton_store::error::{StorageResult, SyncResult};
use carton_store::{
    CartKey, CartStorage, CartStore, MemoryStorage, NoopBackend, ReconcileBackend, StorageError,
    SyncError,
};

fn product(id: &str, price_cents: i64) -> ProductSnapshot {
    ProductSnapshot {
        id: id.to_string(),
        slug: format!("product-{}", id),
        name: format!("Product {}", id),
        price_cents,
        shipping_weight_grams: None,
        is_active: true,
        is_in_stock: true,
    }
}

// =============================================================================
// Checkout Flow
// =============================================================================

#[tokio::test]
async fn checkout_flow_matches_expected_totals() {
    let mut cart = CartStore::open(
        MemoryStorage::new(),
        CartKey::generate(),
        CartConfig::default(),
    )
    .await;

    // $20.00 × 2 → subtotal $40.00
    cart.add_item(product("p1", 2000), None, 2).await.unwrap();
    assert_eq!(cart.summary().subtotal_cents, 4000);

    // 10% off → $4.00 discount, taxable $36.00, tax $2.88
    cart.try_apply_discount(Discount::percentage("TEN", 1000, "10% off"))
        .await;
    assert!(cart.error().is_none());
    assert_eq!(cart.summary().discount_cents, 400);
    assert_eq!(cart.summary().tax_cents, 288);
    assert_eq!(cart.summary().total_cents, 3888);

    // $5.00 shipping raises the total...
    cart.set_shipping(ShippingSelection {
        method: "standard".to_string(),
        cost_cents: 500,
        estimated_days: 5,
        carrier: None,
    })
    .await;
    assert_eq!(cart.summary().total_cents, 4388);

    // ...until free shipping zeroes it again
    cart.try_apply_discount(Discount::free_shipping("FREESHIP", "Free shipping"))
        .await;
    assert_eq!(cart.summary().shipping_cents, 0);
    assert_eq!(cart.summary().total_cents, 3888);

    // Dropping the free-shipping code restores the selected cost
    cart.remove_discount("FREESHIP").await;
    assert_eq!(cart.summary().shipping_cents, 500);
    assert_eq!(cart.summary().total_cents, 4388);
}

// =============================================================================
// Save-Failure Resilience
// =============================================================================

/// Storage that accepts loads but fails every save.
struct ReadOnlyStorage;

impl CartStorage for ReadOnlyStorage {
    async fn load(&self, _key: &CartKey) -> StorageResult<Option<CartSnapshot>> {
        Ok(None)
    }

    async fn save(&self, _key: &CartKey, _snapshot: &CartSnapshot) -> StorageResult<()> {
        Err(StorageError::Unavailable("disk full".to_string()))
    }

    async fn clear(&self, _key: &CartKey) -> StorageResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn save_failure_keeps_the_in_memory_mutation() {
    let mut cart = CartStore::open(
        ReadOnlyStorage,
        CartKey::generate(),
        CartConfig::default(),
    )
    .await;

    // The save fails (and is logged), but the mutation stands and the
    // summary stays consistent. No error surfaces to the shopper.
    cart.add_item(product("p1", 2000), None, 2).await.unwrap();
    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.summary().subtotal_cents, 4000);
    assert!(cart.error().is_none());
}

// =============================================================================
// Reconciliation
// =============================================================================

/// Backend that returns a fixed authoritative snapshot.
struct AuthoritativeBackend {
    snapshot: CartSnapshot,
}

impl ReconcileBackend for AuthoritativeBackend {
    async fn reconcile(&self, _local: &CartSnapshot) -> SyncResult<Option<CartSnapshot>> {
        Ok(Some(self.snapshot.clone()))
    }
}

/// Backend that always fails.
struct UnreachableBackend;

impl ReconcileBackend for UnreachableBackend {
    async fn reconcile(&self, _local: &CartSnapshot) -> SyncResult<Option<CartSnapshot>> {
        Err(SyncError::Backend("cart service unreachable".to_string()))
    }
}

#[tokio::test]
async fn noop_backend_leaves_local_cart_alone() {
    let mut cart = CartStore::open(
        MemoryStorage::new(),
        CartKey::generate(),
        CartConfig::default(),
    )
    .await;
    cart.add_item(product("p1", 2000), None, 2).await.unwrap();
    let before = cart.state().snapshot();

    cart.sync_with_server(&NoopBackend).await;

    assert_eq!(cart.state().snapshot(), before);
    assert!(!cart.state().is_loading);
    assert!(cart.error().is_none());
}

#[tokio::test]
async fn authoritative_snapshot_replaces_local_contents() {
    let mut cart = CartStore::open(
        MemoryStorage::new(),
        CartKey::generate(),
        CartConfig::default(),
    )
    .await;
    cart.add_item(product("local", 1000), None, 1).await.unwrap();

    let server_cart = CartSnapshot {
        items: vec![LineItem::new(product("server", 3000), None, 2)],
        discounts: vec![Discount::fixed_amount("SRV", 500, "$5 off")],
        shipping: None,
        // Deliberately bogus: the store must recompute, not trust it.
        summary: Default::default(),
    };

    cart.sync_with_server(&AuthoritativeBackend {
        snapshot: server_cart,
    })
    .await;

    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.items()[0].product_id, "server");
    // Summary recomputed locally: $60.00 − $5.00 = $55.00 + 8% tax
    assert_eq!(cart.summary().subtotal_cents, 6000);
    assert_eq!(cart.summary().discount_cents, 500);
    assert_eq!(cart.summary().total_cents, 5940);
}

#[tokio::test]
async fn backend_failure_surfaces_error_and_preserves_state() {
    let mut cart = CartStore::open(
        MemoryStorage::new(),
        CartKey::generate(),
        CartConfig::default(),
    )
    .await;
    cart.add_item(product("p1", 2000), None, 2).await.unwrap();
    let before = cart.state().snapshot();

    cart.sync_with_server(&UnreachableBackend).await;

    assert_eq!(
        cart.error(),
        Some("Cart sync failed: cart service unreachable")
    );
    assert_eq!(cart.state().snapshot(), before);
    assert!(!cart.state().is_loading);
}

#[tokio::test]
async fn local_mutations_remain_legal_after_failed_sync() {
    let mut cart = CartStore::open(
        MemoryStorage::new(),
        CartKey::generate(),
        CartConfig::default(),
    )
    .await;

    cart.sync_with_server(&UnreachableBackend).await;
    assert!(cart.error().is_some());

    // The cart is still fully usable; the next successful safe
    // operation clears the stale sync error.
    cart.add_item(product("p1", 2000), None, 1).await.unwrap();
    cart.try_apply_discount(Discount::percentage("TEN", 1000, "10% off"))
        .await;
    assert!(cart.error().is_none());
    assert_eq!(cart.summary().subtotal_cents, 2000);
}
