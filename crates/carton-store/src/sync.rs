//! # Reconciliation Seam
//!
//! The extension point for synchronizing a local cart with a
//! server-held copy.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  CartStore::sync_with_server(backend)                               │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  backend.reconcile(local snapshot)   ← the only suspension point    │
//! │       │                                                             │
//! │       ├── Ok(None)      → server had nothing; local state stands    │
//! │       ├── Ok(Some(s))   → authoritative copy; replaces local        │
//! │       │                   contents (summary recomputed locally)     │
//! │       └── Err(e)        → message surfaces as the cart-level        │
//! │                           error string; local state untouched       │
//! │                                                                     │
//! │  The store borrows itself exclusively for the exchange, so local    │
//! │  mutations serialize around a reconcile rather than racing its      │
//! │  result. Backends that merge server-side still must not be          │
//! │  assumed idempotent.                                                │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use carton_core::types::CartSnapshot;

use crate::error::SyncResult;

// =============================================================================
// Backend Trait
// =============================================================================

/// A server-side cart the local cart reconciles against.
///
/// The shipped merge policy is last-writer-wins at snapshot granularity:
/// a returned snapshot wholly replaces local items, discounts, and
/// shipping. Backends that want line-item merging perform it server-side
/// and return the merged result.
///
/// Implementations must NOT be assumed idempotent unless designed that
/// way, and should enforce their own timeout (mapping it to
/// [`crate::error::SyncError::Timeout`]).
// Static dispatch only; backends are chosen at compile time.
#[allow(async_fn_in_trait)]
pub trait ReconcileBackend {
    /// Exchanges the local snapshot for an authoritative one.
    ///
    /// `Ok(None)` means the server has no competing cart and the local
    /// copy stands as-is.
    async fn reconcile(&self, local: &CartSnapshot) -> SyncResult<Option<CartSnapshot>>;
}

// =============================================================================
// No-Op Backend
// =============================================================================

/// Placeholder backend: performs no network exchange and cannot fail in
/// a way that corrupts local state. The default until a real cart
/// service exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBackend;

impl ReconcileBackend for NoopBackend {
    async fn reconcile(&self, _local: &CartSnapshot) -> SyncResult<Option<CartSnapshot>> {
        Ok(None)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
