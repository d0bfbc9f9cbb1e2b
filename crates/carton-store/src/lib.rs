//! # carton-store: Cart State, Persistence & Reconciliation
//!
//! The stateful shell around [`carton_core`]: owns the cart, keeps its
//! summary consistent, and snapshots it to durable storage.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       carton-store Data Flow                        │
//! │                                                                     │
//! │  Caller mutation (add_item / apply_discount / ...)                  │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────────┐    │
//! │  │                    CartStore (store.rs)                     │    │
//! │  │   mutate state ──► carton_core::compute_summary ──► save    │    │
//! │  └───────────────────────────┬─────────────────────────────────┘    │
//! │                              │ CartSnapshot (JSON)                  │
//! │       ┌──────────────────────┼──────────────────────┐               │
//! │       ▼                      ▼                      ▼               │
//! │  ┌──────────┐        ┌──────────────┐      ┌────────────────┐       │
//! │  │ SQLite   │        │ MemoryStorage│      │ReconcileBackend│       │
//! │  │ (sqlite) │        │ (tests)      │      │ (server sync)  │       │
//! │  └──────────┘        └──────────────┘      └────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`store`] - [`CartStore`] and [`CartState`]
//! - [`storage`] - the [`CartStorage`] seam, [`CartKey`], [`MemoryStorage`]
//! - [`sqlite`] - pooled SQLite storage with embedded migrations
//! - [`sync`] - [`ReconcileBackend`] extension point and [`NoopBackend`]
//! - [`error`] - storage and sync error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use carton_core::pricing::CartConfig;
//! use carton_store::{CartKey, CartStore, SqliteStorage, StorageConfig};
//!
//! # async fn example() -> Result<(), carton_store::StorageError> {
//! let storage = SqliteStorage::connect(StorageConfig::new("./carton.db")).await?;
//! let mut cart = CartStore::open(storage, CartKey::generate(), CartConfig::default()).await;
//!
//! // mutations keep the summary consistent and persist automatically
//! assert!(cart.is_empty());
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod sqlite;
pub mod storage;
pub mod store;
pub mod sync;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StorageError, StorageResult, SyncError, SyncResult};
pub use sqlite::{SqliteStorage, StorageConfig};
pub use storage::{CartKey, CartStorage, MemoryStorage};
pub use store::{CartState, CartStore};
pub use sync::{NoopBackend, ReconcileBackend};
