//! # Store Error Types
//!
//! Error types for persistence and reconciliation.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  sqlx::Error / serde_json::Error                                    │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  StorageError ← categorized, with context                           │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  CartStore: load failures fall back to an empty cart, save          │
//! │  failures are logged and swallowed. No storage error is fatal.      │
//! │                                                                     │
//! │  SyncError follows the same shape for the reconcile seam; backend   │
//! │  failures surface as the cart-level error string.                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Storage Error
// =============================================================================

/// Durable snapshot storage failures.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Could not open the backing store.
    #[error("Storage connection failed: {0}")]
    ConnectionFailed(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Read/write against the store failed.
    #[error("Storage query failed: {0}")]
    QueryFailed(String),

    /// A persisted payload could not be deserialized.
    ///
    /// The loader treats this as "no snapshot" and starts empty rather
    /// than refusing to run with an unreadable cart.
    #[error("Corrupt cart snapshot: {0}")]
    CorruptSnapshot(String),

    /// Connection pool exhausted or closed.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => {
                StorageError::Unavailable("connection pool exhausted".to_string())
            }
            sqlx::Error::PoolClosed => StorageError::Unavailable("pool is closed".to_string()),
            sqlx::Error::Database(db_err) => StorageError::QueryFailed(db_err.message().to_string()),
            other => StorageError::QueryFailed(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StorageError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StorageError::MigrationFailed(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::CorruptSnapshot(err.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// Sync Error
// =============================================================================

/// Reconciliation failures against a server-held cart.
///
/// Never fatal: the store catches these and surfaces the message on the
/// cart state, leaving local contents untouched.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The backend could not complete the exchange.
    #[error("Cart sync failed: {0}")]
    Backend(String),

    /// The exchange did not finish in time.
    #[error("Cart sync timed out")]
    Timeout,
}

/// Result type for reconciliation.
pub type SyncResult<T> = Result<T, SyncError>;

// =============================================================================
// Unit Tests
// =============================================================================
