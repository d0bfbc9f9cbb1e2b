//! # Snapshot Storage Seam
//!
//! The async load/save boundary between the cart store and durable
//! storage. One snapshot per cart key; format is JSON, an
//! implementation detail the trait hides.
//!
//! Two implementations ship with the crate:
//! - [`crate::sqlite::SqliteStorage`] - the production store
//! - [`MemoryStorage`] - process-local, for tests and previews

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use carton_core::types::CartSnapshot;

use crate::error::StorageResult;

// =============================================================================
// Cart Key
// =============================================================================

/// Identifies one cart within the snapshot store.
///
/// A browser session maps to one key; an authenticated user may reuse a
/// stable key across sessions. Writes are last-write-wins per key with
/// no cross-process locking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartKey(String);

impl CartKey {
    /// Generates a fresh random key (UUID v4, no coordination needed).
    pub fn generate() -> Self {
        CartKey(Uuid::new_v4().to_string())
    }

    /// Wraps an existing key (e.g. a user id).
    pub fn new(key: impl Into<String>) -> Self {
        CartKey(key.into())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Storage Trait
// =============================================================================

/// Durable snapshot storage for cart state.
///
/// Only the durable subset ([`CartSnapshot`]) crosses this boundary;
/// transient flags never reach an implementation.
// Static dispatch only (CartStore<S>); no dyn or Send-bound concerns.
#[allow(async_fn_in_trait)]
pub trait CartStorage {
    /// Loads the snapshot for `key`, or `None` when nothing is stored.
    async fn load(&self, key: &CartKey) -> StorageResult<Option<CartSnapshot>>;

    /// Writes the snapshot for `key`, replacing any previous one.
    async fn save(&self, key: &CartKey, snapshot: &CartSnapshot) -> StorageResult<()>;

    /// Deletes the snapshot for `key`. No-op when absent.
    async fn clear(&self, key: &CartKey) -> StorageResult<()>;
}

// =============================================================================
// In-Memory Storage
// =============================================================================

/// Process-local snapshot storage backed by a HashMap.
///
/// Serializes through JSON exactly like the SQLite implementation, so
/// tests exercise the same round-trip path.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    // JSON payloads keyed by cart key. std Mutex: never held across await.
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored snapshots (test helper).
    pub fn len(&self) -> usize {
        self.entries.lock().expect("storage mutex poisoned").len()
    }

    /// Whether the store holds no snapshots.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Seeds a raw payload, bypassing serialization. Lets tests plant a
    /// corrupt snapshot and exercise the load fallback.
    pub fn seed_raw(&self, key: &CartKey, payload: impl Into<String>) {
        self.entries
            .lock()
            .expect("storage mutex poisoned")
            .insert(key.as_str().to_string(), payload.into());
    }
}

impl CartStorage for MemoryStorage {
    async fn load(&self, key: &CartKey) -> StorageResult<Option<CartSnapshot>> {
        let payload = {
            let entries = self.entries.lock().expect("storage mutex poisoned");
            entries.get(key.as_str()).cloned()
        };

        match payload {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, key: &CartKey, snapshot: &CartSnapshot) -> StorageResult<()> {
        let json = serde_json::to_string(snapshot)?;
        self.entries
            .lock()
            .expect("storage mutex poisoned")
            .insert(key.as_str().to_string(), json);
        Ok(())
    }

    async fn clear(&self, key: &CartKey) -> StorageResult<()> {
        self.entries
            .lock()
            .expect("storage mutex poisoned")
            .remove(key.as_str());
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
