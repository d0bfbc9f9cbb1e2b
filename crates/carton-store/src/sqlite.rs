//! # SQLite Snapshot Storage
//!
//! The production [`CartStorage`] implementation: a pooled SQLite
//! database holding one JSON payload per cart key.
//!
//! ## Storage Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  cart_snapshot                                                      │
//! │  ┌────────────┬──────────────────────────────┬─────────────────┐    │
//! │  │ cart_key   │ payload (JSON CartSnapshot)  │ updated_at      │    │
//! │  ├────────────┼──────────────────────────────┼─────────────────┤    │
//! │  │ "sess-1"   │ {"items":[...],...}          │ 2026-08-30T...  │    │
//! │  │ "user-42"  │ {"items":[...],...}          │ 2026-08-29T...  │    │
//! │  └────────────┴──────────────────────────────┴─────────────────┘    │
//! │                                                                     │
//! │  Effectively a durable key-value store; the schema exists so        │
//! │  migrations and WAL-mode durability come for free from SQLite.      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use carton_core::types::CartSnapshot;

use crate::error::{StorageError, StorageResult};
use crate::storage::{CartKey, CartStorage};

/// Embedded migrations from `migrations/sqlite` at the workspace root.
///
/// The `sqlx::migrate!()` macro compiles the SQL files into the binary;
/// no runtime file access is needed.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

// =============================================================================
// Configuration
// =============================================================================

/// SQLite storage configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = StorageConfig::new("./data/carton.db").max_connections(2);
/// let storage = SqliteStorage::connect(config).await?;
/// ```
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Path to the SQLite database file; created if missing.
    pub database_path: PathBuf,

    /// Maximum pool size. Cart persistence is a single-writer workload,
    /// so the default stays small.
    pub max_connections: u32,

    /// Connection acquire timeout.
    pub connect_timeout: Duration,

    /// Whether to run migrations on connect.
    pub run_migrations: bool,
}

impl StorageConfig {
    /// Creates a configuration pointing at the given database file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StorageConfig {
            database_path: path.into(),
            max_connections: 2,
            connect_timeout: Duration::from_secs(30),
            run_migrations: true,
        }
    }

    /// Sets the maximum pool size.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets whether migrations run on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// In-memory database configuration for tests.
    ///
    /// Single connection: each in-memory SQLite connection is its own
    /// database, so a larger pool would see empty tables.
    pub fn in_memory() -> Self {
        StorageConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            connect_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }
}

// =============================================================================
// SQLite Storage
// =============================================================================

/// Pooled SQLite-backed snapshot storage.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Opens (creating if needed) the database and runs migrations.
    ///
    /// SQLite is configured the way a local single-writer store wants to
    /// be: WAL journal so reads never block the writer, NORMAL
    /// synchronous as the durability/speed balance.
    pub async fn connect(config: StorageConfig) -> StorageResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening cart snapshot store"
        );

        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());
        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout)
            .connect_with(connect_options)
            .await
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;

        let storage = SqliteStorage { pool };

        if config.run_migrations {
            debug!("Running snapshot store migrations");
            MIGRATOR.run(&storage.pool).await?;
        }

        Ok(storage)
    }

    /// Checks that the store can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Closes the connection pool. Call on application shutdown.
    pub async fn close(&self) {
        info!("Closing cart snapshot store");
        self.pool.close().await;
    }
}

impl CartStorage for SqliteStorage {
    async fn load(&self, key: &CartKey) -> StorageResult<Option<CartSnapshot>> {
        let payload: Option<String> =
            sqlx::query_scalar("SELECT payload FROM cart_snapshot WHERE cart_key = ?1")
                .bind(key.as_str())
                .fetch_optional(&self.pool)
                .await?;

        match payload {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, key: &CartKey, snapshot: &CartSnapshot) -> StorageResult<()> {
        let json = serde_json::to_string(snapshot)?;

        sqlx::query(
            "INSERT INTO cart_snapshot (cart_key, payload, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(cart_key) DO UPDATE SET
                 payload = excluded.payload,
                 updated_at = excluded.updated_at",
        )
        .bind(key.as_str())
        .bind(json)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!(cart_key = %key, "Cart snapshot saved");
        Ok(())
    }

    async fn clear(&self, key: &CartKey) -> StorageResult<()> {
        sqlx::query("DELETE FROM cart_snapshot WHERE cart_key = ?1")
            .bind(key.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
