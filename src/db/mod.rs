//! Database module for persistent storage.
//!
//! Provides async SQLite access using SQLx for the `track` table, which
//! records every (nickname, hostname) pair the bot has observed.
//!
//! The handle is owned by the plugin that opened it and closed on unload.
//! After [`Database::close`] every repository call fails with
//! [`DbError::Closed`].
//!
//! Callers queue on a semaphore sized to the pool rather than on the pool's
//! acquire timeout, so a burst of writes waits instead of being dropped.

mod track;

pub use track::{TrackRecord, TrackRepository, UpsertOutcome};

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Semaphore, SemaphorePermit};
use tracing::info;

static MEMDB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Schema for the tracking table. Safe to run on every load.
const CREATE_TRACK_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS track (
    track_id INTEGER PRIMARY KEY,
    nickname TEXT NOT NULL,
    hostname TEXT NOT NULL,
    seen TEXT NOT NULL,
    UNIQUE(nickname, hostname)
)
"#;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),
    #[error("store closed")]
    Closed,
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("invalid record: {0}")]
    InvalidRecord(&'static str),
}

#[derive(Clone)]
enum Backend {
    Pool {
        pool: SqlitePool,
        /// One permit per pooled connection.
        slots: Arc<Semaphore>,
    },
    Unavailable(String),
}

/// Database handle with connection pool.
#[derive(Clone)]
pub struct Database {
    backend: Backend,
}

impl Database {
    /// Pool acquire timeout. Only reachable if a connection is lost while a
    /// slot is held; ordinary contention queues on the slot semaphore.
    const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connections for file-backed databases.
    const FILE_CONNECTIONS: u32 = 5;

    /// Maximum time a connection can remain idle before being closed.
    const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

    /// Open (creating if needed) the database at `path` and ensure the schema.
    ///
    /// `":memory:"` opens a private in-memory database.
    pub async fn new(path: &str) -> Result<Self, DbError> {
        let db = Self::connect(path).await?;
        db.ensure_schema().await?;
        Ok(db)
    }

    /// Open the database without touching the schema.
    pub async fn connect(path: &str) -> Result<Self, DbError> {
        let (pool, connections) = if path == ":memory:" {
            // `file::memory:` is shared process-wide and collides across
            // parallel tests, so every handle gets its own name.
            let id = MEMDB_COUNTER.fetch_add(1, Ordering::Relaxed);
            let memdb_uri = format!(
                "file:slircd-track-memdb-{}-{}?mode=memory&cache=shared",
                std::process::id(),
                id
            );

            let options = SqliteConnectOptions::new()
                .filename(&memdb_uri)
                .shared_cache(true)
                .create_if_missing(true);

            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .acquire_timeout(Self::ACQUIRE_TIMEOUT)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?;
            (pool, 1)
        } else {
            if let Some(parent) = Path::new(path).parent()
                && !parent.as_os_str().is_empty()
                && let Err(e) = std::fs::create_dir_all(parent)
            {
                tracing::warn!(path = %parent.display(), error = %e, "Failed to create database directory");
            }

            let options = SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true);

            let pool = SqlitePoolOptions::new()
                .max_connections(Self::FILE_CONNECTIONS)
                .acquire_timeout(Self::ACQUIRE_TIMEOUT)
                .idle_timeout(Some(Self::IDLE_TIMEOUT))
                .test_before_acquire(true)
                .connect_with(options)
                .await?;

            // WAL lets WHO bursts write while commands read
            sqlx::query("PRAGMA journal_mode=WAL")
                .execute(&pool)
                .await?;
            (pool, Self::FILE_CONNECTIONS as usize)
        };

        info!(path = %path, "Connected to track database");

        Ok(Self {
            backend: Backend::Pool {
                pool,
                slots: Arc::new(Semaphore::new(connections)),
            },
        })
    }

    /// A handle whose every operation fails with [`DbError::Unavailable`].
    ///
    /// Used when the database could not be opened so the plugin can stay
    /// loaded in a degraded state.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            backend: Backend::Unavailable(reason.into()),
        }
    }

    /// Create the `track` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), DbError> {
        let (_slot, pool) = self.checkout().await?;
        sqlx::query(CREATE_TRACK_TABLE).execute(pool).await?;
        info!("Track table checked/created");
        Ok(())
    }

    /// Get reference to the underlying connection pool.
    pub fn pool(&self) -> Result<&SqlitePool, DbError> {
        match &self.backend {
            Backend::Pool { pool, .. } if pool.is_closed() => Err(DbError::Closed),
            Backend::Pool { pool, .. } => Ok(pool),
            Backend::Unavailable(reason) => Err(DbError::Unavailable(reason.clone())),
        }
    }

    /// Wait (without timeout) for a free connection slot.
    ///
    /// The permit must be held for as long as the pool is used.
    pub(crate) async fn checkout(&self) -> Result<(SemaphorePermit<'_>, &SqlitePool), DbError> {
        match &self.backend {
            Backend::Pool { pool, slots } => {
                let permit = slots.acquire().await.map_err(|_| DbError::Closed)?;
                if pool.is_closed() {
                    return Err(DbError::Closed);
                }
                Ok((permit, pool))
            }
            Backend::Unavailable(reason) => Err(DbError::Unavailable(reason.clone())),
        }
    }

    /// Whether [`Database::close`] has been called on this handle (or a clone).
    pub fn is_closed(&self) -> bool {
        matches!(&self.backend, Backend::Pool { pool, .. } if pool.is_closed())
    }

    /// Close the pool. Waits for checked-out connections to be returned.
    pub async fn close(&self) -> Result<(), DbError> {
        match &self.backend {
            Backend::Pool { pool, .. } if pool.is_closed() => Ok(()),
            Backend::Pool { pool, slots } => {
                // Queued callers wake up with `Closed`.
                slots.close();
                pool.close().await;
                info!("Closed the track database connection");
                Ok(())
            }
            Backend::Unavailable(reason) => Err(DbError::Unavailable(reason.clone())),
        }
    }

    /// Get track repository.
    pub fn track(&self) -> TrackRepository<'_> {
        TrackRepository::new(self)
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolClosed => DbError::Closed,
            other => DbError::Sqlx(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ensure_schema_is_idempotent() {
        let db = Database::new(":memory:").await.unwrap();
        db.ensure_schema().await.unwrap();
        db.ensure_schema().await.unwrap();
        assert_eq!(db.track().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn memory_databases_are_isolated() {
        let a = Database::new(":memory:").await.unwrap();
        let b = Database::new(":memory:").await.unwrap();
        a.track()
            .upsert("alice", "host1", chrono::Utc::now())
            .await
            .unwrap();
        assert_eq!(a.track().count().await.unwrap(), 1);
        assert_eq!(b.track().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn close_is_safe_to_repeat() {
        let db = Database::new(":memory:").await.unwrap();
        db.close().await.unwrap();
        db.close().await.unwrap();
        assert!(db.is_closed());
        assert!(matches!(db.pool(), Err(DbError::Closed)));
    }

    #[tokio::test]
    async fn callers_wait_for_a_free_slot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("track.db");
        let db = Database::new(path.to_str().unwrap()).await.unwrap();

        let mut held = Vec::new();
        for _ in 0..Database::FILE_CONNECTIONS {
            held.push(db.checkout().await.unwrap());
        }

        let queued = {
            let db = db.clone();
            tokio::spawn(async move {
                db.track()
                    .upsert("alice", "host1", chrono::Utc::now())
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!queued.is_finished());

        drop(held);
        assert!(queued.await.unwrap().unwrap().is_inserted());
    }

    #[tokio::test]
    async fn close_wakes_queued_callers() {
        let db = Database::new(":memory:").await.unwrap();
        let held = db.checkout().await.unwrap();

        let queued = {
            let db = db.clone();
            tokio::spawn(async move { db.track().count().await })
        };
        tokio::task::yield_now().await;

        db.close().await.unwrap();
        assert!(matches!(queued.await.unwrap(), Err(DbError::Closed)));
        drop(held);
    }

    #[tokio::test]
    async fn unavailable_handle_fails_every_operation() {
        let db = Database::unavailable("permission denied");
        assert!(matches!(
            db.ensure_schema().await,
            Err(DbError::Unavailable(_))
        ));
        assert!(matches!(
            db.track().count().await,
            Err(DbError::Unavailable(_))
        ));
        assert!(!db.is_closed());
    }
}
