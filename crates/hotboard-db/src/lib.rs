mod batches;
mod histories;
mod row;
mod store;
mod topics;

pub use batches::get_latest_batch;
pub use histories::{
    list_histories_with_topic_by_batch, list_histories_with_topic_by_batch_and_source,
};
pub use store::PgStore;
pub use topics::{
    create_topic, delete_topic, get_topic, get_topic_by_unique_key, list_latest_topics,
    list_topics, list_topics_by_batch, list_topics_by_source, update_topic,
};

use hotboard_core::{AppConfig, StoreError};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_MIN_CONNECTIONS: u32 = 1;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;
const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
            idle_timeout_secs: DEFAULT_IDLE_TIMEOUT_SECS,
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_connections: config.db_max_connections,
            min_connections: config.db_min_connections,
            acquire_timeout_secs: config.db_acquire_timeout_secs,
            idle_timeout_secs: config.db_idle_timeout_secs,
        }
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("record not found")]
    NotFound,
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error("malformed {entity} row: {source}")]
    Decode {
        entity: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot encode {entity} columns: {reason}")]
    Encode {
        entity: &'static str,
        reason: String,
    },
}

impl From<DbError> for StoreError {
    fn from(error: DbError) -> Self {
        match error {
            DbError::NotFound | DbError::Sqlx(sqlx::Error::RowNotFound) => StoreError::NotFound,
            DbError::Decode { entity, source } => StoreError::Decode {
                entity,
                reason: source.to_string(),
            },
            DbError::Sqlx(sqlx::Error::Database(ref db_error)) if db_error.is_unique_violation() => {
                StoreError::Conflict(db_error.message().to_string())
            }
            other => StoreError::Unavailable(Box::new(other)),
        }
    }
}

/// Connect to a Postgres pool using explicit URL and config.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the connection cannot be established.
pub async fn connect_pool(database_url: &str, config: PoolConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Some(Duration::from_secs(config.idle_timeout_secs)))
        .connect(database_url)
        .await
}

/// Owned handle to the storage collaborator.
///
/// Cloning shares the underlying pool. Call [`Database::close`] once on
/// shutdown; stores built from a closed handle fail every query.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] if the connection cannot be established.
    pub async fn connect(database_url: &str, config: PoolConfig) -> Result<Self, DbError> {
        let pool = connect_pool(database_url, config).await?;
        Ok(Self { pool })
    }

    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A store sharing this handle's pool.
    #[must_use]
    pub fn store(&self) -> PgStore {
        PgStore::new(self.pool.clone())
    }

    /// Send a `SELECT 1` to verify the pool has a live connection.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] if the query fails.
    pub async fn health_check(&self) -> Result<(), DbError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    /// The server's `version()` string.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] if the query fails.
    pub async fn server_version(&self) -> Result<String, DbError> {
        let version = sqlx::query_scalar::<_, String>("SELECT version()")
            .fetch_one(&self.pool)
            .await?;
        Ok(version)
    }

    /// Close every pooled connection, waiting for checked-out ones to return.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
