//! Storage seams. The Postgres implementation lives in `hotboard-db`; the
//! aggregation engine only depends on these traits.

use std::future::Future;

use thiserror::Error;

use crate::models::{Batch, HistoryWithTopic, NewTopic, Topic, TopicPatch};

/// Default row count for [`TopicStore::get_latest`].
pub const DEFAULT_LATEST_LIMIT: i64 = 50;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested entity does not exist.
    #[error("record not found")]
    NotFound,

    /// A write collided with an existing `(source, unique_key)` pair.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Connectivity or query failure in the backing store.
    #[error("data source unavailable: {0}")]
    Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A stored row did not match the expected projection.
    #[error("malformed {entity} row: {reason}")]
    Decode {
        entity: &'static str,
        reason: String,
    },
}

pub trait TopicStore {
    /// All topics, newest first by `first_seen_at`.
    fn find_all(&self) -> impl Future<Output = Result<Vec<Topic>, StoreError>> + Send;

    fn find_by_id(&self, id: i64)
        -> impl Future<Output = Result<Option<Topic>, StoreError>> + Send;

    fn find_by_unique_key(
        &self,
        source: &str,
        unique_key: &str,
    ) -> impl Future<Output = Result<Option<Topic>, StoreError>> + Send;

    /// Topics for one platform, newest first by `first_seen_at`.
    fn find_by_source(
        &self,
        source: &str,
    ) -> impl Future<Output = Result<Vec<Topic>, StoreError>> + Send;

    fn create(&self, topic: &NewTopic)
        -> impl Future<Output = Result<Topic, StoreError>> + Send;

    /// Applies the `Some` fields of `patch`. Returns `None` when `id` does
    /// not exist.
    fn update(
        &self,
        id: i64,
        patch: &TopicPatch,
    ) -> impl Future<Output = Result<Option<Topic>, StoreError>> + Send;

    /// Returns whether a row was removed.
    fn delete(&self, id: i64) -> impl Future<Output = Result<bool, StoreError>> + Send;

    fn get_latest(&self, limit: i64)
        -> impl Future<Output = Result<Vec<Topic>, StoreError>> + Send;

    /// Distinct topics with at least one history row in `batch_id`, ordered
    /// by their best rank in that batch.
    fn get_topics_by_batch(
        &self,
        batch_id: &str,
    ) -> impl Future<Output = Result<Vec<Topic>, StoreError>> + Send;
}

pub trait BatchStore {
    /// The batch with the greatest `created_at`.
    ///
    /// Fails with [`StoreError::NotFound`] when no batch has been recorded.
    fn get_latest_batch(&self) -> impl Future<Output = Result<Batch, StoreError>> + Send;
}

pub trait HistoryStore {
    /// History rows of `batch_id` joined with their topics, by ascending
    /// rank. Rows whose topic is missing are dropped by the join.
    fn get_histories_with_topic_by_batch(
        &self,
        batch_id: &str,
    ) -> impl Future<Output = Result<Vec<HistoryWithTopic>, StoreError>> + Send;

    /// Same as [`HistoryStore::get_histories_with_topic_by_batch`] limited to
    /// topics from `source`.
    fn get_histories_with_topic_by_batch_and_source(
        &self,
        batch_id: &str,
        source: &str,
    ) -> impl Future<Output = Result<Vec<HistoryWithTopic>, StoreError>> + Send;
}
