use hotboard_core::{
    Batch, BatchStore, HistoryStore, HistoryWithTopic, NewTopic, StoreError, Topic, TopicPatch,
    TopicStore,
};
use sqlx::PgPool;

use crate::{batches, histories, topics};

/// Postgres-backed implementation of every store trait.
///
/// Holds a clone of the pool it was built from; it never opens or closes
/// connections itself.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl TopicStore for PgStore {
    async fn find_all(&self) -> Result<Vec<Topic>, StoreError> {
        Ok(topics::list_topics(&self.pool).await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Topic>, StoreError> {
        Ok(topics::get_topic(&self.pool, id).await?)
    }

    async fn find_by_unique_key(
        &self,
        source: &str,
        unique_key: &str,
    ) -> Result<Option<Topic>, StoreError> {
        Ok(topics::get_topic_by_unique_key(&self.pool, source, unique_key).await?)
    }

    async fn find_by_source(&self, source: &str) -> Result<Vec<Topic>, StoreError> {
        Ok(topics::list_topics_by_source(&self.pool, source).await?)
    }

    async fn create(&self, topic: &NewTopic) -> Result<Topic, StoreError> {
        let created = topics::create_topic(&self.pool, topic).await?;
        tracing::debug!(id = created.id, source = %created.source, "topic created");
        Ok(created)
    }

    async fn update(&self, id: i64, patch: &TopicPatch) -> Result<Option<Topic>, StoreError> {
        let updated = topics::update_topic(&self.pool, id, patch).await?;
        tracing::debug!(id, found = updated.is_some(), "topic update");
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let deleted = topics::delete_topic(&self.pool, id).await?;
        tracing::debug!(id, deleted, "topic delete");
        Ok(deleted)
    }

    async fn get_latest(&self, limit: i64) -> Result<Vec<Topic>, StoreError> {
        Ok(topics::list_latest_topics(&self.pool, limit).await?)
    }

    async fn get_topics_by_batch(&self, batch_id: &str) -> Result<Vec<Topic>, StoreError> {
        Ok(topics::list_topics_by_batch(&self.pool, batch_id).await?)
    }
}

impl BatchStore for PgStore {
    async fn get_latest_batch(&self) -> Result<Batch, StoreError> {
        let batch = batches::get_latest_batch(&self.pool).await?;
        tracing::debug!(batch_id = %batch.batch_id, "latest batch");
        Ok(batch)
    }
}

impl HistoryStore for PgStore {
    async fn get_histories_with_topic_by_batch(
        &self,
        batch_id: &str,
    ) -> Result<Vec<HistoryWithTopic>, StoreError> {
        let rows = histories::list_histories_with_topic_by_batch(&self.pool, batch_id).await?;
        tracing::debug!(batch_id, rows = rows.len(), "batch history");
        Ok(rows)
    }

    async fn get_histories_with_topic_by_batch_and_source(
        &self,
        batch_id: &str,
        source: &str,
    ) -> Result<Vec<HistoryWithTopic>, StoreError> {
        let rows =
            histories::list_histories_with_topic_by_batch_and_source(&self.pool, batch_id, source)
                .await?;
        tracing::debug!(batch_id, source, rows = rows.len(), "batch history");
        Ok(rows)
    }
}
