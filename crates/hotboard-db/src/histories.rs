use hotboard_core::HistoryWithTopic;
use serde_json::Value;
use sqlx::PgPool;

use crate::{row::decode_all, DbError};

const ENTITY: &str = "history";

/// History rows for `batch_id`, each merged with its topic's title, source
/// and url, by ascending rank (unranked last). Rows whose topic was deleted
/// fall out of the inner join.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] on query failure, or [`DbError::Decode`] if a
/// row does not match [`HistoryWithTopic`].
pub async fn list_histories_with_topic_by_batch(
    pool: &PgPool,
    batch_id: &str,
) -> Result<Vec<HistoryWithTopic>, DbError> {
    let rows = sqlx::query_scalar::<_, Value>(
        "SELECT to_jsonb(h) || jsonb_build_object( \
             'topic_title', t.title, 'topic_source', t.source, 'topic_url', t.url) \
         FROM trending_history h \
         JOIN trending_topics t ON t.id = h.topic_id \
         WHERE h.batch_id = $1 \
         ORDER BY h.rank ASC NULLS LAST, h.id ASC",
    )
    .bind(batch_id)
    .fetch_all(pool)
    .await?;

    decode_all(ENTITY, rows)
}

/// Same as [`list_histories_with_topic_by_batch`], restricted to topics whose
/// source is `source`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] on query failure, or [`DbError::Decode`] if a
/// row does not match [`HistoryWithTopic`].
pub async fn list_histories_with_topic_by_batch_and_source(
    pool: &PgPool,
    batch_id: &str,
    source: &str,
) -> Result<Vec<HistoryWithTopic>, DbError> {
    let rows = sqlx::query_scalar::<_, Value>(
        "SELECT to_jsonb(h) || jsonb_build_object( \
             'topic_title', t.title, 'topic_source', t.source, 'topic_url', t.url) \
         FROM trending_history h \
         JOIN trending_topics t ON t.id = h.topic_id \
         WHERE h.batch_id = $1 AND t.source = $2 \
         ORDER BY h.rank ASC NULLS LAST, h.id ASC",
    )
    .bind(batch_id)
    .bind(source)
    .fetch_all(pool)
    .await?;

    decode_all(ENTITY, rows)
}
