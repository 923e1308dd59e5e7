use hotboard_core::{NewTopic, Topic, TopicPatch};
use serde_json::{Map, Value};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    row::{decode, decode_all, encode_columns},
    DbError,
};

const ENTITY: &str = "topic";

/// Columns a client may write. `id` is always storage-assigned.
const WRITABLE_COLUMNS: &[&str] = &["source", "unique_key", "title", "url", "first_seen_at"];

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// List every topic, newest `first_seen_at` first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] on query failure, or [`DbError::Decode`] if a
/// row does not match [`Topic`].
pub async fn list_topics(pool: &PgPool) -> Result<Vec<Topic>, DbError> {
    let rows = sqlx::query_scalar::<_, Value>(
        "SELECT to_jsonb(t) FROM trending_topics t \
         ORDER BY t.first_seen_at DESC NULLS LAST, t.id DESC",
    )
    .fetch_all(pool)
    .await?;

    decode_all(ENTITY, rows)
}

/// Fetch a single topic by primary key.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] on query failure, or [`DbError::Decode`] if the
/// row does not match [`Topic`].
pub async fn get_topic(pool: &PgPool, id: i64) -> Result<Option<Topic>, DbError> {
    let row = sqlx::query_scalar::<_, Value>("SELECT to_jsonb(t) FROM trending_topics t WHERE t.id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(|raw| decode(ENTITY, raw)).transpose()
}

/// Fetch a topic by its `(source, unique_key)` identity.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] on query failure, or [`DbError::Decode`] if the
/// row does not match [`Topic`].
pub async fn get_topic_by_unique_key(
    pool: &PgPool,
    source: &str,
    unique_key: &str,
) -> Result<Option<Topic>, DbError> {
    let row = sqlx::query_scalar::<_, Value>(
        "SELECT to_jsonb(t) FROM trending_topics t \
         WHERE t.source = $1 AND t.unique_key = $2",
    )
    .bind(source)
    .bind(unique_key)
    .fetch_optional(pool)
    .await?;

    row.map(|raw| decode(ENTITY, raw)).transpose()
}

/// List topics for one platform, newest `first_seen_at` first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] on query failure, or [`DbError::Decode`] if a
/// row does not match [`Topic`].
pub async fn list_topics_by_source(pool: &PgPool, source: &str) -> Result<Vec<Topic>, DbError> {
    let rows = sqlx::query_scalar::<_, Value>(
        "SELECT to_jsonb(t) FROM trending_topics t \
         WHERE t.source = $1 \
         ORDER BY t.first_seen_at DESC NULLS LAST, t.id DESC",
    )
    .bind(source)
    .fetch_all(pool)
    .await?;

    decode_all(ENTITY, rows)
}

/// The `limit` most recently seen topics.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] on query failure, or [`DbError::Decode`] if a
/// row does not match [`Topic`].
pub async fn list_latest_topics(pool: &PgPool, limit: i64) -> Result<Vec<Topic>, DbError> {
    let rows = sqlx::query_scalar::<_, Value>(
        "SELECT to_jsonb(t) FROM trending_topics t \
         ORDER BY t.first_seen_at DESC NULLS LAST, t.id DESC \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    decode_all(ENTITY, rows)
}

/// Topics with at least one history row in `batch_id`, each listed once and
/// ordered by its best rank in that batch. Unranked topics come last.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] on query failure, or [`DbError::Decode`] if a
/// row does not match [`Topic`].
pub async fn list_topics_by_batch(pool: &PgPool, batch_id: &str) -> Result<Vec<Topic>, DbError> {
    let rows = sqlx::query_scalar::<_, Value>(
        "SELECT to_jsonb(t) FROM trending_topics t \
         JOIN ( \
             SELECT topic_id, MIN(rank) AS best_rank \
             FROM trending_history \
             WHERE batch_id = $1 \
             GROUP BY topic_id \
         ) h ON h.topic_id = t.id \
         ORDER BY h.best_rank ASC NULLS LAST, t.id ASC",
    )
    .bind(batch_id)
    .fetch_all(pool)
    .await?;

    decode_all(ENTITY, rows)
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Insert a topic and return the stored row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] on query failure (including a duplicate
/// `(source, unique_key)`), [`DbError::Encode`] if the input produces a
/// non-writable column, or [`DbError::Decode`] if the returned row does not
/// match [`Topic`].
pub async fn create_topic(pool: &PgPool, topic: &NewTopic) -> Result<Topic, DbError> {
    let columns = encode_columns(ENTITY, topic, WRITABLE_COLUMNS)?;
    let names: Vec<String> = columns.keys().cloned().collect();

    let mut builder = QueryBuilder::<Postgres>::new("INSERT INTO trending_topics AS t (");
    builder.push(names.join(", "));
    builder.push(") SELECT ");
    builder.push(
        names
            .iter()
            .map(|name| format!("r.{name}"))
            .collect::<Vec<_>>()
            .join(", "),
    );
    builder.push(" FROM jsonb_populate_record(NULL::trending_topics, ");
    builder.push_bind(Value::Object(columns));
    builder.push(") AS r RETURNING to_jsonb(t)");

    let raw: Value = builder.build_query_scalar().fetch_one(pool).await?;
    decode(ENTITY, raw)
}

/// Apply the set fields of `patch` to topic `id`.
///
/// An empty patch writes nothing and returns the current row. Returns
/// `Ok(None)` when no topic has that id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] on query failure (including a duplicate
/// `(source, unique_key)`), [`DbError::Encode`] if the patch produces a
/// non-writable column, or [`DbError::Decode`] if the returned row does not
/// match [`Topic`].
pub async fn update_topic(
    pool: &PgPool,
    id: i64,
    patch: &TopicPatch,
) -> Result<Option<Topic>, DbError> {
    let columns = encode_columns(ENTITY, patch, WRITABLE_COLUMNS)?;
    if columns.is_empty() {
        return get_topic(pool, id).await;
    }

    let mut builder = QueryBuilder::<Postgres>::new("UPDATE trending_topics AS t SET ");
    builder.push(assignments(&columns));
    builder.push(" FROM jsonb_populate_record(NULL::trending_topics, ");
    builder.push_bind(Value::Object(columns));
    builder.push(") AS r WHERE t.id = ");
    builder.push_bind(id);
    builder.push(" RETURNING to_jsonb(t)");

    let raw: Option<Value> = builder.build_query_scalar().fetch_optional(pool).await?;
    raw.map(|raw| decode(ENTITY, raw)).transpose()
}

/// Delete topic `id`. Returns whether a row was removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] on query failure.
pub async fn delete_topic(pool: &PgPool, id: i64) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM trending_topics WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

fn assignments(columns: &Map<String, Value>) -> String {
    columns
        .keys()
        .map(|name| format!("{name} = r.{name}"))
        .collect::<Vec<_>>()
        .join(", ")
}
