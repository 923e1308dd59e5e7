use hotboard_core::Batch;
use serde_json::Value;
use sqlx::PgPool;

use crate::{row::decode, DbError};

/// The most recently created crawl batch. Ties on `created_at` go to the
/// greater `batch_id`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] when no batch exists, [`DbError::Sqlx`] on
/// query failure, or [`DbError::Decode`] if the row does not match [`Batch`].
pub async fn get_latest_batch(pool: &PgPool) -> Result<Batch, DbError> {
    let raw = sqlx::query_scalar::<_, Value>(
        "SELECT to_jsonb(b) FROM crawl_batches b \
         ORDER BY b.created_at DESC, b.batch_id DESC \
         LIMIT 1",
    )
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    decode("batch", raw)
}
