use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use hotboard_core::{
    format_time, BatchStore, HistoryStore, HistoryWithTopic, TimeStyle, Topic, TopicStore,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_store_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct HistoriesQuery {
    pub source: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct BatchItem {
    batch_id: String,
    ai_title: String,
    ai_content: String,
    created_at: DateTime<Utc>,
    /// Relative label such as `5分钟前`.
    created_label: String,
}

pub(super) async fn latest_batch(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<BatchItem>>, ApiError> {
    let batch = state
        .store()
        .get_latest_batch()
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    let data = BatchItem {
        created_label: format_time(&batch.created_at, Utc::now(), TimeStyle::Relative),
        batch_id: batch.batch_id,
        ai_title: batch.ai_title,
        ai_content: batch.ai_content,
        created_at: batch.created_at,
    };

    Ok(ApiResponse::new(data, req_id.0))
}

pub(super) async fn list_batch_histories(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(batch_id): Path<String>,
    Query(query): Query<HistoriesQuery>,
) -> Result<Json<ApiResponse<Vec<HistoryWithTopic>>>, ApiError> {
    let store = state.store();
    let rows = match query.source.as_deref() {
        Some(source) => {
            store
                .get_histories_with_topic_by_batch_and_source(&batch_id, source)
                .await
        }
        None => store.get_histories_with_topic_by_batch(&batch_id).await,
    }
    .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(rows, req_id.0))
}

pub(super) async fn list_batch_topics(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(batch_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Topic>>>, ApiError> {
    let topics = state
        .store()
        .get_topics_by_batch(&batch_id)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(topics, req_id.0))
}
