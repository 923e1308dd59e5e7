use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use hotboard_core::{NewTopic, Topic, TopicPatch, TopicStore};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_store_error, normalize_limit, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct TopicsQuery {
    pub source: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct LatestQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ByKeyQuery {
    pub source: String,
    pub key: String,
}

#[derive(Debug, Serialize)]
pub(super) struct DeletedData {
    deleted: bool,
}

pub(super) async fn list_topics(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<TopicsQuery>,
) -> Result<Json<ApiResponse<Vec<Topic>>>, ApiError> {
    let store = state.store();
    let topics = match query.source.as_deref() {
        Some(source) => store.find_by_source(source).await,
        None => store.find_all().await,
    }
    .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(topics, req_id.0))
}

pub(super) async fn list_latest_topics(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<LatestQuery>,
) -> Result<Json<ApiResponse<Vec<Topic>>>, ApiError> {
    let topics = state
        .store()
        .get_latest(normalize_limit(query.limit))
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(topics, req_id.0))
}

pub(super) async fn get_topic(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Topic>>, ApiError> {
    let topic = state
        .store()
        .find_by_id(id)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?
        .ok_or_else(|| topic_not_found(&req_id, id))?;

    Ok(ApiResponse::new(topic, req_id.0))
}

pub(super) async fn get_topic_by_key(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ByKeyQuery>,
) -> Result<Json<ApiResponse<Topic>>, ApiError> {
    let topic = state
        .store()
        .find_by_unique_key(&query.source, &query.key)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("no topic '{}' from {}", query.key, query.source),
            )
        })?;

    Ok(ApiResponse::new(topic, req_id.0))
}

pub(super) async fn create_topic(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<NewTopic>,
) -> Result<(StatusCode, Json<ApiResponse<Topic>>), ApiError> {
    let blank = [
        ("source", &body.source),
        ("uniqueKey", &body.unique_key),
        ("title", &body.title),
    ]
    .into_iter()
    .find(|(_, value)| value.trim().is_empty());
    if let Some((field, _)) = blank {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            format!("{field} must not be blank"),
        ));
    }

    let topic = state
        .store()
        .create(&body)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    Ok((StatusCode::CREATED, ApiResponse::new(topic, req_id.0)))
}

pub(super) async fn update_topic(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
    Json(patch): Json<TopicPatch>,
) -> Result<Json<ApiResponse<Topic>>, ApiError> {
    let topic = state
        .store()
        .update(id, &patch)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?
        .ok_or_else(|| topic_not_found(&req_id, id))?;

    Ok(ApiResponse::new(topic, req_id.0))
}

pub(super) async fn delete_topic(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<DeletedData>>, ApiError> {
    let deleted = state
        .store()
        .delete(id)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(DeletedData { deleted }, req_id.0))
}

fn topic_not_found(req_id: &RequestId, id: i64) -> ApiError {
    ApiError::new(req_id.0.clone(), "not_found", format!("topic {id} not found"))
}
