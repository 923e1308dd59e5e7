mod batches;
mod ranking;
mod topics;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use hotboard_core::{RankingOptions, RankingService, StoreError, DEFAULT_LATEST_LIMIT};
use hotboard_db::{Database, PgStore};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

const MAX_LIMIT: i64 = 200;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub ranking: Arc<RankingService<PgStore>>,
}

impl AppState {
    #[must_use]
    pub fn new(db: Database, options: RankingOptions) -> Self {
        let ranking = RankingService::new(db.store(), options);
        Self {
            db,
            ranking: Arc::new(ranking),
        }
    }

    pub(super) fn store(&self) -> &PgStore {
        self.ranking.store()
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

#[derive(Debug, Serialize)]
struct VersionData {
    version: String,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, request_id: String) -> Json<Self> {
        Json(Self {
            data,
            meta: ResponseMeta::new(request_id),
        })
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn normalize_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LATEST_LIMIT).clamp(1, MAX_LIMIT)
}

pub(super) fn map_store_error(request_id: String, error: &StoreError) -> ApiError {
    match error {
        StoreError::NotFound => ApiError::new(request_id, "not_found", "record not found"),
        StoreError::Conflict(detail) => {
            tracing::debug!(detail = %detail, "write conflict");
            ApiError::new(
                request_id,
                "conflict",
                "a topic with this source and unique key already exists",
            )
        }
        StoreError::Unavailable(_) | StoreError::Decode { .. } => {
            tracing::error!(error = %error, "storage query failed");
            ApiError::new(request_id, "internal_error", "database query failed")
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/db/version", get(db_version))
        .route("/api/ranking/all", get(ranking::all_platforms))
        .route("/api/ranking/{platform}", get(ranking::one_platform))
        .route("/api/batches/latest", get(batches::latest_batch))
        .route(
            "/api/batches/{batch_id}/histories",
            get(batches::list_batch_histories),
        )
        .route("/api/batches/{batch_id}/topics", get(batches::list_batch_topics))
        .route(
            "/api/topics",
            get(topics::list_topics).post(topics::create_topic),
        )
        .route("/api/topics/latest", get(topics::list_latest_topics))
        .route("/api/topics/by-key", get(topics::get_topic_by_key))
        .route(
            "/api/topics/{id}",
            get(topics::get_topic)
                .patch(topics::update_topic)
                .delete(topics::delete_topic),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match state.db.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

async fn db_version(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<VersionData>>, ApiError> {
    let version = state.db.server_version().await.map_err(|e| {
        tracing::error!(error = %e, "version query failed");
        ApiError::new(req_id.0.clone(), "internal_error", "database query failed")
    })?;

    Ok(ApiResponse::new(VersionData { version }, req_id.0))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use hotboard_core::RankingOptions;
    use hotboard_db::Database;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::{build_app, AppState};

    pub(crate) fn seeded_options() -> RankingOptions {
        RankingOptions {
            rng_seed: Some(5),
            ..RankingOptions::default()
        }
    }

    pub(crate) fn app_for(pool: sqlx::PgPool) -> Router {
        build_app(AppState::new(Database::from_pool(pool), seeded_options()))
    }

    /// An app whose database never answers.
    pub(crate) fn offline_app() -> Router {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(500))
            .connect_lazy("postgres://hotboard@127.0.0.1:1/hotboard")
            .expect("lazy pool from a well-formed url");
        app_for(pool)
    }

    pub(crate) async fn send(
        app: Router,
        request: Request<Body>,
    ) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body).expect("json parse")
        };
        (status, json)
    }

    pub(crate) fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    pub(crate) fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{get, offline_app, send};
    use super::*;

    #[test]
    fn normalize_limit_applies_defaults_and_bounds() {
        assert_eq!(normalize_limit(None), 50);
        assert_eq!(normalize_limit(Some(0)), 1);
        assert_eq!(normalize_limit(Some(1_000)), 200);
        assert_eq!(normalize_limit(Some(25)), 25);
    }

    #[test]
    fn api_error_codes_map_to_statuses() {
        let cases = [
            ("not_found", StatusCode::NOT_FOUND),
            ("validation_error", StatusCode::BAD_REQUEST),
            ("conflict", StatusCode::CONFLICT),
            ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (code, status) in cases {
            let response = ApiError::new("req-1", code, "message").into_response();
            assert_eq!(response.status(), status, "code {code}");
        }
    }

    #[test]
    fn store_errors_map_to_api_codes() {
        let not_found = map_store_error("r".to_string(), &StoreError::NotFound);
        assert_eq!(not_found.error.code, "not_found");

        let conflict = map_store_error("r".to_string(), &StoreError::Conflict("dup".to_string()));
        assert_eq!(conflict.error.code, "conflict");

        let down = map_store_error(
            "r".to_string(),
            &StoreError::Unavailable("connection refused".into()),
        );
        assert_eq!(down.error.code, "internal_error");
        assert_eq!(down.error.message, "database query failed");
    }

    #[test]
    fn response_meta_serializes_camel_case() {
        let json = serde_json::to_value(ResponseMeta::new("req-9".to_string())).expect("serialize");
        assert_eq!(json["requestId"], "req-9");
        assert!(json.get("timestamp").is_some());
    }

    #[tokio::test]
    async fn health_reports_degraded_without_database() {
        let (status, json) = send(offline_app(), get("/api/health")).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["data"]["status"], "degraded");
        assert_eq!(json["data"]["database"], "unavailable");
    }

    #[tokio::test]
    async fn storage_failure_is_an_internal_error() {
        let (status, json) = send(offline_app(), get("/api/ranking/all")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"]["code"], "internal_error");
        assert!(json["meta"]["requestId"].is_string());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn health_reports_ok_with_database(pool: sqlx::PgPool) {
        let (status, json) = send(super::test_support::app_for(pool), get("/api/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "ok");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn db_version_reports_postgres(pool: sqlx::PgPool) {
        let (status, json) =
            send(super::test_support::app_for(pool), get("/api/db/version")).await;

        assert_eq!(status, StatusCode::OK);
        let version = json["data"]["version"].as_str().expect("version string");
        assert!(version.starts_with("PostgreSQL"), "got {version}");
    }
}
