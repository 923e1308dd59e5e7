use axum::{
    extract::{Path, State},
    Extension, Json,
};
use hotboard_core::PlatformTrending;

use crate::middleware::RequestId;

use super::{map_store_error, ApiError, ApiResponse, AppState};

pub(super) async fn all_platforms(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<PlatformTrending>>>, ApiError> {
    let board = state
        .ranking
        .get_all_platform_trending()
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(board, req_id.0))
}

pub(super) async fn one_platform(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(platform): Path<String>,
) -> Result<Json<ApiResponse<PlatformTrending>>, ApiError> {
    let column = state
        .ranking
        .get_platform_trending(&platform)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("unknown platform '{platform}'"),
            )
        })?;

    Ok(ApiResponse::new(column, req_id.0))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::super::test_support::{app_for, get, offline_app, send};

    async fn seed_weibo_batch(pool: &sqlx::PgPool) {
        let topic_id: i64 = sqlx::query_scalar(
            "INSERT INTO trending_topics (source, unique_key, title, url) \
             VALUES ('weibo', 'weibo:x', 'T', '/x') RETURNING id",
        )
        .fetch_one(pool)
        .await
        .expect("insert topic");

        sqlx::query("INSERT INTO crawl_batches (batch_id) VALUES ('batch-123')")
            .execute(pool)
            .await
            .expect("insert batch");

        sqlx::query(
            "INSERT INTO trending_history (topic_id, hot_score, rank, batch_id) \
             VALUES ($1, 100000, 1, 'batch-123')",
        )
        .bind(topic_id)
        .execute(pool)
        .await
        .expect("insert history");
    }

    #[tokio::test]
    async fn unknown_platform_is_not_found_without_touching_storage() {
        let (status, json) = send(offline_app(), get("/api/ranking/unknown")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "not_found");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn board_serves_every_platform(pool: sqlx::PgPool) {
        seed_weibo_batch(&pool).await;

        let (status, json) = send(app_for(pool), get("/api/ranking/all")).await;

        assert_eq!(status, StatusCode::OK);
        let board = json["data"].as_array().expect("data array");
        let keys: Vec<&str> = board
            .iter()
            .filter_map(|column| column["platform"].as_str())
            .collect();
        assert_eq!(keys, vec!["weibo", "hupu", "zhihu", "douyin", "bilibili"]);

        let item = &board[0]["items"][0];
        assert_eq!(item["rank"], 1);
        assert_eq!(item["title"], "T");
        assert_eq!(item["hotScore"], "100000");
        assert_eq!(item["url"], "https://s.weibo.com/x");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn live_platform_is_empty_without_batches(pool: sqlx::PgPool) {
        let (status, json) = send(app_for(pool), get("/api/ranking/weibo")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["platform"], "weibo");
        assert_eq!(json["data"]["items"].as_array().map(Vec::len), Some(0));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn synthetic_platform_has_ranked_items(pool: sqlx::PgPool) {
        let (status, json) = send(app_for(pool), get("/api/ranking/zhihu")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["platform"], "zhihu");
        assert_eq!(json["data"]["config"]["name"], "知乎");
        assert_eq!(json["data"]["items"].as_array().map(Vec::len), Some(10));
        assert_eq!(json["data"]["items"][0]["rank"], 1);
    }
}
