//! Aggregation engine tests against an in-memory store. No database required.

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use hotboard_core::{
    Batch, BatchStore, HistoryStore, HistoryWithTopic, Platform, PlatformTrending,
    RankingOptions, RankingService, StoreError,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MemoryStore {
    batch: Option<Batch>,
    histories: Vec<HistoryWithTopic>,
    fail_history: bool,
    history_calls: AtomicUsize,
}

impl BatchStore for MemoryStore {
    async fn get_latest_batch(&self) -> Result<Batch, StoreError> {
        self.batch.clone().ok_or(StoreError::NotFound)
    }
}

impl HistoryStore for MemoryStore {
    async fn get_histories_with_topic_by_batch(
        &self,
        batch_id: &str,
    ) -> Result<Vec<HistoryWithTopic>, StoreError> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_history {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        let mut rows: Vec<HistoryWithTopic> = self
            .histories
            .iter()
            .filter(|h| h.batch_id == batch_id)
            .cloned()
            .collect();
        rows.sort_by_key(|h| h.rank);
        Ok(rows)
    }

    async fn get_histories_with_topic_by_batch_and_source(
        &self,
        batch_id: &str,
        source: &str,
    ) -> Result<Vec<HistoryWithTopic>, StoreError> {
        let rows = self.get_histories_with_topic_by_batch(batch_id).await?;
        Ok(rows
            .into_iter()
            .filter(|h| h.topic_source == source)
            .collect())
    }
}

fn batch(batch_id: &str) -> Batch {
    Batch {
        batch_id: batch_id.to_string(),
        ai_title: "今日热点".to_string(),
        ai_content: "## summary".to_string(),
        created_at: Utc::now(),
    }
}

fn history(batch_id: &str, source: &str, rank: Option<i32>, title: &str) -> HistoryWithTopic {
    HistoryWithTopic {
        id: 1,
        topic_id: Some(1),
        hot_score: 100_000.0,
        hot_value_display: Some("10万".to_string()),
        rank,
        captured_at: Some(Utc::now()),
        batch_id: batch_id.to_string(),
        metrics: None,
        topic_title: title.to_string(),
        topic_source: source.to_string(),
        topic_url: "/x".to_string(),
    }
}

fn seeded() -> RankingOptions {
    RankingOptions {
        rng_seed: Some(11),
        ..RankingOptions::default()
    }
}

fn platforms(board: &[PlatformTrending]) -> Vec<Platform> {
    board.iter().map(|column| column.platform).collect()
}

// ---------------------------------------------------------------------------
// Full board
// ---------------------------------------------------------------------------

#[tokio::test]
async fn live_platform_uses_batch_history() {
    let store = MemoryStore {
        batch: Some(batch("batch-123")),
        histories: vec![history("batch-123", "weibo", Some(1), "T")],
        ..MemoryStore::default()
    };
    let service = RankingService::new(store, seeded());

    let board = service.get_all_platform_trending().await.expect("board");

    let weibo = &board[0];
    assert_eq!(weibo.platform, Platform::Weibo);
    assert_eq!(weibo.config, Platform::Weibo.config());
    assert_eq!(weibo.items.len(), 1);
    assert_eq!(weibo.items[0].rank, 1);
    assert_eq!(weibo.items[0].title, "T");
    assert_eq!(weibo.items[0].hot_score, "100000");
    assert_eq!(weibo.items[0].url, "https://s.weibo.com/x");
}

#[tokio::test]
async fn board_lists_every_platform_live_first() {
    let store = MemoryStore {
        batch: Some(batch("b1")),
        ..MemoryStore::default()
    };
    let options = RankingOptions {
        live_platforms: vec![Platform::Douyin],
        ..seeded()
    };
    let service = RankingService::new(store, options);

    let board = service.get_all_platform_trending().await.expect("board");

    assert_eq!(
        platforms(&board),
        vec![
            Platform::Douyin,
            Platform::Weibo,
            Platform::Hupu,
            Platform::Zhihu,
            Platform::Bilibili
        ]
    );
    assert!(board[0].items.is_empty(), "live douyin has no history");
    // Weibo has no phrase pool, so as a synthetic column it stays empty.
    assert!(board[1].items.is_empty());
    assert!(board[2..].iter().all(|column| column.items.len() == 10));
}

#[tokio::test]
async fn missing_batch_leaves_live_column_empty() {
    let service = RankingService::new(MemoryStore::default(), seeded());

    let board = service.get_all_platform_trending().await.expect("board");

    assert_eq!(board.len(), Platform::ALL.len());
    assert_eq!(board[0].platform, Platform::Weibo);
    assert!(board[0].items.is_empty());
    for column in &board[1..] {
        assert_eq!(column.items.len(), 10, "{} column", column.platform);
    }
    assert_eq!(
        service.store().history_calls.load(Ordering::SeqCst),
        0,
        "history must not be queried without a batch"
    );
}

#[tokio::test]
async fn unranked_history_is_excluded() {
    let store = MemoryStore {
        batch: Some(batch("b1")),
        histories: vec![
            history("b1", "weibo", Some(2), "second"),
            history("b1", "weibo", None, "unranked"),
            history("b1", "weibo", Some(1), "first"),
        ],
        ..MemoryStore::default()
    };
    let service = RankingService::new(store, seeded());

    let board = service.get_all_platform_trending().await.expect("board");

    let titles: Vec<&str> = board[0].items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["first", "second"]);
}

#[tokio::test]
async fn other_sources_and_batches_are_ignored() {
    let store = MemoryStore {
        batch: Some(batch("b2")),
        histories: vec![
            history("b1", "weibo", Some(1), "stale"),
            history("b2", "hupu", Some(1), "wrong source"),
            history("b2", "weibo", Some(1), "current"),
        ],
        ..MemoryStore::default()
    };
    let service = RankingService::new(store, seeded());

    let board = service.get_all_platform_trending().await.expect("board");

    assert_eq!(board[0].items.len(), 1);
    assert_eq!(board[0].items[0].title, "current");
}

#[tokio::test]
async fn multiple_live_platforms_keep_their_own_links() {
    let mut hupu = history("b1", "hupu", Some(1), "hupu topic");
    hupu.topic_url = "https://bbs.hupu.com/1.html".to_string();
    let store = MemoryStore {
        batch: Some(batch("b1")),
        histories: vec![history("b1", "weibo", Some(1), "weibo topic"), hupu],
        ..MemoryStore::default()
    };
    let options = RankingOptions {
        live_platforms: vec![Platform::Hupu, Platform::Weibo],
        ..seeded()
    };
    let service = RankingService::new(store, options);

    let board = service.get_all_platform_trending().await.expect("board");

    assert_eq!(&platforms(&board)[..2], &[Platform::Weibo, Platform::Hupu]);
    assert_eq!(board[0].items[0].url, "https://s.weibo.com/x");
    assert_eq!(board[1].items[0].url, "https://bbs.hupu.com/1.html");
    assert_eq!(service.store().history_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn storage_failure_propagates() {
    let store = MemoryStore {
        batch: Some(batch("b1")),
        fail_history: true,
        ..MemoryStore::default()
    };
    let service = RankingService::new(store, seeded());

    let err = service
        .get_all_platform_trending()
        .await
        .expect_err("history failure must surface");
    assert!(matches!(err, StoreError::Unavailable(_)), "got {err:?}");
}

#[tokio::test]
async fn synthetic_item_count_is_configurable() {
    let options = RankingOptions {
        synthetic_items: 3,
        ..seeded()
    };
    let service = RankingService::new(MemoryStore::default(), options);

    let board = service.get_all_platform_trending().await.expect("board");

    assert!(board[1..].iter().all(|column| column.items.len() == 3));
}

// ---------------------------------------------------------------------------
// Single platform
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_platform_is_none() {
    let service = RankingService::new(MemoryStore::default(), seeded());

    let column = service
        .get_platform_trending("unknown")
        .await
        .expect("lookup");
    assert!(column.is_none());
}

#[tokio::test]
async fn single_platform_matches_full_board() {
    let store = MemoryStore {
        batch: Some(batch("b1")),
        histories: vec![history("b1", "weibo", Some(1), "T")],
        ..MemoryStore::default()
    };
    let service = RankingService::new(store, seeded());

    let board = service.get_all_platform_trending().await.expect("board");
    let hupu = service
        .get_platform_trending("hupu")
        .await
        .expect("lookup")
        .expect("hupu column");

    let expected = board
        .into_iter()
        .find(|column| column.platform == Platform::Hupu)
        .expect("hupu in board");
    assert_eq!(hupu, expected);
}
