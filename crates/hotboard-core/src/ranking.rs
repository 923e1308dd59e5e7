//! The aggregation engine: one board made of live crawl results and
//! synthetic placeholder columns.

use futures::future::try_join_all;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::app_config::AppConfig;
use crate::models::{HistoryWithTopic, PlatformTrending, TrendingItem};
use crate::platform::Platform;
use crate::store::{BatchStore, HistoryStore, StoreError};
use crate::synthetic;

/// Which platforms read from storage and how synthetic columns are built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingOptions {
    pub live_platforms: Vec<Platform>,
    pub synthetic_items: usize,
    /// Fixed seed for synthetic columns. `None` draws from the OS.
    pub rng_seed: Option<u64>,
}

impl Default for RankingOptions {
    fn default() -> Self {
        Self {
            live_platforms: vec![Platform::Weibo],
            synthetic_items: synthetic::DEFAULT_ITEM_COUNT,
            rng_seed: None,
        }
    }
}

impl RankingOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            live_platforms: config.live_platforms.clone(),
            synthetic_items: config.synthetic_items,
            rng_seed: config.rng_seed,
        }
    }

    fn is_live(&self, platform: Platform) -> bool {
        self.live_platforms.contains(&platform)
    }
}

/// Builds the multi-platform board on top of a store.
#[derive(Debug, Clone)]
pub struct RankingService<S> {
    store: S,
    options: RankingOptions,
}

impl<S> RankingService<S>
where
    S: BatchStore + HistoryStore + Sync,
{
    pub fn new(store: S, options: RankingOptions) -> Self {
        Self { store, options }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Every platform column: live platforms first, then synthetic ones,
    /// each group in board order.
    ///
    /// A missing batch is not an error; live columns are simply empty.
    ///
    /// # Errors
    ///
    /// Propagates any [`StoreError`] other than [`StoreError::NotFound`] on
    /// the latest-batch lookup, and every error from the history fetches.
    pub async fn get_all_platform_trending(&self) -> Result<Vec<PlatformTrending>, StoreError> {
        let (live, simulated): (Vec<Platform>, Vec<Platform>) = Platform::ALL
            .into_iter()
            .partition(|platform| self.options.is_live(*platform));

        let batch_id = match self.store.get_latest_batch().await {
            Ok(batch) => Some(batch.batch_id),
            Err(StoreError::NotFound) => {
                tracing::warn!("no crawl batch recorded; live platforms will be empty");
                None
            }
            Err(e) => return Err(e),
        };

        let mut board = match batch_id.as_deref() {
            Some(batch_id) => {
                try_join_all(
                    live.iter()
                        .map(|platform| self.live_platform_trending(batch_id, *platform)),
                )
                .await?
            }
            None => live
                .iter()
                .map(|platform| PlatformTrending::new(*platform, Vec::new()))
                .collect(),
        };

        let mut rng = self.rng();
        board.extend(simulated.iter().map(|platform| {
            PlatformTrending::new(
                *platform,
                synthetic::generate(*platform, self.options.synthetic_items, &mut rng),
            )
        }));

        tracing::info!(
            batch_id = batch_id.as_deref().unwrap_or("none"),
            live = live.len(),
            synthetic = simulated.len(),
            "assembled platform rankings"
        );
        Ok(board)
    }

    /// One platform column, or `None` when `key` names no known platform.
    ///
    /// # Errors
    ///
    /// Same as [`RankingService::get_all_platform_trending`].
    pub async fn get_platform_trending(
        &self,
        key: &str,
    ) -> Result<Option<PlatformTrending>, StoreError> {
        let Ok(platform) = key.parse::<Platform>() else {
            tracing::debug!(key, "unknown platform requested");
            return Ok(None);
        };

        // TODO: fetch only the requested column once per-platform traffic
        // justifies a dedicated path.
        let board = self.get_all_platform_trending().await?;
        Ok(board.into_iter().find(|column| column.platform == platform))
    }

    async fn live_platform_trending(
        &self,
        batch_id: &str,
        platform: Platform,
    ) -> Result<PlatformTrending, StoreError> {
        let histories = self
            .store
            .get_histories_with_topic_by_batch_and_source(batch_id, platform.key())
            .await?;

        let fetched = histories.len();
        let items: Vec<TrendingItem> = histories
            .into_iter()
            .filter_map(|history| ranked_item(platform, history))
            .collect();

        tracing::debug!(
            batch_id,
            platform = %platform,
            fetched,
            ranked = items.len(),
            "loaded live platform history"
        );
        Ok(PlatformTrending::new(platform, items))
    }

    fn rng(&self) -> StdRng {
        match self.options.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

/// Maps a ranked history row to a board item. Unranked rows yield `None`.
fn ranked_item(platform: Platform, history: HistoryWithTopic) -> Option<TrendingItem> {
    let rank = history.rank?;
    Some(TrendingItem {
        rank,
        title: history.topic_title,
        hot_score: history.hot_score.to_string(),
        url: platform.topic_link(&history.topic_url),
    })
}
