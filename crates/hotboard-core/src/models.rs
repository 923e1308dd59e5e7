//! Application-level records. Field names serialize as `camelCase`; the
//! storage layer converts raw `snake_case` rows into these through
//! [`crate::case`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::platform::{Platform, PlatformConfig};

/// Identity of one trending subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: i64,
    pub source: String,
    pub unique_key: String,
    pub title: String,
    pub url: String,
    pub first_seen_at: Option<DateTime<Utc>>,
}

/// Fields accepted when inserting a topic. `first_seen_at` falls back to the
/// storage default when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTopic {
    pub source: String,
    pub unique_key: String,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_seen_at: Option<DateTime<Utc>>,
}

/// Partial topic update. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_seen_at: Option<DateTime<Utc>>,
}

impl TopicPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &TopicPatch::default()
    }
}

/// One completed crawl cycle and its generated summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub batch_id: String,
    pub ai_title: String,
    pub ai_content: String,
    pub created_at: DateTime<Utc>,
}

/// A history row joined with its topic's identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryWithTopic {
    pub id: i64,
    pub topic_id: Option<i64>,
    pub hot_score: f64,
    pub hot_value_display: Option<String>,
    /// `None` means the topic was captured but not ranked.
    pub rank: Option<i32>,
    pub captured_at: Option<DateTime<Utc>>,
    pub batch_id: String,
    pub metrics: Option<Value>,
    pub topic_title: String,
    pub topic_source: String,
    pub topic_url: String,
}

/// One row of a platform column on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingItem {
    pub rank: i32,
    pub title: String,
    pub hot_score: String,
    pub url: String,
}

/// A full platform column: key, display metadata and ranked items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformTrending {
    pub platform: Platform,
    pub config: PlatformConfig,
    pub items: Vec<TrendingItem>,
}

impl PlatformTrending {
    /// Wraps `items` with the platform's display metadata, ordering them by
    /// ascending rank.
    #[must_use]
    pub fn new(platform: Platform, mut items: Vec<TrendingItem>) -> Self {
        items.sort_by_key(|item| item.rank);
        Self {
            platform,
            config: platform.config(),
            items,
        }
    }
}
