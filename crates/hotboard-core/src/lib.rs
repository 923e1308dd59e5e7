pub mod app_config;
pub mod case;
pub mod config;
pub mod models;
pub mod platform;
pub mod ranking;
pub mod store;
pub mod synthetic;
pub mod time;

pub use app_config::{AppConfig, Environment};
pub use case::{to_camel, to_snake};
pub use config::{load_app_config, load_app_config_from_env};
pub use models::{
    Batch, HistoryWithTopic, NewTopic, PlatformTrending, Topic, TopicPatch, TrendingItem,
};
pub use platform::{Platform, PlatformConfig, UnknownPlatform};
pub use ranking::{RankingOptions, RankingService};
pub use store::{BatchStore, HistoryStore, StoreError, TopicStore, DEFAULT_LATEST_LIMIT};
pub use time::{format_time, TimeStyle};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
