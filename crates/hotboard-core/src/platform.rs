//! The closed set of platforms shown on the board, with their static display
//! metadata.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Weibo,
    Hupu,
    Zhihu,
    Douyin,
    Bilibili,
}

/// Display metadata for one platform column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlatformConfig {
    pub name: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown platform: {0}")]
pub struct UnknownPlatform(pub String);

impl Platform {
    /// Every platform, in board order.
    pub const ALL: [Platform; 5] = [
        Platform::Weibo,
        Platform::Hupu,
        Platform::Zhihu,
        Platform::Douyin,
        Platform::Bilibili,
    ];

    /// The key stored in `trending_topics.source` and used in URLs.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Platform::Weibo => "weibo",
            Platform::Hupu => "hupu",
            Platform::Zhihu => "zhihu",
            Platform::Douyin => "douyin",
            Platform::Bilibili => "bilibili",
        }
    }

    #[must_use]
    pub fn config(self) -> PlatformConfig {
        match self {
            Platform::Weibo => PlatformConfig {
                name: "微博",
                color: "#fa7d3c",
                icon: "📱",
            },
            Platform::Hupu => PlatformConfig {
                name: "虎扑",
                color: "#d32f2f",
                icon: "🏀",
            },
            Platform::Zhihu => PlatformConfig {
                name: "知乎",
                color: "#0084ff",
                icon: "💡",
            },
            Platform::Douyin => PlatformConfig {
                name: "抖音",
                color: "#fe2c55",
                icon: "🎵",
            },
            Platform::Bilibili => PlatformConfig {
                name: "B站",
                color: "#fb7299",
                icon: "📺",
            },
        }
    }

    /// Base URL prepended to crawled topic links. Crawlers for these
    /// platforms store site-relative paths.
    #[must_use]
    pub fn link_base(self) -> Option<&'static str> {
        match self {
            Platform::Weibo => Some("https://s.weibo.com"),
            _ => None,
        }
    }

    /// Turns a stored topic URL into the link shown to readers.
    #[must_use]
    pub fn topic_link(self, stored_url: &str) -> String {
        match self.link_base() {
            Some(base) => format!("{base}{stored_url}"),
            None => stored_url.to_owned(),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.key() == s)
            .ok_or_else(|| UnknownPlatform(s.to_owned()))
    }
}
