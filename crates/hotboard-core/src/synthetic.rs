//! Placeholder rankings for platforms that have no crawler yet.
//!
//! Items keep a fixed shape (dense ranks, pool titles, a hot value with the
//! platform's unit, a templated URL) while titles and hot values vary per
//! call. Randomness is always supplied by the caller.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::TrendingItem;
use crate::platform::Platform;

/// Items generated per platform when the caller has no preference.
pub const DEFAULT_ITEM_COUNT: usize = 10;

struct Profile {
    titles: &'static [&'static str],
    /// Inclusive lower and exclusive upper bound, in units of 万.
    hot_range: (u32, u32),
    unit: &'static str,
    url: fn(usize) -> String,
}

static HUPU: Profile = Profile {
    titles: &[
        "詹姆斯三双率队险胜",
        "勇士能否重返季后赛",
        "库里三分球历史地位",
        "足球世界杯前瞻讨论",
        "国足备战亚洲杯",
        "CBA季后赛预测",
        "梅西最新动态",
        "NBA自由市场分析",
        "中超联赛热点话题",
        "F1赛车最新战报",
    ],
    hot_range: (100, 600),
    unit: "万热度",
    url: hupu_url,
};

static ZHIHU: Profile = Profile {
    titles: &[
        "如何评价最新的科技产品发布会",
        "职场新人如何快速成长",
        "程序员35岁危机真的存在吗",
        "ChatGPT对行业的影响分析",
        "买房还是租房的经济学思考",
        "一线城市工作生活平衡",
        "教育内卷的深层原因",
        "新能源车发展趋势",
        "AI绘画是否会取代画师",
        "现代婚姻制度的变化",
    ],
    hot_range: (100, 900),
    unit: "万热度",
    url: zhihu_url,
};

static DOUYIN: Profile = Profile {
    titles: &[
        "2025最火的舞蹈挑战",
        "美食探店新发现",
        "旅行vlog攻略",
        "搞笑段子合集",
        "萌宠日常",
        "健身打卡挑战",
        "音乐翻唱大赛",
        "穿搭分享",
        "科技产品评测",
        "生活小妙招",
    ],
    hot_range: (200, 1200),
    unit: "万播放",
    url: douyin_url,
};

static BILIBILI: Profile = Profile {
    titles: &[
        "年度最佳游戏盘点",
        "动漫新番追番指南",
        "科技数码开箱",
        "美食制作教程",
        "知识科普视频",
        "音乐现场演出",
        "生活vlog日常",
        "电影影评解说",
        "手工DIY教程",
        "汽车测评",
    ],
    hot_range: (50, 350),
    unit: "万播放",
    url: bilibili_url,
};

fn hupu_url(position: usize) -> String {
    format!("https://bbs.hupu.com/topic/{}", position + 100_000)
}

fn zhihu_url(position: usize) -> String {
    format!("https://www.zhihu.com/question/{}", position + 10_000_000)
}

fn douyin_url(position: usize) -> String {
    format!("https://www.douyin.com/video/{}", 7_000_000_000_u64 + position as u64)
}

fn bilibili_url(position: usize) -> String {
    format!("https://www.bilibili.com/video/BV1{position}Xxx")
}

fn profile(platform: Platform) -> Option<&'static Profile> {
    match platform {
        Platform::Hupu => Some(&HUPU),
        Platform::Zhihu => Some(&ZHIHU),
        Platform::Douyin => Some(&DOUYIN),
        Platform::Bilibili => Some(&BILIBILI),
        Platform::Weibo => None,
    }
}

/// Whether [`generate`] can produce items for `platform`.
#[must_use]
pub fn supports(platform: Platform) -> bool {
    profile(platform).is_some()
}

/// Generates up to `count` placeholder items for `platform`.
///
/// Titles are a random permutation of the platform's pool, so at most
/// pool-size items come back and none repeat. Platforms without a pool yield
/// an empty list.
pub fn generate<R: Rng>(platform: Platform, count: usize, rng: &mut R) -> Vec<TrendingItem> {
    let Some(profile) = profile(platform) else {
        return Vec::new();
    };

    let mut titles = profile.titles.to_vec();
    titles.shuffle(rng);

    let (low, high) = profile.hot_range;
    (1_i32..)
        .zip(titles.into_iter().take(count).enumerate())
        .map(|(rank, (position, title))| TrendingItem {
            rank,
            title: title.to_owned(),
            hot_score: format!("{}{}", rng.random_range(low..high), profile.unit),
            url: (profile.url)(position),
        })
        .collect()
}

/// Generates `count` items for every platform that has a pool, in board
/// order.
pub fn generate_all<R: Rng>(count: usize, rng: &mut R) -> Vec<(Platform, Vec<TrendingItem>)> {
    Platform::ALL
        .into_iter()
        .filter(|platform| supports(*platform))
        .map(|platform| (platform, generate(platform, count, rng)))
        .collect()
}
