use crate::error::ConfigError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Community sites with a listing adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteKind {
    Clien,
    DcInside,
    Instiz,
    Ppomppu,
}

impl SiteKind {
    pub const ALL: [SiteKind; 4] = [
        SiteKind::Clien,
        SiteKind::DcInside,
        SiteKind::Instiz,
        SiteKind::Ppomppu,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            SiteKind::Clien => "clien",
            SiteKind::DcInside => "dcinside",
            SiteKind::Instiz => "instiz",
            SiteKind::Ppomppu => "ppomppu",
        }
    }

    /// Name shown to readers of the reports.
    pub fn label(&self) -> &'static str {
        match self {
            SiteKind::Clien => "클리앙",
            SiteKind::DcInside => "디시인사이드",
            SiteKind::Instiz => "인스티즈",
            SiteKind::Ppomppu => "뽐뿌",
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            SiteKind::Clien => "https://www.clien.net",
            SiteKind::DcInside => "https://gall.dcinside.com",
            SiteKind::Instiz => "https://www.instiz.net",
            SiteKind::Ppomppu => "https://www.ppomppu.co.kr",
        }
    }
}

impl fmt::Display for SiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SiteKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        SiteKind::ALL
            .into_iter()
            .find(|site| site.id() == wanted)
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "site".to_string(),
                value: s.to_string(),
            })
    }
}

/// Which listing of a site a board entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    /// Regular paginated board or gallery.
    #[default]
    Board,
    /// Ppomppu hot deal table.
    HotDeal,
    /// Instiz realtime chart (single page).
    Chart,
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ListingKind::Board => "board",
            ListingKind::HotDeal => "hotdeal",
            ListingKind::Chart => "chart",
        };
        f.write_str(name)
    }
}

/// Raw signals as displayed on a listing row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCounters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommends: Option<u64>,
}

/// Linear combination turning raw counters into one popularity score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngagementWeights {
    pub comments: f64,
    pub views: f64,
    pub recommends: f64,
    pub base: f64,
}

impl EngagementWeights {
    pub const fn new(comments: f64, views: f64, recommends: f64, base: f64) -> Self {
        Self {
            comments,
            views,
            recommends,
            base,
        }
    }

    /// Absent counters contribute nothing.
    pub fn score(&self, counters: &RawCounters) -> f64 {
        let weigh = |weight: f64, value: Option<u64>| weight * value.unwrap_or(0) as f64;

        self.base
            + weigh(self.comments, counters.comments)
            + weigh(self.views, counters.views)
            + weigh(self.recommends, counters.recommends)
    }
}

/// One observed listing item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    pub title: String,
    #[serde(
        default,
        deserialize_with = "lenient_engagement",
        skip_serializing_if = "Option::is_none"
    )]
    pub engagement: Option<f64>,
    #[serde(flatten)]
    pub counters: RawCounters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_at: Option<String>,
}

impl PostRecord {
    pub const DEFAULT_ENGAGEMENT: f64 = 1.0;

    pub fn new(title: impl Into<String>, engagement: f64) -> Self {
        Self {
            title: title.into(),
            engagement: Some(engagement),
            counters: RawCounters::default(),
            posted_at: None,
        }
    }

    /// Builds a record whose engagement is scored from its counters.
    pub fn scored(
        title: impl Into<String>,
        counters: RawCounters,
        weights: &EngagementWeights,
    ) -> Self {
        Self {
            title: title.into(),
            engagement: Some(weights.score(&counters)),
            counters,
            posted_at: None,
        }
    }

    pub fn with_posted_at(mut self, posted_at: impl Into<String>) -> Self {
        self.posted_at = Some(posted_at.into());
        self
    }

    pub fn engagement(&self) -> f64 {
        self.engagement.unwrap_or(Self::DEFAULT_ENGAGEMENT)
    }
}

fn lenient_engagement<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;

    Ok(value
        .and_then(|value| match value {
            serde_json::Value::Number(number) => number.as_f64(),
            serde_json::Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        })
        .filter(|engagement| engagement.is_finite() && *engagement >= 0.0))
}

/// Aggregated statistic for one keyword across a batch of posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordStat {
    pub keyword: String,
    pub count: u64,
    pub total_engagement: f64,
    pub avg_engagement: f64,
}

impl KeywordStat {
    pub fn new(keyword: impl Into<String>, count: u64, total_engagement: f64) -> Self {
        let avg_engagement = if count > 0 {
            total_engagement / count as f64
        } else {
            0.0
        };

        Self {
            keyword: keyword.into(),
            count,
            total_engagement,
            avg_engagement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engagement_weights_score() {
        let clien = EngagementWeights::new(5.0, 0.0, 10.0, 0.0);
        let counters = RawCounters {
            views: Some(300),
            comments: Some(4),
            recommends: Some(2),
        };
        assert_eq!(clien.score(&counters), 40.0);

        let chart = EngagementWeights::new(1.0, 0.0, 0.0, 1.0);
        assert_eq!(chart.score(&RawCounters::default()), 1.0);
    }

    #[test]
    fn test_missing_engagement_defaults_to_one() {
        let post: PostRecord = serde_json::from_str(r#"{"title": "아이폰 리뷰"}"#).unwrap();
        assert_eq!(post.engagement, None);
        assert_eq!(post.engagement(), 1.0);
    }

    #[test]
    fn test_non_numeric_engagement_defaults_to_one() {
        let post: PostRecord =
            serde_json::from_str(r#"{"title": "아이폰 리뷰", "engagement": "many"}"#).unwrap();
        assert_eq!(post.engagement(), 1.0);

        let post: PostRecord =
            serde_json::from_str(r#"{"title": "아이폰 리뷰", "engagement": null}"#).unwrap();
        assert_eq!(post.engagement(), 1.0);

        let post: PostRecord =
            serde_json::from_str(r#"{"title": "아이폰 리뷰", "engagement": -4}"#).unwrap();
        assert_eq!(post.engagement(), 1.0);
    }

    #[test]
    fn test_numeric_engagement_is_kept() {
        let post: PostRecord = serde_json::from_str(
            r#"{"title": "맛집 추천", "engagement": "12", "comments": 3, "views": 40}"#,
        )
        .unwrap();
        assert_eq!(post.engagement(), 12.0);
        assert_eq!(post.counters.comments, Some(3));
        assert_eq!(post.counters.views, Some(40));
        assert_eq!(post.counters.recommends, None);
    }

    #[test]
    fn test_keyword_stat_average() {
        let stat = KeywordStat::new("아이폰", 2, 15.0);
        assert_eq!(stat.avg_engagement, 7.5);

        let empty = KeywordStat::new("없음", 0, 0.0);
        assert_eq!(empty.avg_engagement, 0.0);
    }

    #[test]
    fn test_site_kind_parsing() {
        assert_eq!("dcinside".parse::<SiteKind>().unwrap(), SiteKind::DcInside);
        assert_eq!(" Clien ".parse::<SiteKind>().unwrap(), SiteKind::Clien);
        assert!("naver".parse::<SiteKind>().is_err());
        assert_eq!(SiteKind::Ppomppu.to_string(), "ppomppu");
    }
}
