use crate::ranker::rank;
use crate::stopwords::{accept, StopwordSet};
use crate::table::KeywordTable;
use crate::tokenizer::{LatinTokenRule, Tokenizer};
use tracing::debug;
use trendscope_core::{
    BoardConfig, ConfigError, ExtractionConfig, KeywordStat, PostRecord, SiteKind,
};

pub const DEFAULT_MIN_LENGTH: usize = 2;

/// Everything that differs between sites in keyword extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractorConfig {
    pub stopwords: StopwordSet,
    pub min_length: usize,
    pub latin_rule: LatinTokenRule,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            stopwords: StopwordSet::default(),
            min_length: DEFAULT_MIN_LENGTH,
            latin_rule: LatinTokenRule::default(),
        }
    }
}

impl ExtractorConfig {
    pub fn for_site(site: SiteKind) -> Self {
        let latin_rule = match site {
            SiteKind::Clien | SiteKind::Ppomppu => LatinTokenRule::MinLength(2),
            SiteKind::DcInside => LatinTokenRule::MinLength(3),
            SiteKind::Instiz => LatinTokenRule::Capitalized,
        };

        Self {
            stopwords: StopwordSet::for_site(site),
            min_length: DEFAULT_MIN_LENGTH,
            latin_rule,
        }
    }

    /// Site preset with the global and per-board overrides applied.
    pub fn for_board(board: &BoardConfig, extraction: &ExtractionConfig) -> Self {
        let mut config = Self::for_site(board.site);
        if let Some(min_length) = extraction.min_length {
            config.min_length = min_length;
        }
        config.stopwords.extend(&extraction.extra_stopwords);
        config.stopwords.extend(&board.extra_stopwords);
        config
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    pub fn with_stopwords(mut self, stopwords: StopwordSet) -> Self {
        self.stopwords = stopwords;
        self
    }

    pub fn with_latin_rule(mut self, latin_rule: LatinTokenRule) -> Self {
        self.latin_rule = latin_rule;
        self
    }
}

/// Tokenizes, filters and folds post titles into keyword tables.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    tokenizer: Tokenizer,
    stopwords: StopwordSet,
    min_length: usize,
}

impl KeywordExtractor {
    pub fn new(config: ExtractorConfig) -> Result<Self, ConfigError> {
        if config.min_length == 0 {
            return Err(ConfigError::InvalidValue {
                field: "min_length".to_string(),
                value: "0".to_string(),
            });
        }

        Ok(Self {
            tokenizer: Tokenizer::new(config.latin_rule)?,
            stopwords: config.stopwords,
            min_length: config.min_length,
        })
    }

    pub fn for_site(site: SiteKind) -> Result<Self, ConfigError> {
        Self::new(ExtractorConfig::for_site(site))
    }

    /// Tokens of `title` that survive the stopword and length filter, repeats included.
    pub fn keywords_in<'a>(&'a self, title: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.tokenizer
            .tokenize(title)
            .filter(move |token| accept(token, &self.stopwords, self.min_length))
    }

    pub fn aggregate<'p, I>(&self, posts: I) -> KeywordTable
    where
        I: IntoIterator<Item = &'p PostRecord>,
    {
        let mut table = KeywordTable::new();
        let mut post_count = 0usize;

        for post in posts {
            post_count += 1;
            let engagement = post.engagement();
            for keyword in self.keywords_in(&post.title) {
                table.record(keyword, engagement);
            }
        }

        debug!(
            "Aggregated {} posts into {} distinct keywords",
            post_count,
            table.len()
        );
        table
    }

    pub fn extract<'p, I>(&self, posts: I, top_n: usize) -> Vec<KeywordStat>
    where
        I: IntoIterator<Item = &'p PostRecord>,
    {
        rank(&self.aggregate(posts), top_n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> KeywordExtractor {
        KeywordExtractor::new(ExtractorConfig::default()).unwrap()
    }

    #[test]
    fn test_engagement_weighted_counts() {
        let posts = vec![
            PostRecord::new("아이폰 16 리뷰", 10.0),
            PostRecord::new("아이폰 케이스 추천", 5.0),
        ];
        let table = plain().aggregate(&posts);

        let iphone = table.get("아이폰").unwrap();
        assert_eq!(iphone.count, 2);
        assert_eq!(iphone.total_engagement, 15.0);
        assert_eq!(iphone.avg_engagement, 7.5);
        for keyword in ["리뷰", "케이스", "추천"] {
            assert_eq!(table.get(keyword).unwrap().count, 1);
        }
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_repeated_token_counts_each_occurrence() {
        let posts = vec![PostRecord::new("서울 서울 맛집", 3.0)];
        let seoul = plain().aggregate(&posts).get("서울").unwrap();
        assert_eq!(seoul.count, 2);
        assert_eq!(seoul.total_engagement, 6.0);
    }

    #[test]
    fn test_stopwords_and_length_filter() {
        let config = ExtractorConfig::default().with_stopwords(StopwordSet::new(["이거", "진짜"]));
        let extractor = KeywordExtractor::new(config).unwrap();
        let keywords: Vec<&str> = extractor.keywords_in("이거 진짜 대박").collect();
        assert_eq!(keywords, vec!["대박"]);
    }

    #[test]
    fn test_missing_engagement_counts_as_one() {
        let post: PostRecord = serde_json::from_str(r#"{"title": "치킨 추천"}"#).unwrap();
        let table = plain().aggregate([&post]);
        assert_eq!(table.get("치킨").unwrap().total_engagement, 1.0);
    }

    #[test]
    fn test_empty_input_gives_empty_table() {
        let posts: Vec<PostRecord> = Vec::new();
        assert!(plain().aggregate(&posts).is_empty());
        assert!(plain().extract(&posts, 100).is_empty());
    }

    #[test]
    fn test_site_presets() {
        let dcinside = KeywordExtractor::for_site(SiteKind::DcInside).unwrap();
        let keywords: Vec<&str> = dcinside.keywords_in("PC RPG 디시 갤러리 추천").collect();
        assert_eq!(keywords, vec!["추천", "RPG"]);

        let instiz = KeywordExtractor::for_site(SiteKind::Instiz).unwrap();
        let keywords: Vec<&str> = instiz.keywords_in("인스티즈 BTS 컴백 netflix").collect();
        assert_eq!(keywords, vec!["컴백", "BTS"]);

        let ppomppu = KeywordExtractor::for_site(SiteKind::Ppomppu).unwrap();
        let keywords: Vec<&str> = ppomppu.keywords_in("[쿠팡] 핫딜 에어팟 최저가").collect();
        assert_eq!(keywords, vec!["쿠팡", "에어팟"]);
    }

    #[test]
    fn test_board_overrides() {
        let extraction = ExtractionConfig {
            min_length: Some(3),
            extra_stopwords: vec!["후기".to_string()],
            ..ExtractionConfig::default()
        };
        let mut board = BoardConfig::new(SiteKind::Clien, "park");
        board.extra_stopwords.push("맥북".to_string());

        let config = ExtractorConfig::for_board(&board, &extraction);
        assert_eq!(config.min_length, 3);
        assert!(config.stopwords.contains("후기"));
        assert!(config.stopwords.contains("맥북"));
        assert!(config.stopwords.contains("클리앙"));
    }

    #[test]
    fn test_zero_min_length_is_rejected() {
        let config = ExtractorConfig::default().with_min_length(0);
        assert!(KeywordExtractor::new(config).is_err());
    }

    #[test]
    fn test_extract_ranks_and_truncates() {
        let posts = vec![
            PostRecord::new("갤럭시 출시", 1.0),
            PostRecord::new("아이폰 출시", 1.0),
            PostRecord::new("아이폰 가격", 1.0),
        ];
        let ranked = plain().extract(&posts, 2);
        let keywords: Vec<&str> = ranked.iter().map(|s| s.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["출시", "아이폰"]);
    }
}
