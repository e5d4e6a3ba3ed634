use std::collections::HashSet;
use trendscope_core::SiteKind;

/// Filler shared by every site: copulas, pronouns, time words, intensifiers, conjunctions.
pub const COMMON_STOPWORDS: &[&str] = &[
    "게시판", "질문", "답변",
    "입니다", "합니다", "있습니다", "없습니다", "가능", "불가능",
    "이거", "저거", "그거", "이게", "저게", "그게",
    "오늘", "어제", "내일", "요즘", "지금", "이제", "그냥",
    "진짜", "정말", "완전", "너무", "엄청", "개", "매우",
    "있다", "없다", "하다", "되다", "이다", "아니다",
    "같다", "듯하다", "보이다", "싶다", "하고", "그리고",
    "또는", "그런데", "하지만", "그러나", "그래서", "때문에",
];

pub const GREETINGS: &[&str] = &["안녕하세요", "감사합니다", "수고하세요", "부탁드립니다"];

const CLIEN_EXTRA: &[&str] = &[
    "클리앙", "게시글", "공지",
    "모두의공원", "알뜰구매", "자동차", "영상기기",
];

const DCINSIDE_EXTRA: &[&str] = &["갤러리", "디시인사이드", "디시"];

const INSTIZ_EXTRA: &[&str] = &["인스티즈", "게시글", "공지"];

const PPOMPPU_EXTRA: &[&str] = &[
    "뽐뿌", "게시글", "공지",
    "핫딜", "특가", "할인", "최저가", "무료배송", "쿠폰",
];

/// Words excluded from keyword output, compared case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        set.extend(words);
        set
    }

    pub fn for_site(site: SiteKind) -> Self {
        let mut set = Self::new(COMMON_STOPWORDS);
        match site {
            SiteKind::Clien => {
                set.extend(CLIEN_EXTRA);
                set.extend(GREETINGS);
            }
            SiteKind::DcInside => set.extend(DCINSIDE_EXTRA),
            SiteKind::Instiz => {
                set.extend(INSTIZ_EXTRA);
                set.extend(GREETINGS);
            }
            SiteKind::Ppomppu => {
                set.extend(PPOMPPU_EXTRA);
                set.extend(GREETINGS);
            }
        }
        set
    }

    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words
            .extend(words.into_iter().map(|word| word.as_ref().to_lowercase()));
    }

    /// Exact match on the lowercase form, never a substring match.
    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(&token.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Keeps a token that is at least `min_length` characters long and not a stopword.
pub fn accept(token: &str, stopwords: &StopwordSet, min_length: usize) -> bool {
    token.chars().count() >= min_length && !stopwords.contains(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_sets_share_the_baseline() {
        for site in SiteKind::ALL {
            let set = StopwordSet::for_site(site);
            for word in COMMON_STOPWORDS {
                assert!(set.contains(word), "{} missing from {}", word, site);
            }
        }
    }

    #[test]
    fn test_site_specific_words() {
        let clien = StopwordSet::for_site(SiteKind::Clien);
        assert!(clien.contains("클리앙"));
        assert!(clien.contains("감사합니다"));
        assert!(!clien.contains("디시"));

        let dcinside = StopwordSet::for_site(SiteKind::DcInside);
        assert!(dcinside.contains("갤러리"));
        assert!(!dcinside.contains("안녕하세요"));

        let ppomppu = StopwordSet::for_site(SiteKind::Ppomppu);
        assert!(ppomppu.contains("핫딜"));
        assert!(ppomppu.contains("무료배송"));
    }

    #[test]
    fn test_accept_rejects_short_tokens() {
        let empty = StopwordSet::default();
        assert!(!accept("개", &empty, 2));
        assert!(accept("대박", &empty, 2));
        // length counts characters, not bytes
        assert!(!accept("대박", &empty, 3));
    }

    #[test]
    fn test_accept_is_case_insensitive_and_exact() {
        let set = StopwordSet::new(["Free", "게시판"]);
        assert!(!accept("FREE", &set, 2));
        assert!(!accept("free", &set, 2));
        assert!(accept("freedom", &set, 2));
        assert!(accept("자유게시판", &set, 2));
    }
}
