//! Pattern-based title tokenizer.
//!
//! A title is scanned three times, once per token class, and the matches are
//! chained in class order: Hangul runs, Latin words, then digit+Hangul
//! tokens. A substring matching more than one class is yielded once per
//! class that matches it.

use regex::Regex;
use trendscope_core::ConfigError;

const HANGUL_RUN: &str = r"[가-힣]{2,}";
const DIGIT_HANGUL: &str = r"\d+[가-힣]+";
const CAPITALIZED_WORD: &str = r"\b[A-Z][a-z]+\b|\b[A-Z]{2,}\b";

/// Shape a Latin word must have to become a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatinTokenRule {
    /// Any run of ASCII letters at least this long, bounded by word boundaries.
    MinLength(usize),
    /// A capitalized word (`Netflix`) or an all-caps word of two or more letters (`BTS`).
    Capitalized,
}

impl Default for LatinTokenRule {
    fn default() -> Self {
        LatinTokenRule::MinLength(2)
    }
}

impl LatinTokenRule {
    fn pattern(&self) -> Result<String, ConfigError> {
        match self {
            LatinTokenRule::MinLength(0) => Err(ConfigError::InvalidValue {
                field: "latin_rule".to_string(),
                value: "MinLength(0)".to_string(),
            }),
            LatinTokenRule::MinLength(n) => Ok(format!(r"\b[A-Za-z]{{{},}}\b", n)),
            LatinTokenRule::Capitalized => Ok(CAPITALIZED_WORD.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Tokenizer {
    hangul: Regex,
    latin: Regex,
    mixed: Regex,
}

impl Tokenizer {
    pub fn new(rule: LatinTokenRule) -> Result<Self, ConfigError> {
        let compile = |field: &str, pattern: &str| {
            Regex::new(pattern).map_err(|e| ConfigError::InvalidValue {
                field: field.to_string(),
                value: e.to_string(),
            })
        };

        Ok(Self {
            hangul: compile("hangul_pattern", HANGUL_RUN)?,
            latin: compile("latin_rule", &rule.pattern()?)?,
            mixed: compile("mixed_pattern", DIGIT_HANGUL)?,
        })
    }

    /// Candidate tokens of `title`, duplicates included.
    pub fn tokenize<'a>(&'a self, title: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.hangul
            .find_iter(title)
            .chain(self.latin.find_iter(title))
            .chain(self.mixed.find_iter(title))
            .map(|m| m.as_str())
    }
}
