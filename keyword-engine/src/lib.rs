//! Keyword extraction and trend aggregation over post titles.

pub mod extractor;
pub mod ranker;
pub mod stopwords;
pub mod table;
pub mod tokenizer;

pub use extractor::{ExtractorConfig, KeywordExtractor, DEFAULT_MIN_LENGTH};
pub use ranker::{merge, rank};
pub use stopwords::{accept, StopwordSet, COMMON_STOPWORDS, GREETINGS};
pub use table::{KeywordTable, KeywordTally};
pub use tokenizer::{LatinTokenRule, Tokenizer};
