use chrono::Local;
use indexmap::IndexMap;
use keyword_engine::{merge, KeywordTable};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;
use trendscope_core::{CoreError, ExportError, KeywordStat};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Ranked keywords of one board or listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReport {
    #[serde(alias = "gallery_name", alias = "board_name")]
    pub source_name: String,
    pub total_posts: usize,
    pub keywords: Vec<KeywordStat>,
    #[serde(alias = "crawled_at")]
    pub collected_at: String,
}

impl SourceReport {
    /// Stamped with the current local time.
    pub fn new(
        source_name: impl Into<String>,
        total_posts: usize,
        keywords: Vec<KeywordStat>,
    ) -> Self {
        Self {
            source_name: source_name.into(),
            total_posts,
            keywords,
            collected_at: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    pub fn with_collected_at(mut self, collected_at: impl Into<String>) -> Self {
        self.collected_at = collected_at.into();
        self
    }
}

/// Reports keyed by source id, in collection order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrendDocument {
    sources: IndexMap<String, SourceReport>,
}

impl TrendDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the report of `source_id`. A replaced report keeps its position.
    pub fn insert(&mut self, source_id: impl Into<String>, report: SourceReport) {
        self.sources.insert(source_id.into(), report);
    }

    /// Merges another document in. A report whose id is already taken is
    /// kept under `id@label` so both count towards [`TrendDocument::overall`].
    pub fn extend_from(&mut self, other: TrendDocument, label: &str) {
        for (source_id, report) in other.sources {
            let key = self.free_key(source_id, label);
            self.sources.insert(key, report);
        }
    }

    fn free_key(&self, source_id: String, label: &str) -> String {
        if !self.sources.contains_key(&source_id) {
            return source_id;
        }

        let base = format!("{}@{}", source_id, label);
        let mut key = base.clone();
        let mut suffix = 2;
        while self.sources.contains_key(&key) {
            key = format!("{}-{}", base, suffix);
            suffix += 1;
        }
        key
    }

    pub fn get(&self, source_id: &str) -> Option<&SourceReport> {
        self.sources.get(source_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SourceReport)> {
        self.sources.iter().map(|(id, report)| (id.as_str(), report))
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Cross-source ranking over the keywords each report kept.
    pub fn overall(&self, top_n: usize) -> Vec<KeywordStat> {
        let tables: Vec<KeywordTable> = self
            .sources
            .values()
            .map(|report| KeywordTable::from_stats(&report.keywords))
            .collect();
        merge(&tables, top_n)
    }

    /// Pretty JSON with non-ASCII text kept as is.
    pub fn to_json_string(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), CoreError> {
        let path = path.as_ref();
        if self.is_empty() {
            return Err(ExportError::EmptyDocument.into());
        }

        let json = self.to_json_string()?;
        std::fs::write(path, json).map_err(|e| ExportError::WriteFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        info!("Saved {} sources to {}", self.len(), path.display());
        Ok(())
    }

    pub fn read_json(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }
}
