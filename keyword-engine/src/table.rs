use indexmap::IndexMap;
use trendscope_core::KeywordStat;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KeywordTally {
    pub count: u64,
    pub total_engagement: f64,
}

/// Accumulator from keyword to tally, ordered by first encounter.
///
/// The insertion order is what the ranker falls back to for equal counts,
/// so a table must always be built by a single ordered fold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordTable {
    entries: IndexMap<String, KeywordTally>,
}

impl KeywordTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one occurrence of `keyword` carrying `engagement`.
    pub fn record(&mut self, keyword: &str, engagement: f64) {
        self.add(keyword, 1, engagement);
    }

    /// Sums another table into this one, keeping this table's order for known keys.
    pub fn absorb(&mut self, other: &KeywordTable) {
        for (keyword, tally) in &other.entries {
            self.add(keyword, tally.count, tally.total_engagement);
        }
    }

    /// Rebuilds a table from an emitted ranking, in ranking order.
    pub fn from_stats(stats: &[KeywordStat]) -> Self {
        let mut table = Self::new();
        for stat in stats {
            table.add(&stat.keyword, stat.count, stat.total_engagement);
        }
        table
    }

    pub fn get(&self, keyword: &str) -> Option<KeywordStat> {
        self.entries
            .get(keyword)
            .map(|tally| KeywordStat::new(keyword, tally.count, tally.total_engagement))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &KeywordTally)> {
        self.entries
            .iter()
            .map(|(keyword, tally)| (keyword.as_str(), tally))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn add(&mut self, keyword: &str, count: u64, engagement: f64) {
        if count == 0 {
            return;
        }
        // get_mut first so known keywords do not allocate
        if let Some(tally) = self.entries.get_mut(keyword) {
            tally.count += count;
            tally.total_engagement += engagement;
        } else {
            self.entries.insert(
                keyword.to_string(),
                KeywordTally {
                    count,
                    total_engagement: engagement,
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_first_encounter_order() {
        let mut table = KeywordTable::new();
        table.record("리뷰", 1.0);
        table.record("아이폰", 2.0);
        table.record("리뷰", 3.0);

        let keys: Vec<&str> = table.iter().map(|(keyword, _)| keyword).collect();
        assert_eq!(keys, vec!["리뷰", "아이폰"]);

        let review = table.get("리뷰").unwrap();
        assert_eq!(review.count, 2);
        assert_eq!(review.total_engagement, 4.0);
        assert_eq!(review.avg_engagement, 2.0);
        assert!(table.get("없음").is_none());
    }

    #[test]
    fn test_absorb_sums_tallies() {
        let mut first = KeywordTable::new();
        first.record("맛집", 5.0);

        let mut second = KeywordTable::new();
        second.record("여행", 1.0);
        second.record("맛집", 7.0);

        first.absorb(&second);
        assert_eq!(first.len(), 2);
        assert_eq!(first.get("맛집").unwrap().count, 2);
        assert_eq!(first.get("맛집").unwrap().total_engagement, 12.0);
        assert_eq!(first.get("여행").unwrap().count, 1);
    }

    #[test]
    fn test_from_stats_drops_empty_entries() {
        let stats = vec![
            KeywordStat::new("아이폰", 3, 30.0),
            KeywordStat::new("유령", 0, 0.0),
        ];
        let table = KeywordTable::from_stats(&stats);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("아이폰").unwrap().avg_engagement, 10.0);
    }
}
