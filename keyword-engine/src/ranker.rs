use crate::table::KeywordTable;
use trendscope_core::KeywordStat;

/// Orders a table by descending count and keeps the first `top_n` entries.
///
/// Equal counts keep the table's first-encounter order.
pub fn rank(table: &KeywordTable, top_n: usize) -> Vec<KeywordStat> {
    let mut stats: Vec<KeywordStat> = table
        .iter()
        .map(|(keyword, tally)| KeywordStat::new(keyword, tally.count, tally.total_engagement))
        .collect();

    // sort_by is stable
    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats.truncate(top_n);
    stats
}

/// Sums several tables keyword by keyword and ranks the result.
pub fn merge<'a, I>(tables: I, top_n: usize) -> Vec<KeywordStat>
where
    I: IntoIterator<Item = &'a KeywordTable>,
{
    let mut merged = KeywordTable::new();
    for table in tables {
        merged.absorb(table);
    }
    rank(&merged, top_n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, f64)]) -> KeywordTable {
        let mut table = KeywordTable::new();
        for (keyword, engagement) in entries {
            table.record(keyword, *engagement);
        }
        table
    }

    #[test]
    fn test_rank_orders_by_count_with_stable_ties() {
        let t = table(&[
            ("케이스", 1.0),
            ("아이폰", 1.0),
            ("추천", 1.0),
            ("아이폰", 1.0),
        ]);
        let ranked = rank(&t, 10);
        let keywords: Vec<&str> = ranked.iter().map(|s| s.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["아이폰", "케이스", "추천"]);
    }

    #[test]
    fn test_rank_truncates() {
        let t = table(&[("가나", 1.0), ("다라", 1.0), ("마바", 1.0)]);
        assert_eq!(rank(&t, 2).len(), 2);
        assert!(rank(&t, 0).is_empty());
        assert!(rank(&KeywordTable::new(), 100).is_empty());
    }

    #[test]
    fn test_merge_sums_and_recomputes_average() {
        let board = table(&[("아이폰", 10.0), ("리뷰", 10.0)]);
        let gallery = table(&[("갤럭시", 2.0), ("아이폰", 4.0), ("아이폰", 4.0)]);

        let overall = merge([&board, &gallery], 20);
        assert_eq!(overall[0].keyword, "아이폰");
        assert_eq!(overall[0].count, 3);
        assert_eq!(overall[0].total_engagement, 18.0);
        assert_eq!(overall[0].avg_engagement, 6.0);

        let rest: Vec<&str> = overall[1..].iter().map(|s| s.keyword.as_str()).collect();
        assert_eq!(rest, vec!["리뷰", "갤럭시"]);
    }

    #[test]
    fn test_merge_of_single_table_equals_rank() {
        let t = table(&[("서울", 3.0), ("맛집", 3.0), ("서울", 3.0)]);
        assert_eq!(merge([&t], 100), rank(&t, 100));
    }
}
