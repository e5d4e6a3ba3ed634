use trendscope_core::KeywordStat;

/// One line per keyword, at most `k` of them, ranks starting at 1.
pub fn format_top(keywords: &[KeywordStat], k: usize) -> Vec<String> {
    keywords
        .iter()
        .take(k)
        .enumerate()
        .map(|(index, stat)| {
            format!(
                "{:2}. {:20} | 출현: {:3}회 | 인기도: {:6}",
                index + 1,
                stat.keyword,
                stat.count,
                stat.total_engagement
            )
        })
        .collect()
}

/// Heading followed by the top lines, or a placeholder when nothing ranked.
pub fn render_section(title: &str, keywords: &[KeywordStat], k: usize) -> String {
    let mut out = format!("[{}] TOP {}\n", title, k.min(keywords.len()));
    if keywords.is_empty() {
        out.push_str("  (no keywords)\n");
        return out;
    }
    for line in format_top(keywords, k) {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_layout() {
        let lines = format_top(&[KeywordStat::new("아이폰", 3, 90.0)], 10);
        assert_eq!(
            lines,
            vec![format!(
                " 1. {:20} | 출현:   3회 | 인기도:     90",
                "아이폰"
            )]
        );
    }

    #[test]
    fn test_truncates_to_k() {
        let keywords = vec![
            KeywordStat::new("a1", 3, 3.0),
            KeywordStat::new("b2", 2, 2.0),
            KeywordStat::new("c3", 1, 1.0),
        ];
        let lines = format_top(&keywords, 2);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with(" 2. b2"));
        assert!(lines[1].ends_with("인기도:      2"));
    }

    #[test]
    fn test_fractional_total() {
        let lines = format_top(&[KeywordStat::new("맥북", 2, 7.5)], 1);
        assert!(lines[0].ends_with("인기도:    7.5"));
    }

    #[test]
    fn test_empty_section() {
        let section = render_section("뽐뿌 핫딜", &[], 10);
        assert_eq!(section, "[뽐뿌 핫딜] TOP 0\n  (no keywords)\n");
    }
}
