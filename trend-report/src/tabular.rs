use crate::document::TrendDocument;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;
use trendscope_core::{CoreError, ExportError};

pub const CSV_HEADER: [&str; 6] = ["게시판", "순위", "키워드", "출현횟수", "총_인기도", "평균_인기도"];

/// Lets spreadsheet tools detect UTF-8.
const UTF8_BOM: &[u8] = "\u{feff}".as_bytes();

/// Average rounded to two decimals, always printed with a fractional part.
///
/// Rounds the exact binary value, ties to even, so `0.125` becomes `0.12`
/// and `2.675` (stored just below) becomes `2.67`.
pub fn format_average(value: f64) -> String {
    let rounded: f64 = format!("{:.2}", value).parse().unwrap_or(value);
    if rounded.fract() == 0.0 {
        format!("{:.1}", rounded)
    } else {
        format!("{}", rounded)
    }
}

/// One row per ranked keyword of every source, ranks starting at 1.
pub fn write_csv<W: Write>(document: &TrendDocument, writer: W) -> Result<(), CoreError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;

    for (_, report) in document.iter() {
        for (index, stat) in report.keywords.iter().enumerate() {
            csv_writer.write_record([
                report.source_name.clone(),
                (index + 1).to_string(),
                stat.keyword.clone(),
                stat.count.to_string(),
                stat.total_engagement.to_string(),
                format_average(stat.avg_engagement),
            ])?;
        }
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn write_csv_file(document: &TrendDocument, path: impl AsRef<Path>) -> Result<(), CoreError> {
    let path = path.as_ref();
    if document.is_empty() {
        return Err(ExportError::EmptyDocument.into());
    }

    let write_failed = |e: std::io::Error| ExportError::WriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    };

    let mut file = BufWriter::new(File::create(path).map_err(write_failed)?);
    file.write_all(UTF8_BOM).map_err(write_failed)?;
    write_csv(document, &mut file)?;
    file.flush().map_err(write_failed)?;

    info!("Saved CSV table to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SourceReport;
    use trendscope_core::KeywordStat;

    fn document() -> TrendDocument {
        let mut document = TrendDocument::new();
        document.insert(
            "clien/park",
            SourceReport::new(
                "모두의공원",
                4,
                vec![
                    KeywordStat::new("아이폰", 3, 100.0),
                    KeywordStat::new("맥북", 2, 15.0),
                ],
            ),
        );
        document.insert(
            "ppomppu/ppomppu",
            SourceReport::new("뽐뿌 핫딜", 1, vec![KeywordStat::new("에어팟", 1, 390.0)]),
        );
        document
    }

    #[test]
    fn test_format_average() {
        assert_eq!(format_average(100.0 / 3.0), "33.33");
        assert_eq!(format_average(7.5), "7.5");
        assert_eq!(format_average(3.0), "3.0");
        assert_eq!(format_average(12.3456), "12.35");
    }

    #[test]
    fn test_format_average_ties_go_to_even() {
        assert_eq!(format_average(0.125), "0.12");
        assert_eq!(format_average(0.375), "0.38");
        assert_eq!(format_average(2.675), "2.67");
        assert_eq!(format_average(1.115), "1.11");
    }

    #[test]
    fn test_csv_rows() {
        let mut buffer = Vec::new();
        write_csv(&document(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "게시판,순위,키워드,출현횟수,총_인기도,평균_인기도");
        assert_eq!(lines[1], "모두의공원,1,아이폰,3,100,33.33");
        assert_eq!(lines[2], "모두의공원,2,맥북,2,15,7.5");
        assert_eq!(lines[3], "뽐뿌 핫딜,1,에어팟,1,390,390.0");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_csv_file_starts_with_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trends.csv");

        write_csv_file(&document(), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        assert!(String::from_utf8(bytes).unwrap().contains("아이폰"));
    }

    #[test]
    fn test_empty_document_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trends.csv");

        assert!(write_csv_file(&TrendDocument::new(), &path).is_err());
        assert!(!path.exists());
    }
}
