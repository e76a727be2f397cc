//! 解析結果の端末表示

use food_scan_common::{history::EMPTY_HISTORY_MESSAGE, ScanRecord};
use std::fmt::Write;

const NUTRIENT_WIDTH: usize = 24;

/// 1件分の結果（判定・詳細レポート・OCRテキスト）
pub fn format_record(record: &ScanRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "判定: {}", record.quick_verdict);
    let _ = writeln!(out, "ファイル: {}", record.filename);
    if !record.timestamp.is_empty() {
        let _ = writeln!(out, "日時: {}", record.timestamp);
    }

    if !record.detailed_report.is_empty() {
        let _ = writeln!(out, "\n詳細レポート:");
        let _ = writeln!(out, "  {:<width$} 影響", "栄養素", width = NUTRIENT_WIDTH);
        for row in &record.detailed_report {
            let _ = writeln!(out, "  {:<width$} {}", row.nutrient, row.impact, width = NUTRIENT_WIDTH);
        }
    }

    if let Some(text) = record.ocr_text() {
        let _ = writeln!(out, "\n読み取りテキスト:");
        for line in text.lines() {
            let _ = writeln!(out, "  {}", line);
        }
    }

    out
}

/// 履歴一覧（サーバの並び順のまま）
pub fn format_history(records: &[ScanRecord]) -> String {
    if records.is_empty() {
        return format!("{}\n", EMPTY_HISTORY_MESSAGE);
    }

    let mut out = String::new();
    for record in records {
        let _ = writeln!(
            out,
            "{:<16}  {:<28}  {}",
            record.timestamp,
            record.original_name(),
            record.quick_verdict
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use food_scan_common::NutrientImpact;

    fn record() -> ScanRecord {
        ScanRecord {
            filename: "alice_20240501_120000_cereal.jpg".into(),
            timestamp: "2024-05-01 12:00".into(),
            quick_verdict: "High in sugar".into(),
            detailed_report: vec![NutrientImpact {
                nutrient: "Sugar".into(),
                impact: "High".into(),
            }],
            ocr_text: Some("Sugar 30g\nSalt 0.2g".into()),
        }
    }

    #[test]
    fn test_format_record_sections() {
        let text = format_record(&record());
        assert!(text.starts_with("判定: High in sugar\n"));
        assert!(text.contains("Sugar"));
        assert!(text.contains("読み取りテキスト:"));
        assert!(text.contains("  Salt 0.2g"));
    }

    #[test]
    fn test_format_record_without_report_or_ocr() {
        let mut r = record();
        r.detailed_report.clear();
        r.ocr_text = Some("   ".into());
        let text = format_record(&r);
        assert!(!text.contains("詳細レポート"));
        assert!(!text.contains("読み取りテキスト"));
    }

    #[test]
    fn test_format_history() {
        assert_eq!(format_history(&[]), format!("{}\n", EMPTY_HISTORY_MESSAGE));

        let text = format_history(&[record()]);
        assert!(text.contains("cereal.jpg"));
        assert!(!text.contains("alice_20240501"));
        assert!(text.contains("High in sugar"));
    }
}
