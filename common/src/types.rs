//! 解析結果の型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - ScanRecord: `/analyze` のレスポンス、`/history` の要素
//! - NutrientImpact: 詳細レポートの1行
//! - ApiErrorBody: 400応答の `{"error": ...}`

use crate::endpoints;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// 詳細レポートの1行（栄養素と影響）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutrientImpact {
    pub nutrient: String,
    pub impact: String,
}

/// 1回のスキャン結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    /// サーバ上の保存名（`<user>_<YYYYmmdd_HHMMSS>_<元ファイル名>`）
    pub filename: String,

    /// `YYYY-MM-DD HH:MM`
    #[serde(default)]
    pub timestamp: String,

    #[serde(default)]
    pub quick_verdict: String,

    #[serde(default)]
    pub detailed_report: Vec<NutrientImpact>,

    /// OCRテキスト
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr_text: Option<String>,
}

impl ScanRecord {
    /// サムネイルの相対パス（`static/uploads/<filename>`）
    pub fn thumbnail_path(&self) -> String {
        endpoints::thumbnail_path(&self.filename)
    }

    /// 元のファイル名（サーバが付けた `<user>_<date>_<time>_` を除いたもの）
    pub fn original_name(&self) -> &str {
        let mut parts = self.filename.splitn(4, '_');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(date), Some(time), Some(rest))
                if is_digits(date, 8) && is_digits(time, 6) && !rest.is_empty() =>
            {
                rest
            }
            _ => &self.filename,
        }
    }

    pub fn ocr_text(&self) -> Option<&str> {
        self.ocr_text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

/// エラーレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

/// `/analyze` のレスポンスを読む
pub fn parse_scan_record(json: &str) -> Result<ScanRecord> {
    Ok(serde_json::from_str(json)?)
}

/// `/history` のレスポンスを読む
pub fn parse_history(json: &str) -> Result<Vec<ScanRecord>> {
    Ok(serde_json::from_str(json)?)
}
