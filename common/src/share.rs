//! 履歴項目の共有データ

use crate::endpoints::ClientConfig;

pub const SHARE_TITLE: &str = "Food Scan Result";
pub const SHARE_UNSUPPORTED_MESSAGE: &str = "Sharing is not supported on this browser.";

/// 共有シートに渡す内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub file_name: String,
    /// アップロード済み画像の取得先
    pub image_url: String,
}

impl SharePayload {
    pub fn for_history_item(config: &ClientConfig, filename: &str, verdict: &str) -> Self {
        Self {
            title: SHARE_TITLE.to_string(),
            text: share_text(verdict),
            file_name: filename.to_string(),
            image_url: config.thumbnail_url(filename),
        }
    }

    pub fn mime_type(&self) -> &'static str {
        mime_type_for(&self.file_name)
    }
}

pub fn share_text(verdict: &str) -> String {
    let verdict = verdict.trim();
    if verdict.is_empty() {
        "Check out my food scan!".to_string()
    } else {
        format!("Scan verdict: {}", verdict)
    }
}

/// 拡張子からMIMEタイプを決める（不明ならJPEG）
pub fn mime_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "image/jpeg",
    }
}
