//! バックエンドのエンドポイント定義

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// アップロード時のフォームフィールド名
pub const UPLOAD_FIELD: &str = "file";

/// カメラ撮影画像のファイル名
pub const CAPTURE_FILE_NAME: &str = "capture.jpg";

/// カメラ撮影画像のJPEG品質（0.0〜1.0）
pub const JPEG_QUALITY: f64 = 0.9;

/// アップロード画像の公開ディレクトリ
pub const UPLOADS_DIR: &str = "static/uploads";

/// バックエンドのエンドポイント
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Analyze,
    Upload,
    History,
    Chat,
    Login,
    Register,
    Logout,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Analyze => "/analyze",
            Endpoint::Upload => "/upload",
            Endpoint::History => "/history",
            Endpoint::Chat => "/chat",
            Endpoint::Login => "/login",
            Endpoint::Register => "/register",
            Endpoint::Logout => "/logout",
        }
    }

    pub fn method(&self) -> &'static str {
        match self {
            Endpoint::History | Endpoint::Logout => "GET",
            _ => "POST",
        }
    }
}

/// 画像の送信先（`/analyze` と `/upload` は同じ契約）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzeRoute {
    #[default]
    Analyze,
    Upload,
}

impl AnalyzeRoute {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            AnalyzeRoute::Analyze => Endpoint::Analyze,
            AnalyzeRoute::Upload => Endpoint::Upload,
        }
    }
}

impl FromStr for AnalyzeRoute {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('/').to_ascii_lowercase().as_str() {
            "analyze" => Ok(AnalyzeRoute::Analyze),
            "upload" => Ok(AnalyzeRoute::Upload),
            other => Err(format!("unknown analyze route: {} (analyze/upload)", other)),
        }
    }
}

impl fmt::Display for AnalyzeRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint().path())
    }
}

/// サムネイルの相対パス
pub fn thumbnail_path(filename: &str) -> String {
    format!("{}/{}", UPLOADS_DIR, filename)
}

/// リダイレクト先がログインページかどうか
///
/// 未ログイン時、サーバは401の代わりに `/login?next=...` へリダイレクトすることがある。
pub fn is_login_redirect(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    path.trim_end_matches('/').ends_with(Endpoint::Login.path())
}

/// 接続先設定
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// 空なら同一オリジン（ブラウザ）
    pub base_url: String,
    pub analyze_route: AnalyzeRoute,
}

impl ClientConfig {
    pub fn same_origin() -> Self {
        Self::default()
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        self.join(endpoint.path())
    }

    pub fn analyze_url(&self) -> String {
        self.url(self.analyze_route.endpoint())
    }

    pub fn thumbnail_url(&self, filename: &str) -> String {
        self.join(&thumbnail_path(filename))
    }

    fn join(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.is_empty() {
            path.to_string()
        } else {
            format!("{}/{}", base, path.trim_start_matches('/'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_origin_urls() {
        let config = ClientConfig::same_origin();
        assert_eq!(config.url(Endpoint::History), "/history");
        assert_eq!(config.analyze_url(), "/analyze");
        assert_eq!(config.thumbnail_url("a.jpg"), "static/uploads/a.jpg");
    }

    #[test]
    fn test_base_url_join() {
        let mut config = ClientConfig::with_base_url("http://127.0.0.1:5000/");
        config.analyze_route = AnalyzeRoute::Upload;
        assert_eq!(config.analyze_url(), "http://127.0.0.1:5000/upload");
        assert_eq!(
            config.thumbnail_url("a.jpg"),
            "http://127.0.0.1:5000/static/uploads/a.jpg"
        );
    }

    #[test]
    fn test_analyze_route_from_str() {
        assert_eq!("analyze".parse::<AnalyzeRoute>(), Ok(AnalyzeRoute::Analyze));
        assert_eq!("/upload".parse::<AnalyzeRoute>(), Ok(AnalyzeRoute::Upload));
        assert!("history".parse::<AnalyzeRoute>().is_err());
    }

    #[test]
    fn test_is_login_redirect() {
        assert!(is_login_redirect("http://localhost:5000/login?next=%2Fhistory"));
        assert!(is_login_redirect("/login"));
        assert!(is_login_redirect("/login/"));
        assert!(!is_login_redirect("http://localhost:5000/history"));
        assert!(!is_login_redirect("/static/uploads/login.jpg"));
    }

    #[test]
    fn test_endpoint_methods() {
        assert_eq!(Endpoint::History.method(), "GET");
        assert_eq!(Endpoint::Analyze.method(), "POST");
        assert_eq!(Endpoint::Logout.method(), "GET");
    }
}
