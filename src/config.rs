use crate::error::{FoodScanError, Result};
use food_scan_common::{AnalyzeRoute, ClientConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server_url: String,
    /// ログイン時に受け取った `session` Cookie の値
    pub session_cookie: Option<String>,
    pub timeout_seconds: u64,
    pub analyze_route: AnalyzeRoute,
    /// `share` でダウンロードした画像の保存先
    pub download_dir: Option<PathBuf>,
    /// 環境変数での上書き（保存しない）
    #[serde(skip)]
    env_server_url: Option<String>,
    #[serde(skip)]
    env_session: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.into(),
            session_cookie: None,
            timeout_seconds: 60,
            analyze_route: AnalyzeRoute::Analyze,
            download_dir: None,
            env_server_url: None,
            env_session: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?, |key| std::env::var(key).ok())
    }

    /// `env` は環境変数の参照（テストでは差し替える）
    pub fn load_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };

        config.apply_env(env);
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| FoodScanError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("food-scan").join("config.json"))
    }

    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| {
            env(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        self.env_server_url = non_empty("FOOD_SCAN_SERVER");
        self.env_session = non_empty("FOOD_SCAN_SESSION");
    }

    /// 実際に使うサーバURL（環境変数を優先）
    pub fn server_url(&self) -> &str {
        self.env_server_url.as_deref().unwrap_or(&self.server_url)
    }

    /// 実際に送るセッション（環境変数を優先）
    pub fn session(&self) -> Option<&str> {
        self.env_session.as_deref().or(self.session_cookie.as_deref())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.server_url().to_string(),
            analyze_route: self.analyze_route,
        }
    }

    pub fn set_server_url(&mut self, url: &str) -> Result<()> {
        let url = url.trim().trim_end_matches('/');
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(FoodScanError::Config(format!(
                "サーバURLは http:// または https:// で始めてください: {}",
                url
            )));
        }
        self.server_url = url.to_string();
        // 別サーバのセッションは使えない
        self.session_cookie = None;
        Ok(())
    }

    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
