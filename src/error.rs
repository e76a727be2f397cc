use thiserror::Error;

#[derive(Error, Debug)]
pub enum FoodScanError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ログインしていません。`food-scan login` でログインしてください")]
    NotLoggedIn,

    #[error("ログインに失敗しました: {0}")]
    LoginRejected(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("サーバエラー: {0}")]
    Server(#[from] food_scan_common::Error),

    #[error("HTTP通信エラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("入力エラー: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl FoodScanError {
    /// サーバ応答の401をログイン案内に寄せる
    pub fn from_server(error: food_scan_common::Error) -> Self {
        if error.is_unauthenticated() {
            FoodScanError::NotLoggedIn
        } else {
            FoodScanError::Server(error)
        }
    }
}

pub type Result<T> = std::result::Result<T, FoodScanError>;
