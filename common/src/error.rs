//! エラー型定義

use crate::types::ApiErrorBody;
use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not logged in")]
    Unauthenticated,

    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Camera error: {0}")]
    Camera(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// ステータスコードとレスポンスボディからエラーを組み立てる
    ///
    /// 401は未ログイン扱い。ボディが `{"error": "..."}` ならその文言を使う。
    pub fn from_status(status: u16, body: &str) -> Self {
        if status == 401 {
            return Error::Unauthenticated;
        }

        let message = match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(parsed) => parsed.error,
            Err(_) => body.trim().to_string(),
        };
        let message = if message.is_empty() {
            "request failed".to_string()
        } else {
            message
        };

        Error::Http { status, message }
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Error::Unauthenticated)
    }

    /// alert() に出す文言
    pub fn user_message(&self) -> String {
        match self {
            Error::Unauthenticated => "Please log in to continue.".to_string(),
            Error::Http { message, .. } => message.clone(),
            Error::Network(_) => {
                "Network error. Please check your connection and try again.".to_string()
            }
            Error::Camera(reason) => format!("Could not access the camera: {}", reason),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_401_is_unauthenticated() {
        let error = Error::from_status(401, "");
        assert!(error.is_unauthenticated());
    }

    #[test]
    fn test_from_status_extracts_error_body() {
        let error = Error::from_status(400, r#"{"error": "No file provided"}"#);
        match error {
            Error::Http { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "No file provided");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_from_status_plain_body() {
        let error = Error::from_status(500, "  Internal Server Error \n");
        assert_eq!(error.to_string(), "HTTP error 500: Internal Server Error");
    }

    #[test]
    fn test_from_status_empty_body() {
        let error = Error::from_status(502, "");
        assert_eq!(error.user_message(), "request failed");
    }

    #[test]
    fn test_user_message_network() {
        let error = Error::Network("fetch failed".to_string());
        assert!(error.user_message().contains("Network error"));
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn test_error_debug() {
        let error = Error::Config("テスト".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("Config"));
        assert!(debug.contains("テスト"));
    }
}
