//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use food_scan::error::FoodScanError;
use food_scan::{image_prep, scanner};
use std::path::Path;
use tempfile::tempdir;

/// 存在しないフォルダをスキャンした場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = scanner::scan_folder(Path::new("/nonexistent/path/12345"));
    assert!(result.is_err());

    let err = result.unwrap_err();
    assert!(matches!(err, FoodScanError::FolderNotFound(_)));
}

/// 画像のないフォルダをスキャンした場合
#[test]
fn test_scan_folder_no_images() {
    let dir = tempdir().expect("Failed to create temp dir");

    std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("scan-result.json"), "[]").unwrap();

    let result = scanner::scan_folder(dir.path());
    assert!(result.is_ok());
    assert!(result.unwrap().is_empty());
}

/// 画像として読めないファイルは再エンコードで失敗する
#[test]
fn test_prepare_broken_image() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("broken.jpg");
    std::fs::write(&path, b"not an image").unwrap();

    let err = image_prep::prepare(&path, false).unwrap_err();
    assert!(matches!(err, FoodScanError::ImageLoad(_)));
    assert!(format!("{}", err).contains("broken.jpg"));
}

/// FoodScanErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        FoodScanError::Config("テスト設定エラー".to_string()),
        FoodScanError::LoginRejected("HTTP 200".to_string()),
        FoodScanError::FileNotFound("label.jpg".to_string()),
        FoodScanError::FolderNotFound("/path/to/folder".to_string()),
        FoodScanError::NoImagesFound("フォルダ".to_string()),
        FoodScanError::ImageLoad("壊れた画像".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// 未ログインのメッセージはログイン方法を案内する
#[test]
fn test_not_logged_in_message() {
    let display = format!("{}", FoodScanError::NotLoggedIn);
    assert!(display.contains("food-scan login"));
}

/// サーバの401は未ログイン扱い
#[test]
fn test_unauthenticated_server_error() {
    let err = FoodScanError::from_server(food_scan_common::Error::from_status(401, ""));
    assert!(matches!(err, FoodScanError::NotLoggedIn));
}

/// 400応答の `{"error": ...}` がそのまま表示される
#[test]
fn test_bad_request_message_kept() {
    let common_err = food_scan_common::Error::from_status(400, r#"{"error": "No file provided"}"#);
    let err = FoodScanError::from_server(common_err);

    assert!(matches!(err, FoodScanError::Server(_)));
    assert!(format!("{}", err).contains("No file provided"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: FoodScanError = io_err.into();

    assert!(matches!(err, FoodScanError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: FoodScanError = json_err.into();

    assert!(matches!(err, FoodScanError::JsonParse(_)));
}
