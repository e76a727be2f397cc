//! Food Scan Common Library
//!
//! CLIとWeb(WASM)で共有される型と、スキャン画面のコントローラ

pub mod types;
pub mod error;
pub mod endpoints;
pub mod navigation;
pub mod camera;
pub mod history;
pub mod chat;
pub mod share;
pub mod controller;

pub use types::{ScanRecord, NutrientImpact, ApiErrorBody, parse_scan_record, parse_history};
pub use error::{Error, Result};
pub use endpoints::{
    AnalyzeRoute, ClientConfig, Endpoint, CAPTURE_FILE_NAME, JPEG_QUALITY, UPLOAD_FIELD,
    is_login_redirect, thumbnail_path,
};
pub use navigation::Page;
pub use camera::{CameraAffordance, CameraFacing, CameraState};
pub use history::{ActionKind, HistoryAction, HistoryView, chat_topic};
pub use chat::{ChatLog, ChatMessage, Sender};
pub use share::SharePayload;
pub use controller::{Effect, ScanController, UploadSource};
