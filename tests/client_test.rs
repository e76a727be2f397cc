//! HTTPクライアントテスト
//!
//! ローカルのスタブサーバに対してログイン・解析・履歴・画像取得を検証

use axum::body::Bytes;
use axum::extract::Path;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use food_scan::client::FoodScanClient;
use food_scan::config::Config;
use food_scan::error::FoodScanError;
use food_scan::share;
use food_scan_common::{AnalyzeRoute, Error as ServerError};
use serde_json::json;
use tempfile::tempdir;

const SESSION: &str = "tok123";

fn logged_in(headers: &HeaderMap) -> bool {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains(&format!("session={}", SESSION)))
        .unwrap_or(false)
}

async fn login(body: String) -> Response {
    if body.contains("username=alice") && body.contains("password=secret") {
        (
            StatusCode::FOUND,
            [
                (header::LOCATION, "/".to_string()),
                (header::SET_COOKIE, format!("session={}; HttpOnly; Path=/", SESSION)),
            ],
        )
            .into_response()
    } else {
        (StatusCode::OK, "<form>Invalid username or password.</form>").into_response()
    }
}

async fn register(body: String) -> Response {
    // alice は登録済み
    if body.contains("username=alice") {
        return (StatusCode::OK, "<form>Username already exists.</form>").into_response();
    }
    (
        StatusCode::FOUND,
        [
            (header::LOCATION, "/".to_string()),
            (header::SET_COOKIE, format!("session={}; HttpOnly; Path=/", SESSION)),
        ],
    )
        .into_response()
}

async fn analyze(headers: HeaderMap, body: Bytes) -> Response {
    if !logged_in(&headers) {
        return (StatusCode::FOUND, [(header::LOCATION, "/login?next=%2Fanalyze")]).into_response();
    }

    let body = String::from_utf8_lossy(&body);
    let original = body
        .split("filename=\"")
        .nth(1)
        .and_then(|rest| rest.split('"').next())
        .unwrap_or("unknown");

    Json(json!({
        "filename": format!("alice_20240501_120000_{}", original),
        "timestamp": "2024-05-01 12:00",
        "quick_verdict": "High in sugar",
        "detailed_report": [{"nutrient": "Sugar", "impact": "High"}],
        "ocr_text": "Sugar 30g"
    }))
    .into_response()
}

async fn history(headers: HeaderMap) -> Response {
    if !logged_in(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!([
        {
            "filename": "alice_20240502_090000_soda.png",
            "timestamp": "2024-05-02 09:00",
            "quick_verdict": "Very high in sugar",
            "detailed_report": []
        },
        {
            "filename": "alice_20240501_120000_cereal.jpg",
            "timestamp": "2024-05-01 12:00",
            "quick_verdict": "High in sugar",
            "detailed_report": [{"nutrient": "Sugar", "impact": "High"}]
        }
    ]))
    .into_response()
}

async fn upload_image(Path(name): Path<String>) -> Response {
    if name.starts_with("alice_") {
        (StatusCode::OK, [(header::CONTENT_TYPE, "image/jpeg")], Bytes::from_static(b"JPEGDATA"))
            .into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

async fn spawn_server() -> String {
    let app = Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/logout", get(|| async { (StatusCode::FOUND, [(header::LOCATION, "/login")]) }))
        .route("/analyze", post(analyze))
        .route("/upload", post(analyze))
        .route("/history", get(history))
        .route("/static/uploads/:name", get(upload_image));
    serve(app).await
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind失敗");
    let addr = listener.local_addr().expect("アドレス取得失敗");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("サーバ停止");
    });
    format!("http://{}", addr)
}

fn config(server_url: &str, session: Option<&str>) -> Config {
    let mut config = Config::default();
    config.server_url = server_url.to_string();
    config.session_cookie = session.map(str::to_string);
    config.timeout_seconds = 5;
    config
}

/// 正しい資格情報でセッションCookieが得られる
#[tokio::test]
async fn test_login_success() {
    let server = spawn_server().await;
    let mut client = FoodScanClient::new(&config(&server, None)).unwrap();

    let session = client.login("alice", "secret").await.expect("ログイン失敗");
    assert_eq!(session, SESSION);
    assert_eq!(client.session(), Some(SESSION));
}

/// フォームが再表示されたらログイン失敗
#[tokio::test]
async fn test_login_rejected() {
    let server = spawn_server().await;
    let mut client = FoodScanClient::new(&config(&server, None)).unwrap();

    let err = client.login("alice", "wrong").await.unwrap_err();
    assert!(matches!(err, FoodScanError::LoginRejected(_)));
    assert!(client.session().is_none());
}

/// 登録済みのユーザ名は登録失敗として理由を示す
#[tokio::test]
async fn test_register_existing_user() {
    let server = spawn_server().await;
    let mut client = FoodScanClient::new(&config(&server, None)).unwrap();

    let err = client.register("alice", "secret").await.unwrap_err();
    match err {
        FoodScanError::LoginRejected(message) => assert!(message.contains("既に使われています")),
        other => panic!("LoginRejected になるべき: {:?}", other),
    }
    assert!(client.session().is_none());
}

/// 新しいユーザ名なら登録と同時にログインする
#[tokio::test]
async fn test_register_new_user() {
    let server = spawn_server().await;
    let mut client = FoodScanClient::new(&config(&server, None)).unwrap();

    let session = client.register("bob", "secret").await.expect("登録失敗");
    assert_eq!(session, SESSION);
}

/// 解析結果が ScanRecord として返る
#[tokio::test]
async fn test_analyze_returns_record() {
    let server = spawn_server().await;
    let client = FoodScanClient::new(&config(&server, Some(SESSION))).unwrap();

    let record = client
        .analyze(b"fake jpeg".to_vec(), "cereal.jpg", "image/jpeg")
        .await
        .expect("解析失敗");

    assert_eq!(record.filename, "alice_20240501_120000_cereal.jpg");
    assert_eq!(record.original_name(), "cereal.jpg");
    assert_eq!(record.quick_verdict, "High in sugar");
    assert_eq!(record.detailed_report.len(), 1);
    assert_eq!(record.ocr_text(), Some("Sugar 30g"));
}

/// `/upload` でも同じ契約
#[tokio::test]
async fn test_analyze_via_upload_route() {
    let server = spawn_server().await;
    let mut cfg = config(&server, Some(SESSION));
    cfg.analyze_route = AnalyzeRoute::Upload;
    let client = FoodScanClient::new(&cfg).unwrap();

    let record = client
        .analyze(b"fake".to_vec(), "soda.png", "image/png")
        .await
        .expect("解析失敗");
    assert_eq!(record.original_name(), "soda.png");
}

/// ログイン画面へのリダイレクトは未ログイン扱い
#[tokio::test]
async fn test_analyze_without_session_redirects_to_login() {
    let server = spawn_server().await;
    let client = FoodScanClient::new(&config(&server, None)).unwrap();

    let err = client
        .analyze(b"fake".to_vec(), "cereal.jpg", "image/jpeg")
        .await
        .unwrap_err();
    assert!(matches!(err, FoodScanError::NotLoggedIn));
}

/// 履歴はサーバの順序（新しい順）のまま
#[tokio::test]
async fn test_history_order() {
    let server = spawn_server().await;
    let client = FoodScanClient::new(&config(&server, Some(SESSION))).unwrap();

    let records = client.history().await.expect("履歴取得失敗");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].original_name(), "soda.png");
    assert_eq!(records[1].original_name(), "cereal.jpg");
}

/// 401 は未ログイン扱い
#[tokio::test]
async fn test_history_unauthorized() {
    let server = spawn_server().await;
    let client = FoodScanClient::new(&config(&server, Some("expired"))).unwrap();

    let err = client.history().await.unwrap_err();
    assert!(matches!(err, FoodScanError::NotLoggedIn));
}

/// ログアウトでローカルのセッションも消える
#[tokio::test]
async fn test_logout_forgets_session() {
    let server = spawn_server().await;
    let mut client = FoodScanClient::new(&config(&server, Some(SESSION))).unwrap();

    client.logout().await.expect("ログアウト失敗");
    assert!(client.session().is_none());
}

/// 共有: 画像を保存し、履歴の判定から共有文を作る
#[tokio::test]
async fn test_share_downloads_image() {
    let server = spawn_server().await;
    let client = FoodScanClient::new(&config(&server, Some(SESSION))).unwrap();
    let dir = tempdir().expect("Failed to create temp dir");

    let shared = share::download_for_share(&client, "alice_20240501_120000_cereal.jpg", dir.path())
        .await
        .expect("共有準備失敗");

    assert_eq!(shared.payload.text, "Scan verdict: High in sugar");
    assert!(shared.payload.image_url.ends_with("/static/uploads/alice_20240501_120000_cereal.jpg"));
    assert_eq!(std::fs::read(&shared.saved_to).unwrap(), b"JPEGDATA");
}

/// 存在しない画像の共有
#[tokio::test]
async fn test_share_missing_image() {
    let server = spawn_server().await;
    let client = FoodScanClient::new(&config(&server, Some(SESSION))).unwrap();
    let dir = tempdir().expect("Failed to create temp dir");

    let err = share::download_for_share(&client, "bob_missing.jpg", dir.path())
        .await
        .unwrap_err();
    assert!(matches!(err, FoodScanError::FileNotFound(_)));
}

/// 400応答の `error` がそのままエラーメッセージになる
#[tokio::test]
async fn test_analyze_bad_request_surfaces_error_text() {
    let app = Router::new().route(
        "/analyze",
        post(|| async {
            (StatusCode::BAD_REQUEST, Json(json!({"error": "No file provided"})))
        }),
    );
    let server = serve(app).await;
    let client = FoodScanClient::new(&config(&server, Some(SESSION))).unwrap();

    let err = client
        .analyze(b"fake".to_vec(), "cereal.jpg", "image/jpeg")
        .await
        .unwrap_err();
    match &err {
        FoodScanError::Server(ServerError::Http { status, message }) => {
            assert_eq!(*status, 400);
            assert_eq!(message, "No file provided");
        }
        other => panic!("Server(Http) になるべき: {:?}", other),
    }
    assert!(format!("{}", err).contains("No file provided"));
}
