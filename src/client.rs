//! スキャンサーバとのHTTP通信
//!
//! セッションはFlaskの `session` Cookieを手動で送る。リダイレクトは追わず、
//! ログイン画面への転送を未ログインとして扱う。

use crate::config::Config;
use crate::error::{FoodScanError, Result};
use food_scan_common::{
    is_login_redirect, parse_history, parse_scan_record, ClientConfig, Endpoint, ScanRecord,
    UPLOAD_FIELD,
};
use reqwest::header::{COOKIE, LOCATION, SET_COOKIE};
use reqwest::multipart::{Form, Part};
use reqwest::{redirect, RequestBuilder, Response};
use std::time::Duration;

pub const SESSION_COOKIE: &str = "session";

pub struct FoodScanClient {
    http: reqwest::Client,
    endpoints: ClientConfig,
    session: Option<String>,
}

impl FoodScanClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .redirect(redirect::Policy::none())
            .timeout(Duration::from_secs(config.timeout_seconds.max(1)))
            .build()?;

        Ok(Self {
            http,
            endpoints: config.client_config(),
            session: config.session().map(str::to_string),
        })
    }

    pub fn session(&self) -> Option<&str> {
        self.session.as_deref()
    }

    pub fn endpoints(&self) -> &ClientConfig {
        &self.endpoints
    }

    /// ログインしてセッションCookieを返す
    pub async fn login(&mut self, username: &str, password: &str) -> Result<String> {
        self.submit_credentials(Endpoint::Login, username, password).await
    }

    /// 登録に成功するとそのままログイン状態になる
    pub async fn register(&mut self, username: &str, password: &str) -> Result<String> {
        self.submit_credentials(Endpoint::Register, username, password).await
    }

    async fn submit_credentials(
        &mut self,
        endpoint: Endpoint,
        username: &str,
        password: &str,
    ) -> Result<String> {
        let url = self.endpoints.url(endpoint);
        tracing::debug!(%url, username, "送信: 認証フォーム");

        let resp = self
            .http
            .post(&url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        // 成功時はホームへのリダイレクト、失敗時はフォームが再表示される
        let status = resp.status();
        let session = session_from_response(&resp);
        match (status.is_redirection(), session) {
            (true, Some(session)) => {
                self.session = Some(session.clone());
                Ok(session)
            }
            _ => Err(FoodScanError::LoginRejected(format!(
                "{} (HTTP {})",
                rejection_message(endpoint),
                status.as_u16()
            ))),
        }
    }

    /// サーバ側のセッションを破棄する（失敗してもローカルの状態は消す）
    pub async fn logout(&mut self) -> Result<()> {
        let request = self.authorized(self.http.get(self.endpoints.url(Endpoint::Logout)));
        self.session = None;
        let resp = request.send().await?;
        tracing::debug!(status = resp.status().as_u16(), "ログアウト応答");
        Ok(())
    }

    /// 画像を送信して解析結果を受け取る
    pub async fn analyze(&self, bytes: Vec<u8>, file_name: &str, mime: &str) -> Result<ScanRecord> {
        let url = self.endpoints.analyze_url();
        tracing::debug!(%url, file_name, size = bytes.len(), "送信: 解析");

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let resp = self.authorized(self.http.post(&url).multipart(form)).send().await?;
        let body = check(resp).await?.text().await?;
        parse_scan_record(&body).map_err(FoodScanError::from_server)
    }

    /// 履歴（新しい順）
    pub async fn history(&self) -> Result<Vec<ScanRecord>> {
        let resp = self
            .authorized(self.http.get(self.endpoints.url(Endpoint::History)))
            .send()
            .await?;
        let body = check(resp).await?.text().await?;
        parse_history(&body).map_err(FoodScanError::from_server)
    }

    /// アップロード済み画像を取得
    pub async fn download(&self, filename: &str) -> Result<Vec<u8>> {
        let resp = self
            .authorized(self.http.get(self.endpoints.thumbnail_url(filename)))
            .send()
            .await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(FoodScanError::FileNotFound(filename.to_string()));
        }
        let bytes = check(resp).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.session {
            Some(session) => request.header(COOKIE, format!("{}={}", SESSION_COOKIE, session)),
            None => request,
        }
    }
}

/// ステータスを検査し、失敗を共通エラーへ変換する
async fn check(resp: Response) -> Result<Response> {
    let status = resp.status();

    if status.is_redirection() {
        let location = resp
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if is_login_redirect(&location) {
            return Err(FoodScanError::NotLoggedIn);
        }
        return Err(FoodScanError::from_server(food_scan_common::Error::Http {
            status: status.as_u16(),
            message: format!("unexpected redirect to {}", location),
        }));
    }

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "サーバがエラーを返しました");
        return Err(FoodScanError::from_server(food_scan_common::Error::from_status(
            status.as_u16(),
            &body,
        )));
    }

    Ok(resp)
}

/// フォームが再表示されたときの理由
fn rejection_message(endpoint: Endpoint) -> &'static str {
    match endpoint {
        Endpoint::Register => "ユーザ名が既に使われています",
        _ => "ユーザ名またはパスワードが正しくありません",
    }
}

/// `Set-Cookie: session=...; HttpOnly; Path=/` から値を取り出す
fn session_from_response(resp: &Response) -> Option<String> {
    resp.headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(parse_session_cookie)
}

fn parse_session_cookie(header: &str) -> Option<String> {
    let pair = header.split(';').next()?.trim();
    let (name, value) = pair.split_once('=')?;
    if name.trim() == SESSION_COOKIE && !value.trim().is_empty() {
        Some(value.trim().to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_session_cookie() {
        assert_eq!(
            parse_session_cookie("session=abc.def; HttpOnly; Path=/"),
            Some("abc.def".to_string())
        );
        assert_eq!(parse_session_cookie("remember_token=x; Path=/"), None);
        assert_eq!(parse_session_cookie("session=; Expires=Thu, 01 Jan 1970"), None);
    }
}
