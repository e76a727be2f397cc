//! バックエンドAPI呼び出し（fetch）
//!
//! セッションCookieで認証するので `credentials: same-origin` で送る。
//! 未ログイン時は401、またはログインページへのリダイレクトが返る。

use crate::dom::{network_error, window};
use food_scan_common::{
    is_login_redirect, ClientConfig, Endpoint, Error, ScanRecord, UPLOAD_FIELD,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, FormData, Request, RequestCredentials, RequestInit, Response};

/// 画像を解析エンドポイントへ送る
pub async fn analyze(config: &ClientConfig, image: &Blob, file_name: &str) -> Result<ScanRecord, Error> {
    let form = FormData::new().map_err(network_error)?;
    form.append_with_blob_and_filename(UPLOAD_FIELD, image, file_name)
        .map_err(network_error)?;

    let opts = RequestInit::new();
    opts.set_method(Endpoint::Analyze.method());
    opts.set_credentials(RequestCredentials::SameOrigin);
    opts.set_body(&form);

    let resp = send(&config.analyze_url(), &opts).await?;
    read_json(resp).await
}

/// 履歴を取得する
pub async fn fetch_history(config: &ClientConfig) -> Result<Vec<ScanRecord>, Error> {
    let opts = RequestInit::new();
    opts.set_method(Endpoint::History.method());
    opts.set_credentials(RequestCredentials::SameOrigin);

    let resp = send(&config.url(Endpoint::History), &opts).await?;
    read_json(resp).await
}

/// アップロード済み画像を取り直す（共有用）
pub async fn fetch_blob(url: &str) -> Result<Blob, Error> {
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_credentials(RequestCredentials::SameOrigin);

    let resp = send(url, &opts).await?;
    let blob = JsFuture::from(resp.blob().map_err(network_error)?)
        .await
        .map_err(network_error)?;
    blob.dyn_into::<Blob>()
        .map_err(|_| Error::InvalidResponse("image body is not a blob".to_string()))
}

/// リクエストを送り、失敗ステータスをエラーにする
async fn send(url: &str, opts: &RequestInit) -> Result<Response, Error> {
    let request = Request::new_with_str_and_init(url, opts).map_err(network_error)?;
    request
        .headers()
        .set("Accept", "application/json")
        .map_err(network_error)?;

    let resp_value = JsFuture::from(window()?.fetch_with_request(&request))
        .await
        .map_err(network_error)?;
    let resp: Response = resp_value
        .dyn_into()
        .map_err(|_| Error::InvalidResponse("not a fetch response".to_string()))?;

    if resp.redirected() && is_login_redirect(&resp.url()) {
        return Err(Error::Unauthenticated);
    }

    if !resp.ok() {
        let body = read_text(&resp).await.unwrap_or_default();
        return Err(Error::from_status(resp.status(), &body));
    }

    Ok(resp)
}

async fn read_json<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T, Error> {
    let json = JsFuture::from(resp.json().map_err(network_error)?)
        .await
        .map_err(|e| Error::InvalidResponse(crate::dom::js_message(&e)))?;
    serde_wasm_bindgen::from_value(json).map_err(|e| Error::InvalidResponse(e.to_string()))
}

async fn read_text(resp: &Response) -> Result<String, Error> {
    let text = JsFuture::from(resp.text().map_err(network_error)?)
        .await
        .map_err(network_error)?;
    Ok(text.as_string().unwrap_or_default())
}
