//! Web Share API
//!
//! `navigator.share` は web-sys では不安定API扱いなので Reflect で呼ぶ。

use crate::api::client::fetch_blob;
use crate::dom::{is_abort, js_message, window};
use food_scan_common::{Error, SharePayload};
use js_sys::{Array, Function, Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FilePropertyBag, Navigator};

/// 共有の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    /// ユーザが共有シートを閉じた
    Cancelled,
    /// ブラウザが共有に未対応
    Unsupported,
}

/// 画像を取り直して共有シートを開く
pub async fn share(payload: &SharePayload) -> Result<ShareOutcome, Error> {
    let navigator = window()?.navigator();
    let Some(share_fn) = navigator_fn(&navigator, "share") else {
        return Ok(ShareOutcome::Unsupported);
    };

    let blob = fetch_blob(&payload.image_url).await?;
    let options = FilePropertyBag::new();
    options.set_type(payload.mime_type());
    let file = File::new_with_blob_sequence_and_options(
        &Array::of1(&blob),
        &payload.file_name,
        &options,
    )
    .map_err(share_error)?;

    let data = Object::new();
    set(&data, "title", &payload.title.as_str().into())?;
    set(&data, "text", &payload.text.as_str().into())?;
    set(&data, "files", &Array::of1(&file))?;

    // ファイル共有に未対応ならテキストだけ送る
    if !can_share(&navigator, &data) {
        Reflect::delete_property(&data, &"files".into()).map_err(share_error)?;
    }

    let promise: Promise = share_fn
        .call1(&navigator, &data)
        .map_err(share_error)?
        .dyn_into()
        .map_err(|_| Error::InvalidResponse("navigator.share did not return a promise".to_string()))?;

    match JsFuture::from(promise).await {
        Ok(_) => Ok(ShareOutcome::Shared),
        Err(e) if is_abort(&e) => Ok(ShareOutcome::Cancelled),
        Err(e) => Err(share_error(e)),
    }
}

fn navigator_fn(navigator: &Navigator, name: &str) -> Option<Function> {
    Reflect::get(navigator, &name.into())
        .ok()
        .and_then(|f| f.dyn_into::<Function>().ok())
}

fn can_share(navigator: &Navigator, data: &Object) -> bool {
    navigator_fn(navigator, "canShare")
        .and_then(|f| f.call1(navigator, data).ok())
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
}

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), Error> {
    Reflect::set(target, &key.into(), value)
        .map(|_| ())
        .map_err(share_error)
}

fn share_error(value: JsValue) -> Error {
    Error::InvalidResponse(format!("share failed: {}", js_message(&value)))
}
