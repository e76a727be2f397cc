//! DOMまわりの小道具

use food_scan_common::Error;
use wasm_bindgen::prelude::*;
use web_sys::{Document, DomException, Window};

pub fn window() -> Result<Window, Error> {
    web_sys::window().ok_or_else(|| Error::Config("window is not available".to_string()))
}

pub fn document() -> Result<Document, Error> {
    window()?
        .document()
        .ok_or_else(|| Error::Config("document is not available".to_string()))
}

/// ブロッキングのalert
pub fn alert(message: &str) {
    if let Ok(window) = window() {
        let _ = window.alert_with_message(message);
    }
}

/// 別ページへ遷移（ログインページなど）
pub fn redirect(path: &str) {
    if let Ok(window) = window() {
        if let Err(e) = window.location().set_href(path) {
            gloo::console::warn!(format!("redirect to {} failed: {}", path, js_message(&e)));
        }
    }
}

/// `<body data-username="...">` からログイン中のユーザ名を読む
pub fn username() -> Option<String> {
    document()
        .ok()?
        .body()?
        .get_attribute("data-username")
        .filter(|name| !name.trim().is_empty())
}

/// JSの例外値から読める文字列を取り出す
pub fn js_message(value: &JsValue) -> String {
    if let Some(exception) = value.dyn_ref::<DomException>() {
        return format!("{}: {}", exception.name(), exception.message());
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// ユーザが共有シートなどを閉じた場合の `AbortError`
pub fn is_abort(value: &JsValue) -> bool {
    value
        .dyn_ref::<DomException>()
        .map(|e| e.name() == "AbortError")
        .unwrap_or(false)
}

/// fetch等の失敗をネットワークエラーに
pub fn network_error(value: JsValue) -> Error {
    Error::Network(js_message(&value))
}

/// getUserMedia等の失敗をカメラエラーに
pub fn camera_error(value: JsValue) -> Error {
    Error::Camera(js_message(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_js_message_from_string() {
        assert_eq!(js_message(&JsValue::from_str("boom")), "boom");
    }

    #[wasm_bindgen_test]
    fn test_js_message_from_error() {
        let error = js_sys::Error::new("bad thing");
        assert_eq!(js_message(&error.into()), "bad thing");
    }

    #[wasm_bindgen_test]
    fn test_abort_error_detected() {
        let abort = DomException::new_with_message_and_name("cancelled", "AbortError")
            .expect("DOMException生成失敗");
        assert!(is_abort(&abort.into()));
        assert!(!is_abort(&JsValue::from_str("AbortError")));
    }
}
