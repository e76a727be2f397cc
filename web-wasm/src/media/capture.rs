//! 映像の1フレームをJPEGにする

use crate::dom::{camera_error, document};
use food_scan_common::{Error, JPEG_QUALITY};
use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement};

/// 現在の映像フレームを画面外canvasに描き、JPEG（品質0.9）のBlobにする
pub async fn capture_frame(video: &HtmlVideoElement) -> Result<Blob, Error> {
    let (width, height) = (video.video_width(), video.video_height());
    if width == 0 || height == 0 {
        return Err(Error::Camera("video is not ready".to_string()));
    }

    let canvas: HtmlCanvasElement = document()?
        .create_element("canvas")
        .map_err(camera_error)?
        .dyn_into()
        .map_err(|_| Error::Camera("canvas is not available".to_string()))?;
    canvas.set_width(width);
    canvas.set_height(height);

    let context: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(camera_error)?
        .ok_or_else(|| Error::Camera("2d context is not available".to_string()))?
        .dyn_into()
        .map_err(|_| Error::Camera("2d context is not available".to_string()))?;
    context
        .draw_image_with_html_video_element(video, 0.0, 0.0)
        .map_err(camera_error)?;

    encode_jpeg(&canvas).await
}

/// `canvas.toBlob` をPromiseに包んで待つ
async fn encode_jpeg(canvas: &HtmlCanvasElement) -> Result<Blob, Error> {
    let promise = Promise::new(&mut |resolve, reject| {
        let on_reject = reject.clone();
        let callback = Closure::once_into_js(move |blob: JsValue| {
            let _ = if blob.is_null() {
                on_reject.call1(&JsValue::NULL, &JsValue::from_str("JPEG encoding failed"))
            } else {
                resolve.call1(&JsValue::NULL, &blob)
            };
        });

        if let Err(e) = canvas.to_blob_with_type_and_encoder_options(
            callback.unchecked_ref(),
            "image/jpeg",
            &JsValue::from_f64(JPEG_QUALITY),
        ) {
            let _ = reject.call1(&JsValue::NULL, &e);
        }
    });

    JsFuture::from(promise)
        .await
        .map_err(camera_error)?
        .dyn_into::<Blob>()
        .map_err(|_| Error::Camera("JPEG encoding failed".to_string()))
}
