//! カメラ取得（getUserMedia）
//!
//! 背面カメラ → 任意のカメラ の順に2回だけ試す。両方失敗したら呼び出し側が
//! ファイルアップロード表示に切り替える。

use crate::dom::{camera_error, window};
use food_scan_common::{CameraFacing, Error};
use js_sys::{Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlVideoElement, MediaDevices, MediaStream, MediaStreamConstraints, MediaStreamTrack};

/// カメラを取得する
pub async fn acquire() -> Result<(CameraFacing, MediaStream), Error> {
    let devices = window()?
        .navigator()
        .media_devices()
        .map_err(|_| Error::Camera("camera API is not available".to_string()))?;

    let mut last_error = None;
    for facing in CameraFacing::ACQUISITION_ORDER {
        match request(&devices, facing).await {
            Ok(stream) => return Ok((facing, stream)),
            Err(e) => {
                gloo::console::warn!(format!("camera {:?} unavailable: {}", facing, e));
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| Error::Camera("no camera found".to_string())))
}

async fn request(devices: &MediaDevices, facing: CameraFacing) -> Result<MediaStream, Error> {
    let constraints = MediaStreamConstraints::new();
    constraints.set_video(&video_constraint(facing)?);
    constraints.set_audio(&JsValue::FALSE);

    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(camera_error)?;
    let stream = JsFuture::from(promise).await.map_err(camera_error)?;

    stream
        .dyn_into::<MediaStream>()
        .map_err(|_| Error::Camera("unexpected media stream".to_string()))
}

/// `{ facingMode: { exact: "environment" } }` または `true`
fn video_constraint(facing: CameraFacing) -> Result<JsValue, Error> {
    let Some(mode) = facing.facing_mode() else {
        return Ok(JsValue::TRUE);
    };

    let exact = Object::new();
    Reflect::set(&exact, &"exact".into(), &mode.into()).map_err(camera_error)?;
    let video = Object::new();
    Reflect::set(&video, &"facingMode".into(), &exact).map_err(camera_error)?;
    Ok(video.into())
}

/// 映像要素にストリームを繋いで再生
pub fn attach(video: &HtmlVideoElement, stream: &MediaStream) {
    video.set_src_object(Some(stream));
    if let Err(e) = video.play() {
        gloo::console::warn!(format!("video playback failed: {:?}", e));
    }
}

/// 全トラックを止める
pub fn stop_stream(stream: &MediaStream) {
    for track in stream.get_tracks().iter() {
        if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
            track.stop();
        }
    }
}
