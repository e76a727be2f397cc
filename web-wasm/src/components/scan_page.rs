//! スキャンページ（カメラ/アップロード/結果）

use leptos::prelude::*;
use food_scan_common::CameraAffordance;
use crate::app::Scanner;
use crate::components::{loader::Loader, result_panel::ResultPanel, upload_area::UploadArea};

#[component]
pub fn ScanPage(scanner: Scanner) -> impl IntoView {
    let affordance = move || scanner.controller.with(|c| c.camera_affordance());
    let is_loading = move || scanner.controller.with(|c| c.is_loading());
    let result_visible = move || scanner.controller.with(|c| c.result_visible());
    let shows_video = move || {
        !result_visible() && affordance().map(|a| a.shows_video()).unwrap_or(false)
    };
    let can_capture = move || {
        scanner.controller.with(|c| c.has_camera_session()) && !is_loading()
    };

    view! {
        <div class="scan-page">
            // <video> は常に置いておき、ストリーム到着時に繋げるようにする
            <div class="camera-view" class:hidden=move || !shows_video()>
                <video
                    node_ref=scanner.video
                    class="camera-video"
                    autoplay=true
                    playsinline=true
                    prop:muted=true
                />
                <span class="camera-label">
                    {move || affordance().filter(|a| a.shows_video()).map(|a| a.label())}
                </span>
                <button
                    class="btn btn-primary capture-btn"
                    disabled=move || !can_capture()
                    on:click=move |_| scanner.capture()
                >
                    "📸 Capture"
                </button>
            </div>

            <Show when=move || !result_visible() && affordance().is_none() && !is_loading()>
                <p class="text-muted">"Starting camera..."</p>
            </Show>

            <Show when=move || !result_visible() && affordance() == Some(CameraAffordance::UploadFallback)>
                <p class="camera-fallback">{CameraAffordance::UploadFallback.label()}</p>
                <UploadArea scanner=scanner />
            </Show>

            <Show when=is_loading>
                <Loader />
            </Show>

            <Show when=result_visible>
                <ResultPanel scanner=scanner />
            </Show>
        </div>
    }
}
