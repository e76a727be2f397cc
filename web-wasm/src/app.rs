//! メインアプリケーションコンポーネント
//!
//! 状態は `ScanController` が持ち、ここではコントローラが返す `Effect` を
//! ブラウザ上で実行する。

use leptos::html;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{File, MediaStream};

use crate::api::client;
use crate::api::share::{self, ShareOutcome};
use crate::components::{
    chat_panel::ChatPanel, header::Header, history_list::HistoryList, nav_bar::NavBar,
    scan_page::ScanPage,
};
use crate::dom;
use crate::media::{camera, capture};
use food_scan_common::share::SHARE_UNSUPPORTED_MESSAGE;
use food_scan_common::{
    ClientConfig, Effect as ScanEffect, HistoryAction, Page, ScanController, SharePayload, UploadSource,
    CAPTURE_FILE_NAME,
};

pub type Controller = ScanController<MediaStream>;

/// 画面全体で共有するハンドル（Copy）
#[derive(Clone, Copy)]
pub struct Scanner {
    pub controller: RwSignal<Controller, LocalStorage>,
    pub video: NodeRef<html::Video>,
    pub chat_log: NodeRef<html::Div>,
    pending_file: StoredValue<Option<File>, LocalStorage>,
}

impl Scanner {
    fn new(config: ClientConfig) -> Self {
        Self {
            controller: RwSignal::new_local(ScanController::new(config)),
            video: NodeRef::new(),
            chat_log: NodeRef::new(),
            pending_file: StoredValue::new_local(None),
        }
    }

    /// コントローラを更新し、返ってきた副作用を実行する
    fn run(self, f: impl FnOnce(&mut Controller) -> Vec<ScanEffect<MediaStream>>) {
        let effects = self.controller.try_update(f).unwrap_or_default();
        self.apply(effects);
    }

    fn config(self) -> ClientConfig {
        self.controller.with_untracked(|c| c.config().clone())
    }

    // ============================================
    // UIからの操作
    // ============================================

    pub fn start(self) {
        self.run(|c| c.start());
    }

    pub fn navigate(self, page: Page) {
        self.run(|c| c.activate_page(page));
    }

    pub fn capture(self) {
        self.run(|c| c.begin_capture());
    }

    pub fn upload_file(self, file: File) {
        let file_name = file.name();
        self.pending_file.set_value(Some(file));
        self.run(|c| c.begin_upload(file_name));
    }

    pub fn toggle_report(self) {
        self.controller.update(|c| {
            c.toggle_report();
        });
    }

    pub fn scan_again(self) {
        self.run(|c| c.scan_again());
    }

    pub fn dispatch(self, action: HistoryAction) {
        self.run(|c| c.dispatch(action));
    }

    pub fn send_chat(self, text: String) {
        self.run(|c| c.send_chat(&text));
    }

    // ============================================
    // 副作用の実行
    // ============================================

    fn apply(self, effects: Vec<ScanEffect<MediaStream>>) {
        for effect in effects {
            match effect {
                ScanEffect::StartCamera => self.start_camera(),
                ScanEffect::StopCamera(stream) => self.stop_camera(&stream),
                ScanEffect::FetchHistory => self.fetch_history(),
                ScanEffect::SubmitUpload(source) => self.submit(source),
                ScanEffect::Share(payload) => self.share(payload),
                ScanEffect::Alert(message) => dom::alert(&message),
                ScanEffect::Redirect(path) => dom::redirect(&path),
                ScanEffect::ScrollChat => self.scroll_chat(),
            }
        }
    }

    fn start_camera(self) {
        spawn_local(async move {
            match camera::acquire().await {
                Ok((facing, stream)) => {
                    let effects = self
                        .controller
                        .try_update(|c| c.camera_started(facing, stream.clone()))
                        .unwrap_or_default();
                    if effects.is_empty() {
                        if let Some(video) = self.video.get_untracked() {
                            camera::attach(&video, &stream);
                        }
                    }
                    self.apply(effects);
                }
                Err(e) => {
                    gloo::console::warn!(format!("falling back to file upload: {}", e));
                    self.controller.update(|c| c.camera_unavailable(e.to_string()));
                }
            }
        });
    }

    fn stop_camera(self, stream: &MediaStream) {
        camera::stop_stream(stream);
        if let Some(video) = self.video.get_untracked() {
            let attached = video
                .src_object()
                .map(|current| current == *stream)
                .unwrap_or(false);
            if attached {
                video.set_src_object(None);
            }
        }
    }

    fn submit(self, source: UploadSource) {
        spawn_local(async move {
            let config = self.config();
            let result = match &source {
                UploadSource::Capture => match self.video.get_untracked() {
                    Some(video) => match capture::capture_frame(&video).await {
                        Ok(blob) => client::analyze(&config, &blob, CAPTURE_FILE_NAME).await,
                        Err(e) => Err(e),
                    },
                    None => Err(food_scan_common::Error::Camera("video element missing".to_string())),
                },
                UploadSource::File { file_name } => {
                    let mut file = None;
                    self.pending_file.update_value(|pending| file = pending.take());
                    match file {
                        Some(file) => client::analyze(&config, &file, file_name).await,
                        None => Err(food_scan_common::Error::Config("no file selected".to_string())),
                    }
                }
            };

            match result {
                Ok(record) => {
                    gloo::console::log!(format!("analysis finished: {}", record.filename));
                    self.run(|c| c.analysis_succeeded(record));
                }
                Err(e) => {
                    gloo::console::warn!(format!("analysis failed: {}", e));
                    self.run(|c| c.analysis_failed(&e));
                }
            }
        });
    }

    fn fetch_history(self) {
        spawn_local(async move {
            match client::fetch_history(&self.config()).await {
                Ok(records) => self.controller.update(|c| c.history_loaded(records)),
                Err(e) => {
                    gloo::console::warn!(format!("history fetch failed: {}", e));
                    self.run(|c| c.history_failed(&e));
                }
            }
        });
    }

    fn share(self, payload: SharePayload) {
        spawn_local(async move {
            match share::share(&payload).await {
                Ok(ShareOutcome::Unsupported) => dom::alert(SHARE_UNSUPPORTED_MESSAGE),
                Ok(_) => {}
                Err(e) => {
                    gloo::console::warn!(format!("share failed: {}", e));
                    dom::alert(&format!("Could not share this scan: {}", e.user_message()));
                }
            }
        });
    }

    fn scroll_chat(self) {
        let chat_log = self.chat_log;
        request_animation_frame(move || {
            if let Some(el) = chat_log.get_untracked() {
                el.set_scroll_top(el.scroll_height());
            }
        });
    }
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let scanner = Scanner::new(ClientConfig::same_origin());
    let page = move || scanner.controller.with(|c| c.page());

    // マウント後にスキャンページを開く（カメラ起動）
    Effect::new(move |_| scanner.start());

    view! {
        <div class="container">
            <Header />

            <main>
                <section id=Page::Scan.dom_id() class="page" class:active=move || page() == Page::Scan>
                    <ScanPage scanner=scanner />
                </section>
                <section id=Page::History.dom_id() class="page" class:active=move || page() == Page::History>
                    <HistoryList scanner=scanner />
                </section>
                <section id=Page::Chatbot.dom_id() class="page" class:active=move || page() == Page::Chatbot>
                    <ChatPanel scanner=scanner />
                </section>
            </main>

            <NavBar scanner=scanner />
        </div>
    }
}
