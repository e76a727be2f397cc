//! スキャン画面のコントローラ
//!
//! ページ切替・カメラ・解析・履歴・チャットの状態を1つの構造体で持つ。
//! DOMには触れず、各操作はホスト（ブラウザ/テスト）が実行する `Effect` を返す。
//! カメラストリームの型 `S` はホスト側が決める（ブラウザでは `MediaStream`）。

use crate::camera::{CameraAffordance, CameraFacing, CameraState};
use crate::chat::{topic_prompt, ChatLog};
use crate::endpoints::{ClientConfig, Endpoint, CAPTURE_FILE_NAME};
use crate::error::Error;
use crate::history::{HistoryAction, HistoryView};
use crate::navigation::Page;
use crate::share::SharePayload;
use crate::types::{NutrientImpact, ScanRecord};

pub const ANALYSIS_IN_PROGRESS_MESSAGE: &str = "An analysis is already in progress.";
pub const CAMERA_NOT_READY_MESSAGE: &str = "Camera is not ready yet.";

/// 画像の出どころ
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadSource {
    /// カメラ映像からの撮影
    Capture,
    /// ユーザが選んだファイル
    File { file_name: String },
}

impl UploadSource {
    pub fn file_name(&self) -> &str {
        match self {
            UploadSource::Capture => CAPTURE_FILE_NAME,
            UploadSource::File { file_name } => file_name,
        }
    }
}

/// ホストが実行する副作用
#[derive(Debug, PartialEq)]
pub enum Effect<S> {
    /// カメラ取得を開始する（背面 → 任意 → アップロード表示）
    StartCamera,
    /// ストリームの全トラックを止める
    StopCamera(S),
    FetchHistory,
    SubmitUpload(UploadSource),
    Share(SharePayload),
    Alert(String),
    Redirect(String),
    /// チャット欄を末尾までスクロール
    ScrollChat,
}

/// スキャン画面の状態
#[derive(Debug)]
pub struct ScanController<S> {
    config: ClientConfig,
    page: Page,
    camera: Option<S>,
    camera_state: CameraState,
    latest_report: Option<ScanRecord>,
    result_visible: bool,
    report_expanded: bool,
    in_flight: Option<UploadSource>,
    history: HistoryView,
    chat: ChatLog,
}

impl<S> ScanController<S> {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            page: Page::Scan,
            camera: None,
            camera_state: CameraState::Idle,
            latest_report: None,
            result_visible: false,
            report_expanded: false,
            in_flight: None,
            history: HistoryView::Idle,
            chat: ChatLog::with_greeting(),
        }
    }

    /// 初期表示（スキャンページを開く）
    pub fn start(&mut self) -> Vec<Effect<S>> {
        self.activate_page(Page::Scan)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // ============================================
    // ページ切替
    // ============================================

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn is_active(&self, page: Page) -> bool {
        self.page == page
    }

    /// 指定ページだけを有効にする
    ///
    /// スキャンページを離れるときはカメラを解放し、入るときはカメラを起動、
    /// 履歴ページに入るときは履歴を取り直す。
    pub fn activate_page(&mut self, page: Page) -> Vec<Effect<S>> {
        let mut effects = Vec::new();

        if page != Page::Scan {
            effects.extend(self.release_camera().map(Effect::StopCamera));
        }

        self.page = page;

        match page {
            Page::Scan => {
                if !self.result_visible {
                    effects.extend(self.request_camera());
                }
            }
            Page::History => {
                self.history = HistoryView::Loading;
                effects.push(Effect::FetchHistory);
            }
            Page::Chatbot => {}
        }

        effects
    }

    // ============================================
    // カメラ
    // ============================================

    pub fn camera_state(&self) -> &CameraState {
        &self.camera_state
    }

    pub fn has_camera_session(&self) -> bool {
        self.camera.is_some()
    }

    /// 表示すべきカメラ要素（取得中は `None`）
    pub fn camera_affordance(&self) -> Option<CameraAffordance> {
        self.camera_state.affordance()
    }

    /// カメラ取得成功
    ///
    /// 取得中に別ページへ移っていた場合、届いたストリームはその場で止める。
    pub fn camera_started(&mut self, facing: CameraFacing, stream: S) -> Vec<Effect<S>> {
        let wanted = self.page == Page::Scan
            && self.camera_state == CameraState::Requesting
            && self.camera.is_none();
        if !wanted {
            return vec![Effect::StopCamera(stream)];
        }

        self.camera = Some(stream);
        self.camera_state = CameraState::Live(facing);
        Vec::new()
    }

    /// 全段階で取得失敗。アップロード表示に切り替える
    pub fn camera_unavailable(&mut self, reason: impl Into<String>) {
        if self.camera_state == CameraState::Requesting {
            self.camera_state = CameraState::Unavailable(reason.into());
        }
    }

    /// カメラを手放す（ページ離脱・アンロード時）
    pub fn release_camera(&mut self) -> Option<S> {
        if !matches!(self.camera_state, CameraState::Unavailable(_)) {
            self.camera_state = CameraState::Idle;
        }
        self.camera.take()
    }

    fn request_camera(&mut self) -> Option<Effect<S>> {
        if self.camera.is_some() || self.camera_state == CameraState::Requesting {
            return None;
        }
        self.camera_state = CameraState::Requesting;
        Some(Effect::StartCamera)
    }

    // ============================================
    // 撮影・アップロード
    // ============================================

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// カメラ映像を撮影して送信する
    pub fn begin_capture(&mut self) -> Vec<Effect<S>> {
        if self.camera.is_none() {
            return vec![Effect::Alert(CAMERA_NOT_READY_MESSAGE.to_string())];
        }
        self.begin_analysis(UploadSource::Capture)
    }

    /// 選択ファイルを送信する
    pub fn begin_upload(&mut self, file_name: impl Into<String>) -> Vec<Effect<S>> {
        self.begin_analysis(UploadSource::File {
            file_name: file_name.into(),
        })
    }

    fn begin_analysis(&mut self, source: UploadSource) -> Vec<Effect<S>> {
        if self.in_flight.is_some() {
            return vec![Effect::Alert(ANALYSIS_IN_PROGRESS_MESSAGE.to_string())];
        }

        self.in_flight = Some(source.clone());
        self.result_visible = false;
        self.report_expanded = false;
        vec![Effect::SubmitUpload(source)]
    }

    /// 解析成功。結果を表示し、カメラを解放する
    pub fn analysis_succeeded(&mut self, record: ScanRecord) -> Vec<Effect<S>> {
        if self.in_flight.take().is_none() {
            return Vec::new();
        }

        self.latest_report = Some(record);
        self.result_visible = true;
        self.report_expanded = false;

        self.release_camera().map(Effect::StopCamera).into_iter().collect()
    }

    /// 解析失敗。ローダを消して通知し、スキャンページならカメラを再起動する
    pub fn analysis_failed(&mut self, error: &Error) -> Vec<Effect<S>> {
        self.in_flight = None;

        if error.is_unauthenticated() {
            return vec![Effect::Redirect(Endpoint::Login.path().to_string())];
        }

        let mut effects = vec![Effect::Alert(format!(
            "Error analyzing image: {}",
            error.user_message()
        ))];
        if self.page == Page::Scan {
            effects.extend(self.request_camera());
        }
        effects
    }

    /// 結果を閉じて次のスキャンへ
    pub fn scan_again(&mut self) -> Vec<Effect<S>> {
        self.result_visible = false;
        self.report_expanded = false;
        if self.page == Page::Scan {
            self.request_camera().into_iter().collect()
        } else {
            Vec::new()
        }
    }

    // ============================================
    // 結果表示
    // ============================================

    pub fn latest_report(&self) -> Option<&ScanRecord> {
        self.latest_report.as_ref()
    }

    pub fn result_visible(&self) -> bool {
        self.result_visible
    }

    pub fn verdict(&self) -> Option<&str> {
        self.latest_report.as_ref().map(|r| r.quick_verdict.as_str())
    }

    pub fn report_expanded(&self) -> bool {
        self.report_expanded
    }

    /// 詳細レポートの開閉。結果がなければ何もしない
    pub fn toggle_report(&mut self) -> bool {
        if self.latest_report.is_some() {
            self.report_expanded = !self.report_expanded;
        }
        self.report_expanded
    }

    /// 詳細レポートの行（レスポンスの順）
    pub fn report_rows(&self) -> &[NutrientImpact] {
        self.latest_report
            .as_ref()
            .map(|r| r.detailed_report.as_slice())
            .unwrap_or_default()
    }

    // ============================================
    // 履歴
    // ============================================

    pub fn history(&self) -> &HistoryView {
        &self.history
    }

    /// 履歴取得成功（取得中でなければ古い応答として捨てる）
    pub fn history_loaded(&mut self, records: Vec<ScanRecord>) {
        if self.history == HistoryView::Loading {
            self.history = HistoryView::from_records(records);
        }
    }

    pub fn history_failed(&mut self, error: &Error) -> Vec<Effect<S>> {
        if error.is_unauthenticated() {
            self.history = HistoryView::Idle;
            return vec![Effect::Redirect(Endpoint::Login.path().to_string())];
        }

        if self.history == HistoryView::Loading {
            self.history =
                HistoryView::Failed(format!("Could not load history: {}", error.user_message()));
        }
        Vec::new()
    }

    /// 履歴項目のボタン操作
    pub fn dispatch(&mut self, action: HistoryAction) -> Vec<Effect<S>> {
        match action {
            HistoryAction::Share { filename, verdict } => vec![Effect::Share(
                SharePayload::for_history_item(&self.config, &filename, &verdict),
            )],
            HistoryAction::Chat { topic } => self.chat_about(&topic),
        }
    }

    // ============================================
    // チャット
    // ============================================

    pub fn chat(&self) -> &ChatLog {
        &self.chat
    }

    pub fn send_chat(&mut self, text: &str) -> Vec<Effect<S>> {
        if self.chat.send(text) {
            vec![Effect::ScrollChat]
        } else {
            Vec::new()
        }
    }

    /// チャットページへ移り、話題についての質問を送る
    pub fn chat_about(&mut self, topic: &str) -> Vec<Effect<S>> {
        let mut effects = self.activate_page(Page::Chatbot);
        effects.extend(self.send_chat(&topic_prompt(topic)));
        effects
    }
}
