//! 履歴一覧の表示状態とアクション振り分け
//!
//! 一覧の各項目はボタンに `data-action` などの属性を持ち、一覧コンテナ側の
//! クリックハンドラ1つで `HistoryAction::from_attributes` に渡して解決する。

use crate::types::ScanRecord;
use std::str::FromStr;

pub const EMPTY_HISTORY_MESSAGE: &str = "No scan history yet.";

pub const ATTR_ACTION: &str = "data-action";
pub const ATTR_FILENAME: &str = "data-filename";
pub const ATTR_VERDICT: &str = "data-verdict";
pub const ATTR_TOPIC: &str = "data-topic";

/// 履歴ページの表示状態
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HistoryView {
    #[default]
    Idle,
    Loading,
    Empty,
    Items(Vec<ScanRecord>),
    Failed(String),
}

impl HistoryView {
    /// 取得結果から表示状態を作る（全件置き換え）
    pub fn from_records(records: Vec<ScanRecord>) -> Self {
        if records.is_empty() {
            HistoryView::Empty
        } else {
            HistoryView::Items(records)
        }
    }

    /// 一覧の代わりに出すメッセージ
    pub fn message(&self) -> Option<&str> {
        match self {
            HistoryView::Loading => Some("Loading history..."),
            HistoryView::Empty => Some(EMPTY_HISTORY_MESSAGE),
            HistoryView::Failed(message) => Some(message),
            HistoryView::Idle | HistoryView::Items(_) => None,
        }
    }

    pub fn records(&self) -> &[ScanRecord] {
        match self {
            HistoryView::Items(records) => records,
            _ => &[],
        }
    }
}

/// 履歴項目のアクション種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Share,
    Chat,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Share => "share",
            ActionKind::Chat => "chat",
        }
    }
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DISPATCH
            .iter()
            .map(|(kind, _)| *kind)
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown history action: {}", s))
    }
}

/// 履歴項目で押されたアクション
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryAction {
    Share { filename: String, verdict: String },
    Chat { topic: String },
}

type ActionBuilder = fn(&dyn Fn(&str) -> Option<String>) -> Option<HistoryAction>;

/// アクション種別 → 属性からの組み立て
const DISPATCH: &[(ActionKind, ActionBuilder)] = &[
    (ActionKind::Share, build_share),
    (ActionKind::Chat, build_chat),
];

fn build_share(attr: &dyn Fn(&str) -> Option<String>) -> Option<HistoryAction> {
    Some(HistoryAction::Share {
        filename: attr(ATTR_FILENAME).filter(|f| !f.is_empty())?,
        verdict: attr(ATTR_VERDICT).unwrap_or_default(),
    })
}

fn build_chat(attr: &dyn Fn(&str) -> Option<String>) -> Option<HistoryAction> {
    Some(HistoryAction::Chat {
        topic: attr(ATTR_TOPIC).filter(|t| !t.trim().is_empty())?,
    })
}

impl HistoryAction {
    /// クリックされた要素の属性からアクションを組み立てる
    ///
    /// 未知の `data-action` や必須属性の欠落は `None`（クリックを無視）。
    pub fn from_attributes(attr: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let kind: ActionKind = attr(ATTR_ACTION)?.parse().ok()?;
        let attr: &dyn Fn(&str) -> Option<String> = &attr;
        DISPATCH
            .iter()
            .find(|(k, _)| *k == kind)
            .and_then(|(_, build)| build(attr))
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            HistoryAction::Share { .. } => ActionKind::Share,
            HistoryAction::Chat { .. } => ActionKind::Chat,
        }
    }
}

/// チャットボタンに載せる話題
pub fn chat_topic(record: &ScanRecord) -> String {
    if record.quick_verdict.trim().is_empty() {
        record.original_name().to_string()
    } else {
        record.quick_verdict.clone()
    }
}
