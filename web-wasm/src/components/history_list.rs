//! 履歴一覧
//!
//! 項目ごとにハンドラを付けず、`<ul>` のクリック1つで `data-action` を見て振り分ける。

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, MouseEvent};
use food_scan_common::history::ATTR_ACTION;
use food_scan_common::{chat_topic, ActionKind, HistoryAction, ScanRecord};
use crate::app::Scanner;

#[component]
pub fn HistoryList(scanner: Scanner) -> impl IntoView {
    let message = move || {
        scanner
            .controller
            .with(|c| c.history().message().map(str::to_string))
    };
    let records = move || scanner.controller.with(|c| c.history().records().to_vec());

    let on_click = move |ev: MouseEvent| {
        let Some(target) = ev.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        let Ok(Some(button)) = target.closest(&format!("[{}]", ATTR_ACTION)) else {
            return;
        };
        if let Some(action) = HistoryAction::from_attributes(|name| button.get_attribute(name)) {
            scanner.dispatch(action);
        }
    };

    view! {
        <div class="history-page">
            <h2>"Scan History"</h2>
            {move || message().map(|text| view! { <p class="history-message">{text}</p> })}
            <ul id="historyList" class="history-list" on:click=on_click>
                <For
                    each=records
                    key=|record| format!("{}|{}", record.filename, record.timestamp)
                    children=move |record| view! { <HistoryItem record=record /> }
                />
            </ul>
        </div>
    }
}

#[component]
fn HistoryItem(record: ScanRecord) -> impl IntoView {
    let topic = chat_topic(&record);
    let thumbnail = record.thumbnail_path();

    view! {
        <li class="history-item">
            <img class="history-thumb" src=thumbnail alt=record.original_name().to_string() loading="lazy" />
            <div class="history-info">
                <span class="history-time">{record.timestamp.clone()}</span>
                <p class="history-verdict">{record.quick_verdict.clone()}</p>
            </div>
            <div class="history-actions">
                <button
                    class="btn btn-small btn-secondary"
                    data-action=ActionKind::Share.as_str()
                    data-filename=record.filename.clone()
                    data-verdict=record.quick_verdict.clone()
                >
                    "Share"
                </button>
                <button
                    class="btn btn-small btn-tertiary"
                    data-action=ActionKind::Chat.as_str()
                    data-topic=topic
                >
                    "Ask chatbot"
                </button>
            </div>
        </li>
    }
}
