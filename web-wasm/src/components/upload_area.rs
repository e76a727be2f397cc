//! アップロードエリアコンポーネント（カメラが使えない場合）

use leptos::html;
use leptos::prelude::*;
use web_sys::{DragEvent, File, FileList};
use crate::app::Scanner;

#[component]
pub fn UploadArea(scanner: Scanner) -> impl IntoView {
    let (is_dragover, set_is_dragover) = signal(false);
    let input_ref: NodeRef<html::Input> = NodeRef::new();
    let is_enabled = move || !scanner.controller.with(|c| c.is_loading());

    // 1回の解析に送るのは先頭の1枚だけ
    let handle_files = move |files: FileList| {
        if let Some(file) = first_image(&files) {
            scanner.upload_file(file);
        }
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(false);

        if !is_enabled() {
            return;
        }

        if let Some(files) = ev.data_transfer().and_then(|dt| dt.files()) {
            handle_files(files);
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        if is_enabled() {
            set_is_dragover.set(true);
        }
    };

    let on_dragleave = move |_: DragEvent| {
        set_is_dragover.set(false);
    };

    let on_click = move |_| {
        if !is_enabled() {
            return;
        }
        if let Some(input) = input_ref.get_untracked() {
            input.click();
        }
    };

    let on_change = move |ev: leptos::ev::Event| {
        let input: web_sys::HtmlInputElement = event_target(&ev);
        if let Some(files) = input.files() {
            handle_files(files);
        }
        // 同じファイルを選び直しても change が出るように
        input.set_value("");
    };

    view! {
        <div
            class=move || {
                let mut classes = vec!["upload-area"];
                if is_dragover.get() {
                    classes.push("dragover");
                }
                if !is_enabled() {
                    classes.push("disabled");
                }
                classes.join(" ")
            }
            on:drop=on_drop
            on:dragover=on_dragover
            on:dragleave=on_dragleave
            on:click=on_click
        >
            <input
                node_ref=input_ref
                type="file"
                accept="image/*"
                class="hidden"
                on:change=on_change
                on:click=|ev| ev.stop_propagation()
            />
            <div class="upload-icon">"📁"</div>
            <p>"Drop a photo here or click to choose one"</p>
            <p class="text-muted">"Supported formats: JPEG, PNG"</p>
        </div>
    }
}

fn first_image(files: &FileList) -> Option<File> {
    (0..files.length())
        .filter_map(|i| files.get(i))
        .find(|file| file.type_().starts_with("image/") || file.type_().is_empty())
}
