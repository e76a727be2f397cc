//! 解析中インジケータ

use leptos::prelude::*;

#[component]
pub fn Loader() -> impl IntoView {
    view! {
        <div class="loader-container">
            <div class="loader-spinner" />
            <p class="loader-text">"Analyzing your food..."</p>
        </div>
    }
}
