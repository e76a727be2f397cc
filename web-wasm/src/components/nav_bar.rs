//! 下部ナビゲーション

use leptos::prelude::*;
use food_scan_common::Page;
use crate::app::Scanner;

#[component]
pub fn NavBar(scanner: Scanner) -> impl IntoView {
    view! {
        <nav class="nav-bar">
            {Page::ALL
                .into_iter()
                .map(|page| {
                    let is_active = move || scanner.controller.with(|c| c.is_active(page));
                    view! {
                        <button
                            id=page.nav_id()
                            class="nav-btn"
                            class:active=is_active
                            on:click=move |_| scanner.navigate(page)
                        >
                            <span class="nav-icon">{page.icon()}</span>
                            <span class="nav-label">{page.title()}</span>
                        </button>
                    }
                })
                .collect_view()}
        </nav>
    }
}
