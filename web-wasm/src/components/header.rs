//! ヘッダーコンポーネント

use leptos::prelude::*;
use food_scan_common::Endpoint;

#[component]
pub fn Header() -> impl IntoView {
    let username = crate::dom::username();

    view! {
        <header class="header">
            <h1>"🥗 Food Scanner"</h1>
            <div class="header-user">
                {username.map(|name| view! { <span class="username">{format!("Hi, {}", name)}</span> })}
                <a href=Endpoint::Logout.path() class="btn btn-small btn-tertiary">"Log out"</a>
            </div>
        </header>
    }
}
