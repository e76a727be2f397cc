//! チャットボット（仮）パネル

use leptos::prelude::*;
use crate::app::Scanner;

#[component]
pub fn ChatPanel(scanner: Scanner) -> impl IntoView {
    let (draft, set_draft) = signal(String::new());
    let messages = move || scanner.controller.with(|c| c.chat().messages().to_vec());

    let send = move || {
        let text = draft.get_untracked();
        if text.trim().is_empty() {
            return;
        }
        scanner.send_chat(text);
        set_draft.set(String::new());
    };

    view! {
        <div class="chatbot-page">
            <h2>"Nutrition Chatbot"</h2>
            <div id="chatMessages" class="chat-messages" node_ref=scanner.chat_log>
                {move || {
                    messages()
                        .into_iter()
                        .map(|message| {
                            view! {
                                <div class=format!("chat-message {}", message.sender.as_str())>
                                    <strong>{message.sender.label()}": "</strong>
                                    <span>{message.text}</span>
                                </div>
                            }
                        })
                        .collect_view()
                }}
            </div>
            <form
                class="chat-input"
                on:submit=move |ev| {
                    ev.prevent_default();
                    send();
                }
            >
                <input
                    type="text"
                    id="chatInput"
                    placeholder="Ask about your food..."
                    autocomplete="off"
                    prop:value=move || draft.get()
                    on:input=move |ev| set_draft.set(event_target_value(&ev))
                />
                <button type="submit" class="btn btn-primary">"Send"</button>
            </form>
        </div>
    }
}
