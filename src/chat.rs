//! 端末版チャット（ブラウザと同じ仮の返答）

use crate::error::Result;
use dialoguer::Input;
use food_scan_common::chat::topic_prompt;
use food_scan_common::{ChatLog, ChatMessage};

const EXIT_WORDS: &[&str] = &["exit", "quit", ":q"];

/// 対話ループ。`exit` か空入力で終了
pub fn run_repl(topic: Option<&str>) -> Result<()> {
    let mut log = ChatLog::with_greeting();
    print_messages(log.messages());

    if let Some(topic) = topic.map(str::trim).filter(|t| !t.is_empty()) {
        let shown = log.len();
        log.send(&topic_prompt(topic));
        print_messages(&log.messages()[shown..]);
    }

    loop {
        let line: String = Input::new()
            .with_prompt("You")
            .allow_empty(true)
            .interact_text()?;

        if is_exit(&line) {
            break;
        }

        let shown = log.len();
        if log.send(&line) {
            // ユーザ発言は入力欄に出ているので返答だけ表示
            print_messages(&log.messages()[shown + 1..]);
        }
    }

    Ok(())
}

fn is_exit(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || EXIT_WORDS.iter().any(|w| line.eq_ignore_ascii_case(w))
}

fn print_messages(messages: &[ChatMessage]) {
    for message in messages {
        println!("{}: {}", message.sender.label(), message.text);
    }
}
