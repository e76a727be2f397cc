//! チャットボット（仮実装）
//!
//! バックエンドには問い合わせず、固定の返答を追加するだけ。

pub const GREETING: &str = "Hi! Ask me anything about the food you scanned.";
pub const PLACEHOLDER_REPLY: &str =
    "Thanks for your question! Our AI nutrition assistant is coming soon.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Bot => "Bot",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    pub fn with_greeting() -> Self {
        Self {
            messages: vec![ChatMessage {
                sender: Sender::Bot,
                text: GREETING.to_string(),
            }],
        }
    }

    /// ユーザ発言と固定返答を追加する。空白のみなら何もしない
    pub fn send(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }

        self.messages.push(ChatMessage {
            sender: Sender::User,
            text: text.to_string(),
        });
        self.messages.push(ChatMessage {
            sender: Sender::Bot,
            text: PLACEHOLDER_REPLY.to_string(),
        });
        true
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// 履歴の「チャット」ボタンから送る文面
pub fn topic_prompt(topic: &str) -> String {
    format!("Tell me more about: {}", topic.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_appends_user_and_reply() {
        let mut log = ChatLog::default();
        assert!(log.send("  Is sugar bad?  "));

        assert_eq!(log.len(), 2);
        assert_eq!(log.messages()[0].sender, Sender::User);
        assert_eq!(log.messages()[0].text, "Is sugar bad?");
        assert_eq!(log.messages()[1].sender, Sender::Bot);
        assert_eq!(log.messages()[1].text, PLACEHOLDER_REPLY);
    }

    #[test]
    fn test_send_blank_ignored() {
        let mut log = ChatLog::with_greeting();
        assert!(!log.send("   "));
        assert_eq!(log.len(), 1);
        assert_eq!(log.last().map(|m| m.sender), Some(Sender::Bot));
    }

    #[test]
    fn test_topic_prompt() {
        assert_eq!(topic_prompt(" High sodium "), "Tell me more about: High sodium");
    }
}
