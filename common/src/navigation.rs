//! ページ定義

/// 画面（タブ）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Page {
    #[default]
    Scan,
    History,
    Chatbot,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Scan, Page::History, Page::Chatbot];

    /// ページ要素のDOM id
    pub fn dom_id(&self) -> &'static str {
        match self {
            Page::Scan => "scanPage",
            Page::History => "historyPage",
            Page::Chatbot => "chatbotPage",
        }
    }

    /// ナビボタンのDOM id
    pub fn nav_id(&self) -> &'static str {
        match self {
            Page::Scan => "navScan",
            Page::History => "navHistory",
            Page::Chatbot => "navChatbot",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Scan => "Scan",
            Page::History => "History",
            Page::Chatbot => "Chatbot",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Page::Scan => "📷",
            Page::History => "🕘",
            Page::Chatbot => "💬",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_unique() {
        let mut ids: Vec<&str> = Page::ALL
            .iter()
            .flat_map(|p| [p.dom_id(), p.nav_id()])
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 6);
    }
}
