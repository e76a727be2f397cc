//! UIコンポーネント

pub mod header;
pub mod nav_bar;
pub mod scan_page;
pub mod upload_area;
pub mod loader;
pub mod result_panel;
pub mod history_list;
pub mod chat_panel;
