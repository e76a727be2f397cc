//! food-scan: 食品パッケージ解析サーバのCLIクライアント

pub mod cache;
pub mod chat;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod image_prep;
pub mod report;
pub mod scanner;
pub mod share;
