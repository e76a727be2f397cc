//! バックエンド連携

pub mod client;
pub mod share;
