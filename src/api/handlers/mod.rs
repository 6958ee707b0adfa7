//! API 处理器

pub mod auth_handler;
pub mod chat_handler;
pub mod transaction_handler;
