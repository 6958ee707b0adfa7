//! DTO 模块
//!
//! 数据传输对象，用于 API 请求和响应的序列化。

pub mod auth_dto;
pub mod chat_dto;
pub mod transaction_dto;

pub use auth_dto::*;
pub use chat_dto::*;
pub use transaction_dto::*;
