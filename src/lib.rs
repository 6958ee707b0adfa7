//! FinTwin - 个人财务助手后端
//!
//! 根据用户的财务健康分调整语气与模型对话，并从模型回复中解析出
//! 结构化的记账动作。

pub mod api;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod llm;
pub mod models;
pub mod observability;
pub mod security;
pub mod services;
pub mod storage;
