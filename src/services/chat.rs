//! 聊天服务
//!
//! 一轮聊天的完整流程：校验输入、调用模型（或返回 mock 回复）、解析动作，
//! 对已登录用户把支出写入交易记录。

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::interpreter::{ChatTurn, InterpretedReply, Mood, interpret};
use crate::llm::{LlmBackend, system_instruction};
use crate::models::transaction::Transaction;
use crate::models::user::User;
use crate::observability::AppMetrics;
use crate::security::validation::validators;
use crate::services::transaction::TransactionService;

/// mock 模式下的固定回复
pub fn mock_reply_text(health_score: i64) -> String {
    format!(
        "[MOCK] Please set a real GROQ_API_KEY in the backend .env file. Your score is {}.",
        health_score
    )
}

/// 一轮聊天的结果
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub reply: InterpretedReply,
    /// 本轮写入的交易
    pub recorded: Option<Transaction>,
}

/// 聊天服务 trait
#[async_trait]
pub trait ChatService: Send + Sync {
    /// 处理一轮聊天，`user` 为空时不写入交易
    async fn reply(&self, turn: &ChatTurn, user: Option<&User>) -> Result<ChatReply>;
}

/// 聊天服务实现
pub struct ChatServiceImpl {
    backend: LlmBackend,
    transactions: Arc<dyn TransactionService>,
    metrics: Arc<AppMetrics>,
}

impl ChatServiceImpl {
    pub fn new(
        backend: LlmBackend,
        transactions: Arc<dyn TransactionService>,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        Self {
            backend,
            transactions,
            metrics,
        }
    }

    /// 写入交易失败只记录日志
    async fn persist(&self, user: &User, reply: &InterpretedReply) -> Option<Transaction> {
        let action = reply.action.as_ref().filter(|a| a.amount > 0.0)?;

        match self.transactions.record_expense(&user.id, action).await {
            Ok(transaction) => {
                self.metrics.record_transaction();
                Some(transaction)
            }
            Err(e) => {
                error!("Failed to record expense for user {}: {}", user.id, e);
                None
            }
        }
    }
}

#[async_trait]
impl ChatService for ChatServiceImpl {
    async fn reply(&self, turn: &ChatTurn, user: Option<&User>) -> Result<ChatReply> {
        validators::validate_chat_message(&turn.user_message)?;

        let client = match &self.backend {
            LlmBackend::MockMode => {
                self.metrics.record_chat(true);
                debug!("Mock mode reply for score {}", turn.health_score);
                return Ok(ChatReply {
                    reply: InterpretedReply {
                        display_text: mock_reply_text(turn.health_score),
                        mood: Mood::from_health_score(turn.health_score),
                        action: None,
                    },
                    recorded: None,
                });
            }
            LlmBackend::Configured(client) => client,
        };
        self.metrics.record_chat(false);

        let instruction = system_instruction(turn.health_score, user.map(|u| u.username.as_str()));
        let raw = match client.complete(&instruction, &turn.user_message).await {
            Ok(raw) => raw,
            Err(e) => {
                self.metrics.record_llm_error();
                warn!("Completion failed: {}", e);
                return Err(e);
            }
        };

        let reply = interpret(&raw, turn.health_score);
        if let Some(action) = &reply.action {
            self.metrics.record_action();
            info!(
                "Extracted {} action: {} {}",
                action.action_type, action.amount, action.category
            );
        }

        let recorded = match user {
            Some(user) => self.persist(user, &reply).await,
            None => None,
        };

        Ok(ChatReply { reply, recorded })
    }
}

/// 创建聊天服务
pub fn create_chat_service(
    backend: LlmBackend,
    transactions: Arc<dyn TransactionService>,
    metrics: Arc<AppMetrics>,
) -> Box<dyn ChatService> {
    Box::new(ChatServiceImpl::new(backend, transactions, metrics))
}
