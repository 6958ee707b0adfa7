//! 聊天 DTO
//!
//! 字段名与前端约定一致（`healthScore` 为驼峰）。

use serde::{Deserialize, Serialize};

use crate::interpreter::{ExpenseAction, InterpretedReply, Mood};

/// 未提供健康分时使用的默认值
pub const DEFAULT_HEALTH_SCORE: i64 = 85;

fn default_health_score() -> i64 {
    DEFAULT_HEALTH_SCORE
}

/// 聊天请求
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(rename = "healthScore", default = "default_health_score")]
    pub health_score: i64,
}

/// 聊天响应，`action` 缺失时序列化为 `null`
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub text: String,
    pub mood: Mood,
    pub action: Option<ExpenseAction>,
}

impl From<InterpretedReply> for ChatResponse {
    fn from(reply: InterpretedReply) -> Self {
        Self {
            text: reply.display_text,
            mood: reply.mood,
            action: reply.action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_score_defaults() {
        let request: ChatRequest = serde_json::from_str(r#"{"message":"hi"}"#).unwrap();
        assert_eq!(request.health_score, DEFAULT_HEALTH_SCORE);

        let request: ChatRequest =
            serde_json::from_str(r#"{"message":"hi","healthScore":12}"#).unwrap();
        assert_eq!(request.health_score, 12);
    }

    #[test]
    fn test_absent_action_serializes_as_null() {
        let response = ChatResponse {
            text: "hello".into(),
            mood: Mood::Neutral,
            action: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["mood"], "neutral");
        assert!(json["action"].is_null());
    }
}
