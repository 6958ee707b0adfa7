use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::interpreter::ExpenseAction;

/// 交易记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// 交易唯一标识
    pub id: String,
    /// 所属用户 ID
    pub user_id: String,
    /// 金额
    pub amount: f64,
    /// 分类
    pub category: String,
    /// 描述
    pub description: Option<String>,
    /// 发生时间
    pub date: DateTime<Utc>,
    /// 是否为周期性支出
    pub is_recurring: bool,
}

impl Transaction {
    /// 创建新交易
    pub fn new(user_id: &str, amount: f64, category: &str, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            amount,
            category: category.to_string(),
            description,
            date: Utc::now(),
            is_recurring: false,
        }
    }

    /// 从聊天中解析出的记账动作创建交易
    pub fn from_action(user_id: &str, action: &ExpenseAction) -> Self {
        Self::new(
            user_id,
            action.amount,
            &action.category,
            action.description.clone(),
        )
    }
}
