//! 记账动作
//!
//! 模型在回复末尾追加的结构化动作，格式为：
//!
//! ```text
//! { "ACTION": {"type": "log_expense", "amount": 250, "category": "Food", "description": "Lunch at cafe"} }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 动作类型，目前只有记账一种
pub const LOG_EXPENSE: &str = "log_expense";

/// 未给出分类时使用的默认分类
pub const DEFAULT_CATEGORY: &str = "General";

/// 记账动作
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseAction {
    /// 固定为 "log_expense"
    #[serde(rename = "type")]
    pub action_type: String,
    pub amount: f64,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ExpenseAction {
    pub fn new(amount: f64, category: impl Into<String>, description: Option<String>) -> Self {
        Self {
            action_type: LOG_EXPENSE.to_string(),
            amount,
            category: category.into(),
            description,
        }
    }

    /// 从 `ACTION` 键下的 JSON 值构造动作，缺失或类型不符的字段取默认值
    ///
    /// 值不是对象时返回 `None`。
    pub fn from_value(value: &Value) -> Option<Self> {
        let fields = value.as_object()?;

        let amount = fields.get("amount").map(parse_amount).unwrap_or(0.0);

        let category = fields
            .get("category")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CATEGORY)
            .to_string();

        let description = fields.get("description").and_then(|d| match d {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        });

        Some(Self::new(amount, category, description))
    }
}

/// 金额可能是数字或数字字符串，无法解析时为 0
fn parse_amount(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed.filter(|a| a.is_finite()).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_action() {
        let action = ExpenseAction::from_value(&json!({
            "type": "log_expense",
            "amount": 250,
            "category": "Food",
            "description": "Lunch at cafe"
        }))
        .unwrap();

        assert_eq!(action.action_type, LOG_EXPENSE);
        assert_eq!(action.amount, 250.0);
        assert_eq!(action.category, "Food");
        assert_eq!(action.description.as_deref(), Some("Lunch at cafe"));
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let action = ExpenseAction::from_value(&json!({"type": "log_expense"})).unwrap();
        assert_eq!(action.amount, 0.0);
        assert_eq!(action.category, DEFAULT_CATEGORY);
        assert!(action.description.is_none());
    }

    #[test]
    fn test_unparseable_amount_and_empty_category() {
        let action = ExpenseAction::from_value(&json!({
            "amount": "a lot",
            "category": "  ",
            "description": null
        }))
        .unwrap();
        assert_eq!(action.amount, 0.0);
        assert_eq!(action.category, DEFAULT_CATEGORY);
        assert!(action.description.is_none());
    }

    #[test]
    fn test_numeric_string_amount() {
        let action = ExpenseAction::from_value(&json!({"amount": "99.5", "category": "Travel"})).unwrap();
        assert_eq!(action.amount, 99.5);
        assert_eq!(action.category, "Travel");
    }

    #[test]
    fn test_type_is_always_log_expense() {
        let action = ExpenseAction::from_value(&json!({"type": "something_else", "amount": 1})).unwrap();
        assert_eq!(action.action_type, LOG_EXPENSE);
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(ExpenseAction::from_value(&json!(42)).is_none());
        assert!(ExpenseAction::from_value(&json!("log_expense")).is_none());
    }

    #[test]
    fn test_serialization_omits_missing_description() {
        let action = ExpenseAction::new(10.0, "Food", None);
        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(value["type"], "log_expense");
        assert!(value.get("description").is_none());
    }
}
