//! 回复解析模块
//!
//! 将模型生成的原始文本拆分为展示文本和可选的结构化记账动作，并根据健康分
//! 计算情绪。解析永远不会失败：动作块损坏时退回到未拆分的原始文本。
//!
//! 动作块的识别依赖与模型约定的字面量 `{ "ACTION":`（左花括号后有一个空格）。
//! 模型输出 `{"ACTION":` 这类空白不同的写法时不会被识别，整段文本原样展示。

pub mod action;
pub mod mood;

pub use action::{DEFAULT_CATEGORY, ExpenseAction, LOG_EXPENSE};
pub use mood::Mood;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// 判断是否存在动作的标记
pub const ACTION_MARKER: &str = "\"ACTION\":";

/// 动作块的起始字面量，取最后一次出现的位置
pub const ACTION_OPENING: &str = "{ \"ACTION\":";

/// 单轮聊天输入
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub user_message: String,
    pub health_score: i64,
}

/// 解析后的回复
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpretedReply {
    pub display_text: String,
    pub mood: Mood,
    pub action: Option<ExpenseAction>,
}

/// 动作片段的解析结果
#[derive(Debug)]
enum FragmentParse {
    /// 原样解析成功
    Parsed(Value),
    /// 补全右花括号后解析成功
    Repaired(Value),
    Failed(serde_json::Error),
}

/// 解析一轮模型输出
pub fn interpret(raw_text: &str, health_score: i64) -> InterpretedReply {
    let mood = Mood::from_health_score(health_score);
    let (display_text, action) = extract_action(raw_text);

    InterpretedReply {
        display_text,
        mood,
        action,
    }
}

/// 拆分展示文本与动作
fn extract_action(raw_text: &str) -> (String, Option<ExpenseAction>) {
    if !raw_text.contains(ACTION_MARKER) {
        return (raw_text.to_string(), None);
    }

    let Some(start) = raw_text.rfind(ACTION_OPENING) else {
        debug!("action marker present without opening token, leaving reply unsplit");
        return (raw_text.to_string(), None);
    };

    let display_text = raw_text[..start].trim();
    let fragment = raw_text[start..].trim();

    let envelope = match parse_fragment(fragment) {
        FragmentParse::Parsed(value) => value,
        FragmentParse::Repaired(value) => {
            debug!("action block parsed after closing unbalanced braces");
            value
        }
        FragmentParse::Failed(e) => {
            warn!(error = %e, fragment, "failed to parse action block, returning raw reply");
            return (raw_text.to_string(), None);
        }
    };

    let action = match envelope.get("ACTION") {
        Some(value) => {
            let action = ExpenseAction::from_value(value);
            if action.is_none() {
                debug!("ACTION value is not an object, ignoring");
            }
            action
        }
        None => None,
    };

    (display_text.to_string(), action)
}

/// 先严格解析；失败且片段不以 `}` 结尾时补全右花括号再试一次
fn parse_fragment(fragment: &str) -> FragmentParse {
    let first_error = match serde_json::from_str::<Value>(fragment) {
        Ok(value) => return FragmentParse::Parsed(value),
        Err(e) => e,
    };

    if fragment.ends_with('}') {
        return FragmentParse::Failed(first_error);
    }

    let mut repaired = String::with_capacity(fragment.len() + 2);
    repaired.push_str(fragment);
    for _ in 0..unclosed_braces(fragment).max(1) {
        repaired.push('}');
    }

    match serde_json::from_str::<Value>(&repaired) {
        Ok(value) => FragmentParse::Repaired(value),
        Err(e) => FragmentParse::Failed(e),
    }
}

/// 统计字符串字面量之外未闭合的 `{` 数量
fn unclosed_braces(fragment: &str) -> usize {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for c in fragment.chars() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    depth
}
