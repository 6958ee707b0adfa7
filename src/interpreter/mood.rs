//! 情绪分类
//!
//! 情绪只由健康分决定，与消息内容和模型输出无关。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 低于该分数为 stressed
pub const STRESSED_BELOW: i64 = 40;
/// 高于该分数为 happy
pub const HAPPY_ABOVE: i64 = 80;

/// 助手情绪
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Stressed,
    Neutral,
    Happy,
}

impl Mood {
    /// 根据健康分计算情绪，边界值 40 和 80 均为 neutral
    pub fn from_health_score(score: i64) -> Self {
        if score < STRESSED_BELOW {
            Mood::Stressed
        } else if score > HAPPY_ABOVE {
            Mood::Happy
        } else {
            Mood::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Stressed => "stressed",
            Mood::Neutral => "neutral",
            Mood::Happy => "happy",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(i64::MIN, Mood::Stressed)]
    #[case(-5, Mood::Stressed)]
    #[case(0, Mood::Stressed)]
    #[case(39, Mood::Stressed)]
    #[case(40, Mood::Neutral)]
    #[case(62, Mood::Neutral)]
    #[case(80, Mood::Neutral)]
    #[case(81, Mood::Happy)]
    #[case(100, Mood::Happy)]
    #[case(i64::MAX, Mood::Happy)]
    fn test_mood_thresholds(#[case] score: i64, #[case] expected: Mood) {
        assert_eq!(Mood::from_health_score(score), expected);
    }

    #[test]
    fn test_mood_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Mood::Stressed).unwrap(), "\"stressed\"");
        assert_eq!(Mood::Happy.to_string(), "happy");
    }
}
