use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// 用户唯一标识
    pub id: String,
    /// 用户名
    pub username: String,
    /// 邮箱，全局唯一
    pub email: String,
    /// bcrypt 密码哈希
    pub password_hash: String,
    /// 注册时间
    pub created_at: DateTime<Utc>,
    /// 头像风格
    pub avatar_style: String,
    /// 货币
    pub currency: String,
}

impl User {
    /// 创建新用户，密码需已哈希
    pub fn new(username: &str, email: &str, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            created_at: Utc::now(),
            avatar_style: "default".to_string(),
            currency: "USD".to_string(),
        }
    }
}

/// 对外暴露的用户信息，不含密码哈希
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub avatar_style: String,
    pub currency: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
            avatar_style: user.avatar_style,
            currency: user.currency,
        }
    }
}
