use async_trait::async_trait;

use crate::error::Result;
use crate::models::transaction::Transaction;
use crate::models::user::User;

/// 用户仓储 trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 创建用户，邮箱已存在时返回验证错误
    async fn create(&self, user: &User) -> Result<User>;

    /// 根据 ID 获取用户
    async fn get_by_id(&self, id: &str) -> Result<Option<User>>;

    /// 根据邮箱获取用户（不区分大小写）
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// 根据用户名获取用户，重名时返回最早注册的
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// 统计数量
    async fn count(&self) -> Result<u64>;
}

/// 交易仓储 trait
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// 创建交易
    async fn create(&self, transaction: &Transaction) -> Result<Transaction>;

    /// 按用户列出交易，按时间倒序
    async fn list_by_user(&self, user_id: &str, limit: usize, start: usize)
    -> Result<Vec<Transaction>>;

    /// 按用户统计数量
    async fn count_by_user(&self, user_id: &str) -> Result<u64>;
}
