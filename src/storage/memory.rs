//! 内存存储
//!
//! 基于 DashMap 的仓储实现，进程重启后数据丢失。

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::transaction::Transaction;
use crate::models::user::User;
use crate::storage::repository::{TransactionRepository, UserRepository};

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

/// 内存用户仓储
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<DashMap<String, User>>,
    /// email key -> user id
    emails: Arc<DashMap<String, String>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> Result<User> {
        match self.emails.entry(email_key(&user.email)) {
            Entry::Occupied(_) => Err(AppError::Validation(
                "Email already registered".to_string(),
            )),
            Entry::Vacant(slot) => {
                slot.insert(user.id.clone());
                self.users.insert(user.id.clone(), user.clone());
                Ok(user.clone())
            }
        }
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.users.get(id).map(|u| u.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let Some(id) = self.emails.get(&email_key(email)).map(|id| id.value().clone()) else {
            return Ok(None);
        };
        self.get_by_id(&id).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .iter()
            .filter(|u| u.username == username)
            .min_by_key(|u| u.created_at)
            .map(|u| u.value().clone()))
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.users.len() as u64)
    }
}

/// 内存交易仓储
#[derive(Debug, Clone, Default)]
pub struct InMemoryTransactionRepository {
    /// user id -> transactions
    transactions: Arc<DashMap<String, Vec<Transaction>>>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn create(&self, transaction: &Transaction) -> Result<Transaction> {
        self.transactions
            .entry(transaction.user_id.clone())
            .or_default()
            .push(transaction.clone());
        Ok(transaction.clone())
    }

    async fn list_by_user(
        &self,
        user_id: &str,
        limit: usize,
        start: usize,
    ) -> Result<Vec<Transaction>> {
        let mut items = match self.transactions.get(user_id) {
            Some(list) => list.value().clone(),
            None => return Ok(vec![]),
        };

        items.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(items.into_iter().skip(start).take(limit).collect())
    }

    async fn count_by_user(&self, user_id: &str) -> Result<u64> {
        Ok(self
            .transactions
            .get(user_id)
            .map(|list| list.len() as u64)
            .unwrap_or(0))
    }
}
