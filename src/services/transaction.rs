//! 交易服务
//!
//! 手动记账、从聊天动作记账以及分页查询。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::Result;
use crate::interpreter::{DEFAULT_CATEGORY, ExpenseAction};
use crate::models::transaction::Transaction;
use crate::security::validation::validators;
use crate::storage::repository::TransactionRepository;

/// 手动创建交易的参数
#[derive(Debug, Clone, Default)]
pub struct NewTransaction {
    pub amount: f64,
    pub category: Option<String>,
    pub description: Option<String>,
    pub is_recurring: bool,
}

/// 分页查询结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub total: u64,
    pub page: usize,
    pub page_size: usize,
}

/// 交易服务 trait
#[async_trait]
pub trait TransactionService: Send + Sync {
    /// 记录聊天中解析出的支出
    async fn record_expense(&self, user_id: &str, action: &ExpenseAction) -> Result<Transaction>;

    /// 手动创建交易
    async fn create(&self, user_id: &str, request: NewTransaction) -> Result<Transaction>;

    /// 分页列出用户交易，页码从 1 开始
    async fn list(&self, user_id: &str, page: usize, page_size: usize) -> Result<TransactionPage>;
}

/// 交易服务实现
pub struct TransactionServiceImpl {
    repository: Arc<dyn TransactionRepository>,
}

impl TransactionServiceImpl {
    pub fn new(repository: Arc<dyn TransactionRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl TransactionService for TransactionServiceImpl {
    async fn record_expense(&self, user_id: &str, action: &ExpenseAction) -> Result<Transaction> {
        validators::validate_amount(action.amount)?;

        let transaction = self
            .repository
            .create(&Transaction::from_action(user_id, action))
            .await?;

        info!(
            "Recorded expense {} ({} {}) for user {}",
            transaction.id, transaction.amount, transaction.category, user_id
        );
        Ok(transaction)
    }

    async fn create(&self, user_id: &str, request: NewTransaction) -> Result<Transaction> {
        validators::validate_amount(request.amount)?;

        let category = request
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CATEGORY);

        let mut transaction =
            Transaction::new(user_id, request.amount, category, request.description);
        transaction.is_recurring = request.is_recurring;

        let created = self.repository.create(&transaction).await?;
        debug!("Created transaction {} for user {}", created.id, user_id);
        Ok(created)
    }

    async fn list(&self, user_id: &str, page: usize, page_size: usize) -> Result<TransactionPage> {
        let start = validators::page_offset(page, page_size)?;
        let transactions = self
            .repository
            .list_by_user(user_id, page_size, start)
            .await?;
        let total = self.repository.count_by_user(user_id).await?;

        Ok(TransactionPage {
            transactions,
            total,
            page,
            page_size,
        })
    }
}

/// 创建交易服务
pub fn create_transaction_service(
    repository: Arc<dyn TransactionRepository>,
) -> Box<dyn TransactionService> {
    Box::new(TransactionServiceImpl::new(repository))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::storage::memory::InMemoryTransactionRepository;

    fn service() -> TransactionServiceImpl {
        TransactionServiceImpl::new(Arc::new(InMemoryTransactionRepository::new()))
    }

    #[tokio::test]
    async fn test_record_expense() {
        let service = service();
        let action = ExpenseAction::new(250.0, "Food", Some("Lunch".into()));
        let tx = service.record_expense("u1", &action).await.unwrap();

        assert_eq!(tx.amount, 250.0);
        assert_eq!(tx.category, "Food");

        let page = service.list("u1", 1, 10).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.transactions[0].id, tx.id);
    }

    #[tokio::test]
    async fn test_create_defaults_category() {
        let service = service();
        let tx = service
            .create(
                "u1",
                NewTransaction {
                    amount: 12.5,
                    category: Some("  ".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(tx.category, DEFAULT_CATEGORY);
    }

    #[tokio::test]
    async fn test_create_rejects_negative_amount() {
        let err = service()
            .create(
                "u1",
                NewTransaction {
                    amount: -3.0,
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_pages_are_scoped_per_user() {
        let service = service();
        for amount in [1.0, 2.0, 3.0] {
            service
                .create(
                    "u1",
                    NewTransaction {
                        amount,
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
        }
        service
            .create(
                "u2",
                NewTransaction {
                    amount: 9.0,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let first = service.list("u1", 1, 2).await.unwrap();
        let second = service.list("u1", 2, 2).await.unwrap();
        assert_eq!(first.total, 3);
        assert_eq!(first.transactions.len(), 2);
        assert_eq!(second.transactions.len(), 1);
        assert!(service.list("u1", 0, 2).await.is_err());
    }

    #[tokio::test]
    async fn test_list_rejects_page_past_addressable_range() {
        let err = service().list("u1", usize::MAX, 200).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
