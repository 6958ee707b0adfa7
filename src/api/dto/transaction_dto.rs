//! 交易 DTO

use serde::{Deserialize, Serialize};

use crate::models::transaction::Transaction;
use crate::services::transaction::NewTransaction;

/// 创建交易请求
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub amount: f64,
    pub category: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
}

impl From<CreateTransactionRequest> for NewTransaction {
    fn from(request: CreateTransactionRequest) -> Self {
        Self {
            amount: request.amount,
            category: request.category,
            description: request.description,
            is_recurring: request.is_recurring,
        }
    }
}

/// 列表查询参数
#[derive(Debug, Deserialize)]
pub struct ListTransactionsParams {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

/// 交易列表响应
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionListResponse {
    pub transactions: Vec<Transaction>,
    pub total: u64,
    pub page: usize,
    pub page_size: usize,
}
