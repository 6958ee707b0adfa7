//! Transaction Routes

use axum::{Router, routing::get};

use crate::api::app_state::AppState;
use crate::api::handlers::transaction_handler::*;

/// 创建交易路由器
pub fn create_transaction_router() -> Router<AppState> {
    Router::new().route(
        "/transactions",
        get(list_transactions).post(create_transaction),
    )
}
