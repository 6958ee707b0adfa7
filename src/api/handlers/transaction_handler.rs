use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::transaction_dto::*},
    error::AppError,
    security::middleware::AuthUser,
};

pub async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Creating transaction for user {}", auth.user.id);

    let transaction = state
        .transaction_service
        .create(&auth.user.id, request.into())
        .await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

pub async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListTransactionsParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = params.page.unwrap_or(1);
    let page_size = params.page_size.unwrap_or(50);
    debug!("Listing transactions: page={}, page_size={}", page, page_size);

    let result = state
        .transaction_service
        .list(&auth.user.id, page, page_size)
        .await?;

    Ok(Json(TransactionListResponse {
        transactions: result.transactions,
        total: result.total,
        page: result.page,
        page_size: result.page_size,
    }))
}
