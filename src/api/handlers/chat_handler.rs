use axum::{Json, extract::State, response::IntoResponse};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::chat_dto::*},
    error::AppError,
    interpreter::ChatTurn,
    security::middleware::MaybeAuthUser,
};

pub async fn chat(
    State(state): State<AppState>,
    MaybeAuthUser(auth): MaybeAuthUser,
    Json(request): Json<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!(
        "Chat request: score={}, authenticated={}",
        request.health_score,
        auth.is_some()
    );

    let turn = ChatTurn {
        user_message: request.message,
        health_score: request.health_score,
    };
    let result = state
        .chat_service
        .reply(&turn, auth.as_ref().map(|a| &a.user))
        .await?;

    if let Some(tx) = &result.recorded {
        debug!("Chat turn recorded transaction {}", tx.id);
    }

    Ok(Json(ChatResponse::from(result.reply)))
}
