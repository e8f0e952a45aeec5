use axum::{extract::State, Json};

use crate::chat::{reply, ChatRequest, ChatResponse};
use crate::errors::AppError;
use crate::state::AppState;

/// POST /chat/
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let outcome = reply(state.store.as_ref(), state.llm.as_ref(), &request).await?;
    Ok(Json(ChatResponse {
        reply: outcome.into_value(),
    }))
}
