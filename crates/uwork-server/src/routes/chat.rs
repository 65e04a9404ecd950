use axum::extract::State;
use axum::Json;

use uwork_chat::ChatMessage;

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct ChatBody {
    pub messages: Vec<ChatMessage>,
}

/// POST /api/chat — run the tool-calling exchange for the supplied history.
pub async fn chat(
    State(app): State<AppState>,
    Json(body): Json<ChatBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let bridge = app
        .bridge
        .clone()
        .ok_or_else(|| AppError::unavailable("chat is not configured: set UWORK_LLM_API_KEY"))?;

    let reply = bridge.run(body.messages).await?;

    Ok(Json(serde_json::json!({
        "message": reply.message,
        "usage": reply.usage,
    })))
}
