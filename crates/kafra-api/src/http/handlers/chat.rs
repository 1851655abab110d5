//! POST /api/kafra-chat
//!
//! Forwards the conversation to the upstream model with the configured
//! persona prompt prepended, and returns the trimmed reply. The upstream
//! call is bounded by `upstream_timeout` (0 disables it); elapsing is a
//! generic failure.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use tracing::{Instrument, field};

use kafra_observe::genai_attrs::{
    GEN_AI_RESPONSE_ID, GEN_AI_RESPONSE_MODEL, GEN_AI_USAGE_INPUT_TOKENS,
    GEN_AI_USAGE_OUTPUT_TOKENS, OP_CHAT,
};
use kafra_types::llm::{CompletionRequest, LlmError, Message};
use kafra_types::wire::{KafraChatReply, KafraChatRequest};

use crate::http::error::{AppError, MSG_NO_MESSAGES};
use crate::state::AppState;

pub const MSG_INVALID_BODY: &str = "รูปแบบข้อความไม่ถูกต้องค่ะ";

pub async fn kafra_chat(
    State(state): State<AppState>,
    body: Result<Json<KafraChatRequest>, JsonRejection>,
) -> Result<Json<KafraChatReply>, AppError> {
    let Json(body) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected chat body");
        AppError::Validation(MSG_INVALID_BODY.to_string())
    })?;

    if body.messages.is_empty() {
        return Err(AppError::Validation(MSG_NO_MESSAGES.to_string()));
    }

    let provider = state
        .provider
        .as_ref()
        .ok_or_else(|| AppError::Internal("OPENAI_API_KEY is not configured".to_string()))?;

    let config = &state.config;
    let messages: Vec<Message> = body.messages.into_iter().map(Message::from).collect();
    let request = CompletionRequest {
        model: config.model.clone(),
        messages,
        system: Some(config.system_prompt.clone()),
        max_tokens: config.max_tokens,
        temperature: Some(config.temperature),
    };

    let span = tracing::info_span!(
        "gen_ai.chat",
        gen_ai.operation.name = OP_CHAT,
        gen_ai.provider.name = provider.name(),
        gen_ai.request.model = %request.model,
        gen_ai.request.max_tokens = request.max_tokens,
        gen_ai.response.model = field::Empty,
        gen_ai.response.id = field::Empty,
        gen_ai.usage.input_tokens = field::Empty,
        gen_ai.usage.output_tokens = field::Empty,
    );

    let call = provider.complete(&request).instrument(span.clone());
    let response = match config.upstream_timeout() {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| LlmError::Timeout(limit))??,
        None => call.await?,
    };

    span.record(GEN_AI_RESPONSE_MODEL, response.model.as_str());
    span.record(GEN_AI_RESPONSE_ID, response.id.as_str());
    span.record(GEN_AI_USAGE_INPUT_TOKENS, response.usage.input_tokens);
    span.record(GEN_AI_USAGE_OUTPUT_TOKENS, response.usage.output_tokens);

    let reply = response.content.trim();
    if reply.is_empty() {
        return Err(LlmError::EmptyResponse.into());
    }

    let model = if response.model.is_empty() {
        config.model.clone()
    } else {
        response.model.clone()
    };

    Ok(Json(KafraChatReply {
        reply: reply.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        model,
    }))
}
