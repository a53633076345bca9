//! Chat with the learning assistant.

use crate::assistant::{reply, suggested_responses};
use crate::error::AppError;
use crate::extractors::{AuthUser, ValidJson};
use crate::models::{ChatHistoryQuery, ChatLogEntry, ChatRequest, ChatResponse};
use crate::response::{success_many, success_one_ok, SuccessMany, SuccessOne};
use crate::service::{ChatLogService, RequestValidator};
use crate::state::AppState;
use crate::store::now_text;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};

#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = SuccessOne<ChatResponse>),
        (status = 422, description = "Empty or oversized message"),
    ),
    security(("bearer" = [])),
    tag = "chat"
)]
pub async fn chat(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidJson(body): ValidJson<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    RequestValidator::chat_message(&body.message)?;
    let context = ChatLogService::build_context(&state.pool, user.id, body.profile_id).await?;
    let context_used = !context.is_empty();

    let response = reply(state.llm(), &body.message, &context).await;
    let suggested = suggested_responses(&body.message, &context);

    // The exchange is logged against the profile only when it was actually used.
    let logged_profile = if context_used { body.profile_id } else { None };
    ChatLogService::record(&state.pool, user.id, logged_profile, &body.message, &response, context_used).await?;
    tracing::debug!(user_id = user.id, context_used, "chat answered");

    Ok(success_one_ok(ChatResponse {
        message: body.message,
        response,
        suggested_responses: suggested,
        timestamp: now_text(),
        context_used,
    }))
}

#[utoipa::path(
    get,
    path = "/api/chat/history",
    params(ChatHistoryQuery),
    responses((status = 200, description = "The caller's chat log, newest first", body = SuccessMany<ChatLogEntry>)),
    security(("bearer" = [])),
    tag = "chat"
)]
pub async fn history(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<ChatHistoryQuery>,
) -> Result<impl IntoResponse, AppError> {
    let entries = ChatLogService::history(&state.pool, user.id, &query).await?;
    Ok(success_many(entries))
}
