use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::schemas::session::{
    ChatRequest, ChatResponse, EndSessionRequest, EndSessionResponse, StartSessionRequest,
    StartSessionResponse,
};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(start_session, chat, end_session),
    components(schemas(
        StartSessionRequest,
        StartSessionResponse,
        ChatRequest,
        ChatResponse,
        EndSessionRequest,
        EndSessionResponse
    ))
)]
pub struct SessionApi;

/// Register session lifecycle routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/start_session", post(start_session))
        .route("/chat",          post(chat))
        .route("/end_session",   post(end_session))
}

// ── Session handlers ──────────────────────────────────────────────────────────
#[utoipa::path(
    post,
    path = "/start_session",
    tag = "sessions",
    request_body = StartSessionRequest,
    responses(
        (status = 200, description = "Session started", body = StartSessionResponse),
        (status = 400, description = "Invalid AI character"),
        (status = 401, description = "Provider rejected the API key"),
        (status = 429, description = "Provider rate limit"),
        (status = 500, description = "Provider or database error"),
    )
)]
pub async fn start_session(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<StartSessionRequest>, JsonRejection>,
) -> Result<Json<StartSessionResponse>, ServerError> {
    let Json(req) = payload?;
    let started = state.sessions.start_session(req.persona_id()).await?;
    Ok(Json(started.into()))
}

#[utoipa::path(
    post,
    path = "/chat",
    tag = "sessions",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Persona replied", body = ChatResponse),
        (status = 400, description = "Missing fields or invalid/inactive session"),
        (status = 401, description = "Provider rejected the API key"),
        (status = 429, description = "Provider rate limit"),
        (status = 500, description = "Provider or database error"),
    )
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ServerError> {
    let Json(req) = payload?;
    let turn = state.sessions.chat_turn(req.session_id, req.message).await?;
    Ok(Json(turn.into()))
}

#[utoipa::path(
    post,
    path = "/end_session",
    tag = "sessions",
    request_body = EndSessionRequest,
    responses(
        (status = 200, description = "Session completed", body = EndSessionResponse),
        (status = 400, description = "Invalid or inactive session"),
        (status = 500, description = "Database error"),
    )
)]
pub async fn end_session(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EndSessionRequest>, JsonRejection>,
) -> Result<Json<EndSessionResponse>, ServerError> {
    let Json(req) = payload?;
    state.sessions.end_session(req.session_id).await?;
    Ok(Json(EndSessionResponse { message: "Session ended successfully".to_owned() }))
}
