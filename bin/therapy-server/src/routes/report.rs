use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::services::SessionError;
use crate::services::report::{self, SessionReport};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(get_session_report), components(schemas(SessionReport)))]
pub struct ReportApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/session_report/{session_id}", get(get_session_report))
}

/// Report for a completed session.
///
/// A non-numeric id cannot name a session, so it is answered like an unknown one.
#[utoipa::path(
    get,
    path = "/session_report/{session_id}",
    tag = "reports",
    params(("session_id" = i64, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session report", body = SessionReport),
        (status = 404, description = "Session not found or not completed"),
        (status = 500, description = "Database error"),
    )
)]
pub async fn get_session_report(
    State(state): State<Arc<AppState>>,
    session_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<SessionReport>, ServerError> {
    let Path(session_id) = session_id.map_err(|_| SessionError::NotFound)?;
    let report = report::generate(&state.store, session_id).await?;
    Ok(Json(report))
}
