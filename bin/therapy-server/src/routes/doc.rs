use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::routes::{characters, health, report, session};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(info(
    title = "therapy-server",
    description = "AI therapy simulator API",
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(health::HealthApi::openapi());
    root.merge(characters::CharacterApi::openapi());
    root.merge(session::SessionApi::openapi());
    root.merge(report::ReportApi::openapi());
    root
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api-docs/openapi.json", get(get_openapi))
}

async fn get_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(get_docs())
}
