use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use therapy_core::persona;
use utoipa::OpenApi;

use crate::schemas::character::CharactersResponse;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(list_characters), components(schemas(CharactersResponse)))]
pub struct CharacterApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/ai-characters", get(list_characters))
}

/// The persona catalog without prompts, ordered by id.
#[utoipa::path(
    get,
    path = "/ai-characters",
    tag = "characters",
    responses(
        (status = 200, description = "Persona catalog", body = CharactersResponse),
    )
)]
pub async fn list_characters() -> Json<CharactersResponse> {
    Json(CharactersResponse { characters: persona::list() })
}
