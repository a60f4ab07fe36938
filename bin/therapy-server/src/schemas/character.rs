use serde::Serialize;
use therapy_core::PersonaSummary;
use utoipa::ToSchema;

/// Response body for `GET /ai-characters`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CharactersResponse {
    /// `{id, name, description}` for every persona, ordered by id.
    #[schema(value_type = Vec<Object>)]
    pub characters: Vec<PersonaSummary>,
}
