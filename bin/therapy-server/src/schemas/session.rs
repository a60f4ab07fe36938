use serde::{Deserialize, Serialize};
use serde_json::Value;
use therapy_core::Persona;
use utoipa::ToSchema;

use crate::services::session::{StartedSession, TurnReply};

/// Request body for `POST /start_session`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct StartSessionRequest {
    /// Persona id, 1–5. Kept loosely typed so a string or fractional id is
    /// answered as an unknown persona rather than a malformed body.
    #[schema(value_type = Option<i64>)]
    pub ai_character_id: Option<Value>,
}

impl StartSessionRequest {
    /// The requested id when it is a JSON integer.
    pub fn persona_id(&self) -> Option<i64> {
        self.ai_character_id.as_ref().and_then(Value::as_i64)
    }
}

/// Response body for `POST /start_session`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StartSessionResponse {
    pub session_id: i64,
    /// The full persona, including its prompt.
    #[schema(value_type = Object)]
    pub ai_character: &'static Persona,
    /// The persona's answer to the therapist's greeting.
    pub initial_message: String,
    pub initial_mood: i64,
    pub mood_reflection: String,
}

/// Request body for `POST /chat`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct ChatRequest {
    pub session_id: Option<i64>,
    pub message: Option<String>,
}

/// Response body for `POST /chat`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChatResponse {
    pub ai_response: String,
    pub mood_score: i64,
    pub mood_reflection: String,
}

/// Request body for `POST /end_session`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct EndSessionRequest {
    pub session_id: Option<i64>,
}

/// Response body for `POST /end_session`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EndSessionResponse {
    pub message: String,
}

impl From<StartedSession> for StartSessionResponse {
    fn from(s: StartedSession) -> Self {
        Self {
            session_id: s.session_id,
            ai_character: s.persona,
            initial_message: s.opening_message,
            initial_mood: s.mood.mood_score,
            mood_reflection: s.mood.self_reflection,
        }
    }
}

impl From<TurnReply> for ChatResponse {
    fn from(t: TurnReply) -> Self {
        Self {
            ai_response: t.reply,
            mood_score: t.mood.mood_score,
            mood_reflection: t.mood.self_reflection,
        }
    }
}
