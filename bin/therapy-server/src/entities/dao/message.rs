use chrono::{DateTime, Utc};
use strum::{AsRefStr, Display, EnumString};

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Sender {
    /// The therapist.
    Human,
    /// The persona.
    Ai,
}

/// A row in the `messages` table. Rows are never updated.
#[derive(Debug, Clone)]
pub struct MessageRecord {
    pub id: i64,
    pub session_id: i64,
    pub sender: Sender,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Present only on `ai` messages.
    pub mood_score: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub session_id: i64,
    pub sender: Sender,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub mood_score: Option<i64>,
}

impl NewMessage {
    pub fn human(session_id: i64, content: impl Into<String>) -> Self {
        Self {
            session_id,
            sender: Sender::Human,
            content: content.into(),
            timestamp: Utc::now(),
            mood_score: None,
        }
    }

    pub fn ai(session_id: i64, content: impl Into<String>, mood_score: i64) -> Self {
        Self {
            session_id,
            sender: Sender::Ai,
            content: content.into(),
            timestamp: Utc::now(),
            mood_score: Some(mood_score),
        }
    }
}
