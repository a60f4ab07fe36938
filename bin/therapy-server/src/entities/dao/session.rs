use chrono::{DateTime, Utc};
use strum::{AsRefStr, Display, EnumString};

/// Lifecycle of a therapy session. Only `active -> completed` is ever taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Completed,
    /// Reserved; nothing moves a session here yet.
    Abandoned,
}

/// A row in the `sessions` table.
#[derive(Debug, Clone)]
pub struct TherapySession {
    pub id: i64,
    pub persona_id: i64,
    pub start_time: DateTime<Utc>,
    /// Set only when the session is completed.
    pub end_time: Option<DateTime<Utc>>,
    pub status: SessionStatus,
    pub initial_mood: Option<i64>,
    pub current_mood: Option<i64>,
    /// Copied from `current_mood` when the session is completed.
    pub final_mood: Option<i64>,
}

/// Values for a freshly started session; always inserted as `active`.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub persona_id: i64,
    pub start_time: DateTime<Utc>,
    pub initial_mood: Option<i64>,
}
