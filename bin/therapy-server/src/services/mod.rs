//! Session workflow and reporting.
//!
//! [`session::SessionService`] drives a session from start to end and owns
//! every call to the completion provider. [`report::generate`] builds the
//! end-of-session report from the stored transcript without any model call.

pub mod report;
pub mod session;

pub use session::SessionService;

use therapy_core::CompletionError;
use thiserror::Error;

use crate::error::ServerError;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The requested persona id is not in the catalog.
    #[error("Invalid AI character")]
    InvalidPersona,

    /// `session_id` or `message` was absent or empty.
    #[error("Missing session_id or message")]
    MissingField,

    /// Unknown session, or a session that is no longer active.
    #[error("Invalid or inactive session")]
    InvalidSession,

    /// Unknown session, or a session that has not been completed yet.
    #[error("Session not found or not completed")]
    NotFound,

    /// A stored session points at a persona the catalog does not know.
    #[error("session {session_id} references unknown persona {persona_id}")]
    UnknownPersona { session_id: i64, persona_id: i64 },

    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<SessionError> for ServerError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::InvalidPersona | SessionError::MissingField | SessionError::InvalidSession => {
                ServerError::BadRequest(e.to_string())
            }
            SessionError::NotFound => ServerError::NotFound(e.to_string()),
            SessionError::UnknownPersona { .. } => ServerError::Internal(e.to_string()),
            SessionError::Completion(e) => ServerError::Completion(e),
            SessionError::Database(e) => ServerError::Database(e),
        }
    }
}
