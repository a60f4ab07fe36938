//! Session Orchestrator.
//!
//! A session is created `active` by [`SessionService::start_session`], gains
//! one human/AI message pair per [`SessionService::chat_turn`], and becomes
//! `completed` through [`SessionService::end_session`]. There is no way back.
//!
//! Model calls within one request are sequential: each prompt depends on the
//! previous answer. Concurrent turns on the same session are not serialised;
//! their messages may interleave.

use std::sync::Arc;

use chrono::Utc;
use therapy_core::persona::{self, Persona};
use therapy_core::{ChatMessage, CompletionClient, MoodAssessment, extract_structured, prompts};
use tracing::{debug, info, warn};

use super::SessionError;
use crate::entities::{
    MessageRecord, MessageStore, NewMessage, NewSession, Sender, SessionStatus, SessionStore,
    SqliteStore,
};

/// Result of [`SessionService::start_session`].
#[derive(Debug, Clone)]
pub struct StartedSession {
    pub session_id: i64,
    pub persona: &'static Persona,
    pub opening_message: String,
    pub mood: MoodAssessment,
}

/// Result of [`SessionService::chat_turn`].
#[derive(Debug, Clone)]
pub struct TurnReply {
    pub reply: String,
    pub mood: MoodAssessment,
}

/// Orchestrates sessions over the store and the completion provider.
#[derive(Clone)]
pub struct SessionService {
    store: Arc<SqliteStore>,
    llm: Arc<dyn CompletionClient>,
}

impl SessionService {
    pub fn new(store: Arc<SqliteStore>, llm: Arc<dyn CompletionClient>) -> Self {
        Self { store, llm }
    }

    /// Open a session with `persona_id`: rate the starting mood, generate the
    /// persona's answer to the therapist greeting and persist both turns.
    ///
    /// Nothing is written unless both model calls succeed.
    pub async fn start_session(&self, persona_id: Option<i64>) -> Result<StartedSession, SessionError> {
        let persona = persona_id
            .and_then(persona::get)
            .ok_or(SessionError::InvalidPersona)?;
        let start_time = Utc::now();

        let mood_text = self.llm.complete(&prompts::initial_mood(persona)).await?;
        let mood = extract_structured(&mood_text, &prompts::initial_mood_defaults());
        debug!(persona = persona.name, mood = mood.mood_score, "initial mood assessed");

        let opening_message = self.llm.complete(&prompts::opening(persona)).await?;

        let mut tx = self.store.begin().await?;
        let session_id = tx
            .create_session(&NewSession {
                persona_id: persona.id,
                start_time,
                initial_mood: Some(mood.mood_score),
            })
            .await?;
        for msg in [
            NewMessage::human(session_id, prompts::THERAPIST_GREETING),
            NewMessage::ai(session_id, opening_message.as_str(), mood.mood_score),
        ] {
            tx.append_message(&msg).await?.ok_or(SessionError::InvalidSession)?;
        }
        tx.commit().await?;

        info!(session_id, persona = persona.name, initial_mood = mood.mood_score, "session started");
        Ok(StartedSession { session_id, persona, opening_message, mood })
    }

    /// Handle one therapist message and return the persona's reply.
    ///
    /// The therapist's message is committed before any model call so it
    /// survives a provider failure. The reply and the mood update commit
    /// together afterwards, and only while the session is still active.
    pub async fn chat_turn(
        &self,
        session_id: Option<i64>,
        message: Option<String>,
    ) -> Result<TurnReply, SessionError> {
        let (Some(session_id), Some(message)) = (
            session_id.filter(|id| *id != 0),
            message.filter(|m| !m.is_empty()),
        ) else {
            return Err(SessionError::MissingField);
        };

        let session = self
            .store
            .get_session_with_status(session_id, SessionStatus::Active)
            .await?
            .ok_or(SessionError::InvalidSession)?;
        let persona = persona::get(session.persona_id).ok_or(SessionError::UnknownPersona {
            session_id,
            persona_id: session.persona_id,
        })?;

        self.store
            .append_message(NewMessage::human(session_id, message.as_str()))
            .await?
            .ok_or(SessionError::InvalidSession)?;

        let history = self.store.list_messages(session_id).await?;
        let context = conversation_context(persona, &history);
        debug!(session_id, context_len = context.len(), "requesting persona reply");
        let reply = self.llm.complete(&context).await?;

        let mood_text = self
            .llm
            .complete(&prompts::mood_reassessment(persona, &reply, &message))
            .await?;
        let mood = extract_structured(&mood_text, &prompts::turn_mood_defaults());

        // The session may have been ended while the model was answering.
        // Dropping `tx` on either early return rolls the reply back.
        let mut tx = self.store.begin().await?;
        let stored = tx
            .append_message(&NewMessage::ai(session_id, reply.as_str(), mood.mood_score))
            .await?
            .is_some();
        if !stored || !tx.update_current_mood(session_id, mood.mood_score).await? {
            warn!(session_id, "session ended during chat turn; reply discarded");
            return Err(SessionError::InvalidSession);
        }
        tx.commit().await?;

        info!(session_id, mood = mood.mood_score, "chat turn completed");
        Ok(TurnReply { reply, mood })
    }

    /// Complete an active session, freezing its current mood as the final one.
    ///
    /// A second call on the same session fails with
    /// [`SessionError::InvalidSession`] and changes nothing.
    pub async fn end_session(&self, session_id: Option<i64>) -> Result<(), SessionError> {
        let session_id = session_id.ok_or(SessionError::InvalidSession)?;
        if !self.store.complete_session(session_id, Utc::now()).await? {
            return Err(SessionError::InvalidSession);
        }
        info!(session_id, "session ended");
        Ok(())
    }
}

/// The persona prompt followed by the stored conversation, oldest first.
///
/// The latest therapist message is already the last stored row, so it is
/// replayed exactly once as the final `user` turn.
pub fn conversation_context(persona: &Persona, history: &[MessageRecord]) -> Vec<ChatMessage> {
    std::iter::once(prompts::conversation_system(persona))
        .chain(history.iter().map(|m| match m.sender {
            Sender::Human => ChatMessage::user(m.content.as_str()),
            Sender::Ai => ChatMessage::assistant(m.content.as_str()),
        }))
        .collect()
}
