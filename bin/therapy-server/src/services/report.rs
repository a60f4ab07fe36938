//! End-of-session report.
//!
//! Reports are assembled from the stored transcript only. The narrative
//! sections are fixed texts; no model call is made here.

use chrono::{DateTime, Utc};
use serde::Serialize;
use therapy_core::persona::{self, Persona};
use utoipa::ToSchema;

use super::SessionError;
use crate::entities::{MessageRecord, MessageStore, Sender, SessionStatus, SessionStore, SqliteStore};

/// Substituted when a session never recorded a starting mood.
pub const DEFAULT_INITIAL_MOOD: i64 = 3;
/// Substituted when a session ended without any mood assessment.
pub const DEFAULT_FINAL_MOOD: i64 = 5;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";
const THERAPIST_LABEL: &str = "Therapist";

/// AI mental-health report for a completed session.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionReport {
    pub patient_name: String,
    /// e.g. `"12 minutes"`.
    pub session_duration: String,
    pub initial_mood_score: i64,
    pub final_mood_score: i64,
    pub key_issues: Vec<String>,
    pub therapist_effectiveness: String,
    pub ai_progress: String,
    pub next_steps: Vec<String>,
    pub session_summary: String,

    pub session_id: i64,
    /// Formatted `YYYY-MM-DD HH:MM:SS UTC`.
    pub start_time: String,
    pub end_time: String,
    pub duration_minutes: i64,
    pub total_messages: usize,
    pub character_description: String,
    /// `"<speaker>: <content>"` lines separated by blank lines.
    pub transcript: String,
}

/// Build the report for `session_id`, which must be completed.
pub async fn generate(store: &SqliteStore, session_id: i64) -> Result<SessionReport, SessionError> {
    let session = store
        .get_session_with_status(session_id, SessionStatus::Completed)
        .await?
        .ok_or(SessionError::NotFound)?;
    let persona = persona::get(session.persona_id).ok_or(SessionError::UnknownPersona {
        session_id,
        persona_id: session.persona_id,
    })?;
    let messages = store.list_messages(session_id).await?;

    let end_time = session.end_time.unwrap_or_else(|| {
        tracing::warn!(session_id, "completed session has no end_time; using start_time");
        session.start_time
    });
    let duration_minutes = duration_minutes(session.start_time, end_time);

    Ok(SessionReport {
        patient_name: persona.name.to_owned(),
        session_duration: format!("{duration_minutes} minutes"),
        initial_mood_score: session.initial_mood.unwrap_or(DEFAULT_INITIAL_MOOD),
        final_mood_score: session
            .final_mood
            .or(session.current_mood)
            .unwrap_or(DEFAULT_FINAL_MOOD),
        key_issues: strings(&[
            "Therapy session conducted",
            "AI patient interaction",
            "Emotional support provided",
        ]),
        therapist_effectiveness: "The therapist provided supportive interaction during the session.".to_owned(),
        ai_progress: "The AI patient engaged in the therapeutic conversation.".to_owned(),
        next_steps: strings(&[
            "Continue regular therapy sessions",
            "Monitor emotional progress",
            "Focus on specific concerns",
        ]),
        session_summary: "A therapy session was completed with positive engagement from both parties."
            .to_owned(),
        session_id,
        start_time: session.start_time.format(TIMESTAMP_FORMAT).to_string(),
        end_time: end_time.format(TIMESTAMP_FORMAT).to_string(),
        duration_minutes,
        total_messages: messages.len(),
        character_description: persona.description.to_owned(),
        transcript: transcript(persona, &messages),
    })
}

/// Whole minutes between `start` and `end`, rounded down.
pub fn duration_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - start).num_seconds().max(0) / 60
}

pub fn transcript(persona: &Persona, messages: &[MessageRecord]) -> String {
    messages
        .iter()
        .map(|m| {
            let speaker = match m.sender {
                Sender::Human => THERAPIST_LABEL,
                Sender::Ai => persona.name,
            };
            format!("{speaker}: {}", m.content)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::Duration;
    use crate::entities::{NewMessage, NewSession, memory_store};

    async fn completed_session(store: &SqliteStore, with_turn: bool) -> i64 {
        let start = Utc::now() - Duration::seconds(125);
        let mut tx = store.begin().await.unwrap();
        let sid = tx
            .create_session(&NewSession { persona_id: 3, start_time: start, initial_mood: None })
            .await
            .unwrap();
        tx.append_message(&NewMessage::human(sid, "How are you?")).await.unwrap();
        if with_turn {
            tx.append_message(&NewMessage::ai(sid, "Hollow.", 2)).await.unwrap();
            assert!(tx.update_current_mood(sid, 2).await.unwrap());
        }
        tx.commit().await.unwrap();
        assert!(store.complete_session(sid, Utc::now()).await.unwrap());
        sid
    }

    #[test]
    fn duration_rounds_down() {
        let start = Utc::now();
        assert_eq!(duration_minutes(start, start + Duration::seconds(59)), 0);
        assert_eq!(duration_minutes(start, start + Duration::seconds(61)), 1);
        assert_eq!(duration_minutes(start, start + Duration::seconds(3599)), 59);
        assert_eq!(duration_minutes(start, start - Duration::seconds(30)), 0);
    }

    #[tokio::test]
    async fn report_without_ai_messages_uses_default_moods() {
        let store = memory_store().await;
        let sid = completed_session(&store, false).await;
        let report = generate(&store, sid).await.unwrap();
        assert_eq!(report.initial_mood_score, DEFAULT_INITIAL_MOOD);
        assert_eq!(report.final_mood_score, DEFAULT_FINAL_MOOD);
        assert_eq!(report.total_messages, 1);
        assert_eq!(report.duration_minutes, 2);
        assert_eq!(report.session_duration, "2 minutes");
        assert_eq!(report.key_issues.len(), 3);
        assert_eq!(report.next_steps.len(), 3);
    }

    #[tokio::test]
    async fn report_labels_transcript_and_uses_final_mood() {
        let store = memory_store().await;
        let sid = completed_session(&store, true).await;
        let report = generate(&store, sid).await.unwrap();
        assert_eq!(report.patient_name, "DEEP-3 (Depressed AI)");
        assert_eq!(report.final_mood_score, 2);
        assert_eq!(
            report.transcript,
            "Therapist: How are you?\n\nDEEP-3 (Depressed AI): Hollow."
        );
        assert!(report.start_time.ends_with(" UTC"));
        assert_eq!(report.start_time.len(), "2026-01-01 00:00:00 UTC".len());
    }

    #[tokio::test]
    async fn active_or_unknown_sessions_have_no_report() {
        let store = memory_store().await;
        let mut tx = store.begin().await.unwrap();
        let sid = tx
            .create_session(&NewSession { persona_id: 1, start_time: Utc::now(), initial_mood: Some(3) })
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert!(matches!(generate(&store, sid).await, Err(SessionError::NotFound)));
        assert!(matches!(generate(&store, sid + 1).await, Err(SessionError::NotFound)));
    }
}
