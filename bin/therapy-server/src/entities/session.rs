use std::future::Future;

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite};

use super::{SqliteStore, decode_err, format_ts, parse_ts};
use crate::entities::dao::{NewSession, SessionStatus, TherapySession};

pub trait SessionStore: Send + Sync + 'static {
    fn get_session(&self, id: i64) -> impl Future<Output = Result<Option<TherapySession>, sqlx::Error>> + Send;
    /// Fetch a session only if it is currently in `status`.
    fn get_session_with_status(
        &self,
        id: i64,
        status: SessionStatus,
    ) -> impl Future<Output = Result<Option<TherapySession>, sqlx::Error>> + Send;
    /// Move an active session to `completed`, copying `current_mood` into
    /// `final_mood`. Returns `false` if the session was not active.
    fn complete_session(
        &self,
        id: i64,
        end_time: DateTime<Utc>,
    ) -> impl Future<Output = Result<bool, sqlx::Error>> + Send;
    /// Delete a session together with all of its messages.
    fn delete_session(&self, id: i64) -> impl Future<Output = Result<bool, sqlx::Error>> + Send;
}

type SessionRow = (i64, i64, String, Option<String>, String, Option<i64>, Option<i64>, Option<i64>);

const SELECT_SESSION: &str = "SELECT id, persona_id, start_time, end_time, status, \
     initial_mood, current_mood, final_mood FROM sessions";

impl SessionStore for SqliteStore {
    async fn get_session(&self, id: i64) -> Result<Option<TherapySession>, sqlx::Error> {
        let row: Option<SessionRow> = sqlx::query_as(&format!("{SELECT_SESSION} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(from_row).transpose()
    }

    async fn get_session_with_status(
        &self,
        id: i64,
        status: SessionStatus,
    ) -> Result<Option<TherapySession>, sqlx::Error> {
        let row: Option<SessionRow> =
            sqlx::query_as(&format!("{SELECT_SESSION} WHERE id = ?1 AND status = ?2"))
                .bind(id)
                .bind(status.as_ref())
                .fetch_optional(&self.pool)
                .await?;
        row.map(from_row).transpose()
    }

    async fn complete_session(&self, id: i64, end_time: DateTime<Utc>) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions SET end_time = ?1, status = ?2, final_mood = current_mood \
             WHERE id = ?3 AND status = ?4",
        )
        .bind(format_ts(&end_time))
        .bind(SessionStatus::Completed.as_ref())
        .bind(id)
        .bind(SessionStatus::Active.as_ref())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn delete_session(&self, id: i64) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM messages WHERE session_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM sessions WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() == 1)
    }
}

pub(super) async fn insert<'e, E>(exec: E, session: &NewSession) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "INSERT INTO sessions (persona_id, start_time, status, initial_mood) \
         VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(session.persona_id)
    .bind(format_ts(&session.start_time))
    .bind(SessionStatus::Active.as_ref())
    .bind(session.initial_mood)
    .execute(exec)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Returns `false` when the session is unknown or no longer active.
pub(super) async fn set_current_mood<'e, E>(exec: E, id: i64, mood: i64) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("UPDATE sessions SET current_mood = ?1 WHERE id = ?2 AND status = ?3")
        .bind(mood)
        .bind(id)
        .bind(SessionStatus::Active.as_ref())
        .execute(exec)
        .await?;
    Ok(result.rows_affected() == 1)
}

fn from_row(row: SessionRow) -> Result<TherapySession, sqlx::Error> {
    let (id, persona_id, start_time, end_time, status, initial_mood, current_mood, final_mood) = row;
    Ok(TherapySession {
        id,
        persona_id,
        start_time: parse_ts(&start_time, "start_time"),
        end_time: end_time.as_deref().map(|t| parse_ts(t, "end_time")),
        status: status.parse().map_err(decode_err)?,
        initial_mood,
        current_mood,
        final_mood,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::SubsecRound;
    use crate::entities::{MessageStore, NewMessage, memory_store};

    async fn seed(store: &SqliteStore) -> i64 {
        let mut tx = store.begin().await.unwrap();
        let id = tx
            .create_session(&NewSession { persona_id: 3, start_time: Utc::now(), initial_mood: Some(2) })
            .await
            .unwrap();
        tx.append_message(&NewMessage::human(id, "hello")).await.unwrap();
        tx.commit().await.unwrap();
        id
    }

    #[tokio::test]
    async fn ids_auto_increment() {
        let store = memory_store().await;
        let a = seed(&store).await;
        let b = seed(&store).await;
        assert_eq!(b, a + 1);
    }

    #[tokio::test]
    async fn status_filter_hides_other_states() {
        let store = memory_store().await;
        let id = seed(&store).await;
        assert!(store.get_session_with_status(id, SessionStatus::Active).await.unwrap().is_some());
        assert!(store.get_session_with_status(id, SessionStatus::Completed).await.unwrap().is_none());
        assert!(store.get_session_with_status(id + 100, SessionStatus::Active).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn completing_copies_current_mood_once() {
        let store = memory_store().await;
        let id = seed(&store).await;
        let mut tx = store.begin().await.unwrap();
        assert!(tx.update_current_mood(id, 6).await.unwrap());
        tx.commit().await.unwrap();

        let first_end = Utc::now().trunc_subsecs(6);
        assert!(store.complete_session(id, first_end).await.unwrap());
        let done = store.get_session(id).await.unwrap().unwrap();
        assert_eq!(done.status, SessionStatus::Completed);
        assert_eq!(done.final_mood, Some(6));
        assert_eq!(done.end_time, Some(first_end));

        assert!(!store.complete_session(id, Utc::now()).await.unwrap());
        let again = store.get_session(id).await.unwrap().unwrap();
        assert_eq!(again.end_time, Some(first_end));
    }

    #[tokio::test]
    async fn mood_is_frozen_once_completed() {
        let store = memory_store().await;
        let id = seed(&store).await;
        assert!(store.complete_session(id, Utc::now()).await.unwrap());

        let mut tx = store.begin().await.unwrap();
        assert!(!tx.update_current_mood(id, 9).await.unwrap());
        tx.commit().await.unwrap();
        assert_eq!(store.get_session(id).await.unwrap().unwrap().current_mood, None);
    }

    #[tokio::test]
    async fn delete_cascades_to_messages() {
        let store = memory_store().await;
        let id = seed(&store).await;
        assert!(store.delete_session(id).await.unwrap());
        assert!(store.get_session(id).await.unwrap().is_none());
        assert!(store.list_messages(id).await.unwrap().is_empty());
        assert!(!store.delete_session(id).await.unwrap());
    }
}
