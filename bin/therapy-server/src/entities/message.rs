use std::future::Future;

use sqlx::{Executor, Sqlite};

use super::{SqliteStore, decode_err, format_ts, parse_ts};
use crate::entities::dao::{MessageRecord, NewMessage, SessionStatus};

pub trait MessageStore: Send + Sync + 'static {
    /// Append a single message outside any wider transaction and return its id,
    /// or `None` when the session is unknown or no longer active.
    fn append_message(&self, msg: NewMessage) -> impl Future<Output = Result<Option<i64>, sqlx::Error>> + Send;
    /// All messages of a session in conversation order.
    fn list_messages(&self, session_id: i64) -> impl Future<Output = Result<Vec<MessageRecord>, sqlx::Error>> + Send;
}

type MessageRow = (i64, i64, String, String, String, Option<i64>);

impl MessageStore for SqliteStore {
    async fn append_message(&self, msg: NewMessage) -> Result<Option<i64>, sqlx::Error> {
        insert(&self.pool, &msg).await
    }

    async fn list_messages(&self, session_id: i64) -> Result<Vec<MessageRecord>, sqlx::Error> {
        let rows: Vec<MessageRow> = sqlx::query_as(
            "SELECT id, session_id, sender, content, timestamp, mood_score \
             FROM messages WHERE session_id = ?1 ORDER BY timestamp ASC, id ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(|(id, session_id, sender, content, timestamp, mood_score)| {
                Ok(MessageRecord {
                    id,
                    session_id,
                    sender: sender.parse().map_err(decode_err)?,
                    content,
                    timestamp: parse_ts(&timestamp, "timestamp"),
                    mood_score,
                })
            })
            .collect()
    }
}

// Messages are only ever appended to active sessions; the insert is a no-op otherwise.
pub(super) async fn insert<'e, E>(exec: E, msg: &NewMessage) -> Result<Option<i64>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "INSERT INTO messages (session_id, sender, content, timestamp, mood_score) \
         SELECT ?1, ?2, ?3, ?4, ?5 \
         WHERE EXISTS (SELECT 1 FROM sessions WHERE id = ?1 AND status = ?6)",
    )
    .bind(msg.session_id)
    .bind(msg.sender.as_ref())
    .bind(msg.content.clone())
    .bind(format_ts(&msg.timestamp))
    .bind(msg.mood_score)
    .bind(SessionStatus::Active.as_ref())
    .execute(exec)
    .await?;
    Ok((result.rows_affected() == 1).then(|| result.last_insert_rowid()))
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{Duration, Utc};
    use crate::entities::{NewSession, Sender, SessionStore, memory_store};

    #[tokio::test]
    async fn messages_replay_in_timestamp_then_insertion_order() {
        let store = memory_store().await;
        let mut tx = store.begin().await.unwrap();
        let sid = tx
            .create_session(&NewSession { persona_id: 1, start_time: Utc::now(), initial_mood: None })
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let t0 = Utc::now();
        let same = |sender: Sender, content: &str| NewMessage {
            session_id: sid,
            sender,
            content: content.into(),
            timestamp: t0,
            mood_score: (sender == Sender::Ai).then_some(4),
        };
        store.append_message(same(Sender::Human, "first")).await.unwrap();
        store.append_message(same(Sender::Ai, "second")).await.unwrap();
        store
            .append_message(NewMessage { timestamp: t0 - Duration::seconds(5), ..same(Sender::Human, "earliest") })
            .await
            .unwrap();

        let contents: Vec<String> = store
            .list_messages(sid)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(contents, vec!["earliest", "first", "second"]);
    }

    #[tokio::test]
    async fn mood_score_only_on_ai_messages() {
        let store = memory_store().await;
        let mut tx = store.begin().await.unwrap();
        let sid = tx
            .create_session(&NewSession { persona_id: 1, start_time: Utc::now(), initial_mood: None })
            .await
            .unwrap();
        tx.commit().await.unwrap();
        store.append_message(NewMessage::human(sid, "q")).await.unwrap();
        store.append_message(NewMessage::ai(sid, "a", 9)).await.unwrap();

        let msgs = store.list_messages(sid).await.unwrap();
        assert_eq!(msgs[0].sender, Sender::Human);
        assert_eq!(msgs[0].mood_score, None);
        assert_eq!(msgs[1].sender, Sender::Ai);
        assert_eq!(msgs[1].mood_score, Some(9));
    }

    #[tokio::test]
    async fn messages_require_an_active_session() {
        let store = memory_store().await;
        assert_eq!(store.append_message(NewMessage::human(404, "orphan")).await.unwrap(), None);

        let mut tx = store.begin().await.unwrap();
        let sid = tx
            .create_session(&NewSession { persona_id: 1, start_time: Utc::now(), initial_mood: None })
            .await
            .unwrap();
        tx.commit().await.unwrap();
        assert!(store.append_message(NewMessage::human(sid, "before")).await.unwrap().is_some());

        assert!(store.complete_session(sid, Utc::now()).await.unwrap());
        assert_eq!(store.append_message(NewMessage::human(sid, "after")).await.unwrap(), None);
        assert_eq!(store.list_messages(sid).await.unwrap().len(), 1);
    }
}
