//! Session Store: persisted sessions and their ordered messages.
//!
//! [`SessionStore`] and [`MessageStore`] are the seams handlers and services
//! use; [`SqliteStore`] implements both. Writes that must land together go
//! through a [`StoreTx`] obtained from [`SqliteStore::begin`].
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC text so that ordering
//! by the column is chronological. Messages are replayed ordered by
//! `(timestamp, id)`, which keeps insertion order when timestamps tie.
//!
//! All trait methods use `impl Future` in their signatures so no extra
//! `async-trait` crate is required for the store seam.

pub mod dao;
pub mod message;
pub mod session;

pub use dao::{MessageRecord, NewMessage, NewSession, Sender, SessionStatus};
pub use message::MessageStore;
pub use session::SessionStore;

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};

/// SQLite-backed session and message store.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the SQLite database at `url` and run pending migrations.
    ///
    /// `url` should be a sqlx-compatible SQLite URL, e.g. `"sqlite://ai_therapy.db"`
    /// or `"sqlite::memory:"` for tests. An in-memory database lives only as long
    /// as its connection, so callers should pass `max_connections = 1` for it.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        // Path is resolved relative to CARGO_MANIFEST_DIR at compile time.
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    /// Start a transaction; nothing written through it is visible until
    /// [`StoreTx::commit`]. Dropping it rolls back.
    pub async fn begin(&self) -> Result<StoreTx, sqlx::Error> {
        Ok(StoreTx { tx: self.pool.begin().await? })
    }
}

/// A group of writes that commit or roll back together.
pub struct StoreTx {
    tx: Transaction<'static, Sqlite>,
}

impl StoreTx {
    /// Insert a new `active` session and return its id.
    pub async fn create_session(&mut self, session: &NewSession) -> Result<i64, sqlx::Error> {
        session::insert(&mut *self.tx, session).await
    }

    /// Append a message and return its id, or `None` if the session is not active.
    pub async fn append_message(&mut self, msg: &NewMessage) -> Result<Option<i64>, sqlx::Error> {
        message::insert(&mut *self.tx, msg).await
    }

    /// Returns `false` if the session is not active.
    pub async fn update_current_mood(&mut self, session_id: i64, mood: i64) -> Result<bool, sqlx::Error> {
        session::set_current_mood(&mut *self.tx, session_id, mood).await
    }

    pub async fn commit(self) -> Result<(), sqlx::Error> {
        self.tx.commit().await
    }
}

// ── timestamp helpers ────────────────────────────────────────────────────────

pub(crate) fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_ts(raw: &str, column: &'static str) -> DateTime<Utc> {
    raw.parse().unwrap_or_else(|e: chrono::ParseError| {
        tracing::warn!(raw = %raw, column, error = %e, "failed to parse stored timestamp; using now");
        Utc::now()
    })
}

pub(crate) fn decode_err(e: strum::ParseError) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(e))
}

#[cfg(test)]
pub(crate) async fn memory_store() -> SqliteStore {
    SqliteStore::connect("sqlite::memory:", 1)
        .await
        .expect("in-memory store")
}

#[cfg(test)]
mod test {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn unreadable_timestamp_is_logged() {
        let before = Utc::now();
        assert!(parse_ts("yesterday-ish", "start_time") >= before);
        assert!(logs_contain("failed to parse stored timestamp"));
    }

    #[test]
    fn stored_timestamps_sort_chronologically() {
        let a: DateTime<Utc> = "2026-01-01T10:00:00Z".parse().unwrap();
        let b: DateTime<Utc> = "2026-01-01T10:00:00.5Z".parse().unwrap();
        let c: DateTime<Utc> = "2026-01-01T10:00:01Z".parse().unwrap();
        let mut stored = vec![format_ts(&c), format_ts(&a), format_ts(&b)];
        stored.sort();
        assert_eq!(stored, vec![format_ts(&a), format_ts(&b), format_ts(&c)]);
        assert_eq!(parse_ts(&format_ts(&b), "t"), b);
    }

    #[tokio::test]
    async fn dropped_transaction_rolls_back() {
        let store = memory_store().await;
        {
            let mut tx = store.begin().await.unwrap();
            tx.create_session(&NewSession { persona_id: 1, start_time: Utc::now(), initial_mood: Some(3) })
                .await
                .unwrap();
        }
        assert!(store.get_session(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn committed_transaction_is_visible() {
        let store = memory_store().await;
        let mut tx = store.begin().await.unwrap();
        let id = tx
            .create_session(&NewSession { persona_id: 2, start_time: Utc::now(), initial_mood: Some(4) })
            .await
            .unwrap();
        tx.append_message(&NewMessage::human(id, "hello")).await.unwrap();
        tx.append_message(&NewMessage::ai(id, "hi", 4)).await.unwrap();
        tx.commit().await.unwrap();

        let session = store.get_session(id).await.unwrap().unwrap();
        assert_eq!(session.status, SessionStatus::Active);
        assert_eq!(session.initial_mood, Some(4));
        assert_eq!(store.list_messages(id).await.unwrap().len(), 2);
    }
}
