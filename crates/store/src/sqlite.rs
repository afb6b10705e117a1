//! SQLite store — local durability via sqlx.
//!
//! One database file with three tables, one per logical collection:
//! - `evaluations` — course evaluations, recency-indexed
//! - `chat_sessions` — one row per session, messages as a JSON column,
//!   overwritten in place (last write wins)
//! - `validation_responses` — append-only validation verdicts

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};
use unihelp_core::error::StoreError;
use unihelp_core::evaluation::{EvaluationQuery, EvaluationRecord, NewEvaluation};
use unihelp_core::message::{ChatMessage, ChatSession, SessionId};
use unihelp_core::store::DocumentStore;
use unihelp_core::validation::{ValidationResponse, ValidationVerdict};
use uuid::Uuid;

/// A SQLite-backed document store.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new SQLite store from a file path.
    ///
    /// The database and all tables are created automatically.
    /// Pass `":memory:"` for an in-process ephemeral database (tests).
    pub async fn new(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| StoreError::Storage(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON");

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("SQLite store initialized at {path}");
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS evaluations (
                iid              INTEGER PRIMARY KEY AUTOINCREMENT,
                id               TEXT UNIQUE NOT NULL,
                subject          TEXT NOT NULL,
                instructor       TEXT NOT NULL,
                term             TEXT NOT NULL,
                clarity_rating   INTEGER NOT NULL,
                alignment_rating INTEGER NOT NULL,
                free_text        TEXT NOT NULL,
                submitted_at     TEXT NOT NULL,
                submitter_id     TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("evaluations table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_evaluations_submitted_at
             ON evaluations(submitted_at DESC)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("submitted_at index: {e}")))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chat_sessions (
                id               TEXT PRIMARY KEY,
                owner_id         TEXT,
                messages         TEXT NOT NULL,
                last_activity_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("chat_sessions table: {e}")))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS validation_responses (
                iid          INTEGER PRIMARY KEY AUTOINCREMENT,
                claim_id     INTEGER NOT NULL,
                verdict      TEXT NOT NULL,
                responder_id TEXT,
                submitted_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("validation_responses table: {e}")))?;

        debug!("SQLite migrations complete");
        Ok(())
    }

    fn row_to_evaluation(row: &sqlx::sqlite::SqliteRow) -> Result<EvaluationRecord, StoreError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| StoreError::QueryUnavailable(format!("id column: {e}")))?;
        let subject: String = row
            .try_get("subject")
            .map_err(|e| StoreError::QueryUnavailable(format!("subject column: {e}")))?;
        let instructor: String = row
            .try_get("instructor")
            .map_err(|e| StoreError::QueryUnavailable(format!("instructor column: {e}")))?;
        let term: String = row
            .try_get("term")
            .map_err(|e| StoreError::QueryUnavailable(format!("term column: {e}")))?;
        let clarity_rating: i64 = row
            .try_get("clarity_rating")
            .map_err(|e| StoreError::QueryUnavailable(format!("clarity_rating column: {e}")))?;
        let alignment_rating: i64 = row
            .try_get("alignment_rating")
            .map_err(|e| StoreError::QueryUnavailable(format!("alignment_rating column: {e}")))?;
        let free_text: String = row
            .try_get("free_text")
            .map_err(|e| StoreError::QueryUnavailable(format!("free_text column: {e}")))?;
        let submitted_at_str: String = row
            .try_get("submitted_at")
            .map_err(|e| StoreError::QueryUnavailable(format!("submitted_at column: {e}")))?;
        let submitter_id: Option<String> = row
            .try_get("submitter_id")
            .map_err(|e| StoreError::QueryUnavailable(format!("submitter_id column: {e}")))?;

        let submitted_at = chrono::DateTime::parse_from_rfc3339(&submitted_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(EvaluationRecord {
            id,
            subject,
            instructor,
            term,
            clarity_rating: clarity_rating as u8,
            alignment_rating: alignment_rating as u8,
            free_text,
            submitted_at,
            submitter_id,
        })
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn recent_evaluations(
        &self,
        query: &EvaluationQuery,
    ) -> Result<Vec<EvaluationRecord>, StoreError> {
        // Build equality constraints for each set filter field.
        let mut clauses: Vec<&str> = Vec::new();
        let mut binds: Vec<&str> = Vec::new();

        if let Some(subject) = query.filters.subject.as_deref() {
            clauses.push("subject = ?");
            binds.push(subject);
        }
        if let Some(instructor) = query.filters.instructor.as_deref() {
            clauses.push("instructor = ?");
            binds.push(instructor);
        }
        if let Some(term) = query.filters.term.as_deref() {
            clauses.push("term = ?");
            binds.push(term);
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        let sql = format!(
            "SELECT * FROM evaluations {where_clause} ORDER BY submitted_at DESC LIMIT ?"
        );

        let mut db_query = sqlx::query(&sql);
        for value in binds {
            db_query = db_query.bind(value);
        }
        db_query = db_query.bind(query.limit as i64);

        let rows = db_query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::QueryUnavailable(format!("evaluation query: {e}")))?;

        rows.iter().map(Self::row_to_evaluation).collect()
    }

    async fn submit_evaluation(&self, record: NewEvaluation) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let submitted_at = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO evaluations
                (id, subject, instructor, term, clarity_rating, alignment_rating,
                 free_text, submitted_at, submitter_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&id)
        .bind(&record.subject)
        .bind(&record.instructor)
        .bind(&record.term)
        .bind(record.clarity_rating as i64)
        .bind(record.alignment_rating as i64)
        .bind(&record.free_text)
        .bind(&submitted_at)
        .bind(&record.submitter_id)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("evaluation INSERT: {e}")))?;

        debug!("Stored evaluation {id}");
        Ok(id)
    }

    async fn save_session(&self, session: &ChatSession) -> Result<(), StoreError> {
        let messages_json = serde_json::to_string(&session.messages)
            .map_err(|e| StoreError::Storage(format!("messages serialization: {e}")))?;

        sqlx::query(
            r#"
            INSERT INTO chat_sessions (id, owner_id, messages, last_activity_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                owner_id = excluded.owner_id,
                messages = excluded.messages,
                last_activity_at = excluded.last_activity_at
            "#,
        )
        .bind(&session.id.0)
        .bind(&session.owner_id)
        .bind(&messages_json)
        .bind(session.last_activity_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("session save: {e}")))?;

        Ok(())
    }

    async fn load_session(&self, id: &SessionId) -> Result<Option<ChatSession>, StoreError> {
        let row = sqlx::query("SELECT * FROM chat_sessions WHERE id = ?1")
            .bind(&id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::QueryUnavailable(format!("session query: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let owner_id: Option<String> = row
            .try_get("owner_id")
            .map_err(|e| StoreError::QueryUnavailable(format!("owner_id column: {e}")))?;
        let messages_json: String = row
            .try_get("messages")
            .map_err(|e| StoreError::QueryUnavailable(format!("messages column: {e}")))?;
        let last_activity_str: String = row
            .try_get("last_activity_at")
            .map_err(|e| StoreError::QueryUnavailable(format!("last_activity_at column: {e}")))?;

        let messages: Vec<ChatMessage> = serde_json::from_str(&messages_json)
            .map_err(|e| StoreError::Storage(format!("messages deserialization: {e}")))?;

        let last_activity_at = chrono::DateTime::parse_from_rfc3339(&last_activity_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(Some(ChatSession {
            id: id.clone(),
            owner_id,
            messages,
            last_activity_at,
        }))
    }

    async fn record_validation(&self, response: &ValidationResponse) -> Result<(), StoreError> {
        let verdict = match response.verdict {
            ValidationVerdict::True => "true",
            ValidationVerdict::Myth => "myth",
            ValidationVerdict::Skip => "skip",
        };

        sqlx::query(
            r#"
            INSERT INTO validation_responses (claim_id, verdict, responder_id, submitted_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(response.claim_id as i64)
        .bind(verdict)
        .bind(&response.responder_id)
        .bind(response.submitted_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("validation INSERT: {e}")))?;

        Ok(())
    }
}
