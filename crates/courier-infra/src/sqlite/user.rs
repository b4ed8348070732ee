//! SQLite user repository implementation.
//!
//! Implements `UserRepository` from `courier-core` using sqlx with the
//! split read/write pool: raw queries, private Row structs, RFC3339
//! datetimes, Display/FromStr enum columns.
//!
//! `save` writes the full record image -- the user row and all history
//! rows -- inside one transaction. The in-memory record is the source of
//! truth, so a crash mid-save leaves the previously committed image
//! intact, and stored history is exactly the (already capped) history on
//! the record.

use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use courier_core::repository::UserRepository;
use courier_types::error::RepositoryError;
use courier_types::params::ChatParams;
use courier_types::secret::Redacted;
use courier_types::user::{
    HistoryEntry, Language, MessageRole, SessionState, UserId, UserRecord,
};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct UserRow {
    user_id: String,
    credential: Option<String>,
    language: String,
    params: String,
    state: String,
    pending_param: Option<String>,
    created_at: String,
    updated_at: String,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            user_id: row.try_get("user_id")?,
            credential: row.try_get("credential")?,
            language: row.try_get("language")?,
            params: row.try_get("params")?,
            state: row.try_get("state")?,
            pending_param: row.try_get("pending_param")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_record(self, history: Vec<HistoryEntry>) -> Result<UserRecord, RepositoryError> {
        let language: Language = self
            .language
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let params: ChatParams = serde_json::from_str(&self.params)
            .map_err(|e| RepositoryError::Query(format!("invalid params json: {e}")))?;
        let state = SessionState::from_columns(&self.state, self.pending_param)
            .map_err(RepositoryError::Query)?;
        let created_at = parse_datetime(&self.created_at)?;
        let updated_at = parse_datetime(&self.updated_at)?;
        let credential = self
            .credential
            .filter(|c| !c.is_empty())
            .map(Redacted::new);

        Ok(UserRecord {
            user_id: UserId::new(self.user_id),
            credential,
            language,
            params,
            state,
            history,
            created_at,
            updated_at,
        })
    }
}

struct HistoryRow {
    role: String,
    content: String,
    created_at: String,
}

impl HistoryRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_entry(self) -> Result<HistoryEntry, RepositoryError> {
        let role: MessageRole = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let timestamp = parse_datetime(&self.created_at)?;
        Ok(HistoryEntry {
            role,
            content: self.content,
            timestamp,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn map_sqlx(err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            RepositoryError::Connection
        }
        other => RepositoryError::Query(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// UserRepository implementation
// ---------------------------------------------------------------------------

impl UserRepository for SqliteUserRepository {
    async fn load_or_create(&self, user_id: &UserId) -> Result<UserRecord, RepositoryError> {
        let row = sqlx::query(
            r#"SELECT user_id, credential, language, params, state, pending_param, created_at, updated_at
               FROM users WHERE user_id = ?"#,
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(map_sqlx)?;

        let Some(row) = row else {
            // First contact: persist a default record so the identity
            // exists even if this turn does nothing else.
            let record = UserRecord::new(user_id.clone());
            self.save(&record).await?;
            return Ok(record);
        };

        let user_row = UserRow::from_row(&row).map_err(map_sqlx)?;

        let history_rows = sqlx::query(
            r#"SELECT role, content, created_at FROM history
               WHERE user_id = ? ORDER BY position ASC"#,
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx)?;

        let history = history_rows
            .iter()
            .map(|row| HistoryRow::from_row(row).map_err(map_sqlx)?.into_entry())
            .collect::<Result<Vec<_>, _>>()?;

        user_row.into_record(history)
    }

    async fn save(&self, record: &UserRecord) -> Result<(), RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(map_sqlx)?;

        sqlx::query(
            r#"INSERT INTO users (user_id, credential, language, params, state, pending_param, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(user_id) DO UPDATE SET
                   credential = excluded.credential,
                   language = excluded.language,
                   params = excluded.params,
                   state = excluded.state,
                   pending_param = excluded.pending_param,
                   updated_at = excluded.updated_at"#,
        )
        .bind(record.user_id.as_str())
        .bind(record.credential.as_ref().map(|c| c.expose().to_string()))
        .bind(record.language.code())
        .bind(
            serde_json::to_string(&record.params)
                .map_err(|e| RepositoryError::Query(format!("params encode: {e}")))?,
        )
        .bind(record.state.tag())
        .bind(record.state.pending_param())
        .bind(format_datetime(&record.created_at))
        .bind(format_datetime(&record.updated_at))
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        // Rewrite the history image; the cap keeps this small.
        sqlx::query("DELETE FROM history WHERE user_id = ?")
            .bind(record.user_id.as_str())
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;

        for (position, entry) in record.history.iter().enumerate() {
            sqlx::query(
                r#"INSERT INTO history (id, user_id, position, role, content, created_at)
                   VALUES (?, ?, ?, ?, ?, ?)"#,
            )
            .bind(Uuid::now_v7().to_string())
            .bind(record.user_id.as_str())
            .bind(position as i64)
            .bind(entry.role.to_string())
            .bind(&entry.content)
            .bind(format_datetime(&entry.timestamp))
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;
        }

        tx.commit().await.map_err(map_sqlx)
    }
}
