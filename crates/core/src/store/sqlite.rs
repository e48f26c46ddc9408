//! SQLite-backed result store implementation.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde_json::Value;

use super::{JobStatus, MediaResult, ResultStore, ResultUpdate, StoreError};

/// SQLite-backed result store.
pub struct SqliteResultStore {
    conn: Mutex<Connection>,
}

impl SqliteResultStore {
    /// Create a new SQLite store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            -- One result document per notetaker job
            CREATE TABLE IF NOT EXISTS media_results (
                job_id TEXT PRIMARY KEY,
                meet_url TEXT NOT NULL,
                status TEXT NOT NULL,
                transcript TEXT,
                folder_url TEXT,
                error TEXT,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_media_results_updated ON media_results(updated_at);

            -- Create-only markers: one bot invite per calendar event
            CREATE TABLE IF NOT EXISTS dispatch_records (
                event_id TEXT PRIMARY KEY,
                job_id TEXT NOT NULL,
                dispatched_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn row_to_result(row: &rusqlite::Row) -> rusqlite::Result<(MediaResult, Option<String>)> {
        let status_str: String = row.get(2)?;
        let transcript_str: Option<String> = row.get(3)?;
        let updated_at_str: String = row.get(6)?;

        let status = match status_str.as_str() {
            "ready" => JobStatus::Ready,
            "failed" => JobStatus::Failed,
            _ => JobStatus::Processing,
        };

        let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok((
            MediaResult {
                job_id: row.get(0)?,
                meet_url: row.get(1)?,
                status,
                transcript: None, // decoded by the caller
                folder_url: row.get(4)?,
                error: row.get(5)?,
                updated_at,
            },
            transcript_str,
        ))
    }
}

impl ResultStore for SqliteResultStore {
    fn upsert(&self, job_id: &str, update: ResultUpdate) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        let now_str = Utc::now().to_rfc3339();

        let transcript_str = match &update.transcript {
            Some(value) => Some(
                serde_json::to_string(value)
                    .map_err(|e| StoreError::Corrupt(e.to_string()))?,
            ),
            None => None,
        };

        conn.execute(
            "INSERT INTO media_results (job_id, meet_url, status, transcript, folder_url, error, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(job_id) DO UPDATE SET
                meet_url = excluded.meet_url,
                status = excluded.status,
                transcript = excluded.transcript,
                folder_url = excluded.folder_url,
                error = excluded.error,
                updated_at = excluded.updated_at",
            params![
                job_id,
                &update.meet_url,
                update.status.as_str(),
                &transcript_str,
                &update.folder_url,
                &update.error,
                &now_str,
            ],
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get(&self, job_id: &str) -> Result<Option<MediaResult>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let row = conn
            .query_row(
                "SELECT job_id, meet_url, status, transcript, folder_url, error, updated_at
                 FROM media_results WHERE job_id = ?",
                params![job_id],
                Self::row_to_result,
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                _ => Err(StoreError::Database(e.to_string())),
            })?;

        match row {
            Some((mut result, transcript_str)) => {
                if let Some(s) = transcript_str {
                    let value: Value = serde_json::from_str(&s)
                        .map_err(|e| StoreError::Corrupt(e.to_string()))?;
                    result.transcript = Some(value);
                }
                Ok(Some(result))
            }
            None => Ok(None),
        }
    }

    fn delete(&self, job_id: &str) -> Result<u64, StoreError> {
        let conn = self.conn.lock().unwrap();

        let rows_affected = conn
            .execute("DELETE FROM media_results WHERE job_id = ?", params![job_id])
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(rows_affected as u64)
    }

    fn record_dispatch(
        &self,
        event_id: &str,
        job_id: &str,
        dispatched_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();

        let result = conn.execute(
            "INSERT INTO dispatch_records (event_id, job_id, dispatched_at) VALUES (?, ?, ?)",
            params![event_id, job_id, dispatched_at.to_rfc3339()],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(StoreError::DuplicateDispatch(event_id.to_string()))
            }
            Err(e) => Err(StoreError::Database(e.to_string())),
        }
    }

    fn has_dispatch(&self, event_id: &str) -> Result<bool, StoreError> {
        let conn = self.conn.lock().unwrap();

        let exists: bool = conn
            .query_row(
                "SELECT 1 FROM dispatch_records WHERE event_id = ?",
                params![event_id],
                |_| Ok(true),
            )
            .unwrap_or(false);

        Ok(exists)
    }
}
