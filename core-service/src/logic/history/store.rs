//! History Store - SQLite detection log
//!
//! Append-only. Rows are read back newest first. Timestamps are stored as
//! fixed-width RFC 3339 UTC text so lexical order is chronological.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::record::DetectionLogRecord;
use crate::logic::error::{CoreResult, DetectionError};

pub trait HistoryStore: Send + Sync {
    /// Insert a record, returning its id
    fn append(&self, record: &DetectionLogRecord) -> CoreResult<i64>;

    /// Most recent `limit` records, newest first
    fn recent(&self, limit: usize) -> CoreResult<Vec<DetectionLogRecord>>;

    fn get(&self, id: i64) -> CoreResult<Option<DetectionLogRecord>>;
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS detection_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    filename TEXT NOT NULL,
    verdict TEXT NOT NULL,
    probability REAL NOT NULL,
    timestamp TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_detection_logs_timestamp ON detection_logs(timestamp DESC);
"#;

pub struct SqliteHistoryStore {
    conn: Mutex<Connection>,
}

impl SqliteHistoryStore {
    /// Open (or create) the log at `path`, creating parent directories
    pub fn open(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    DetectionError::History(format!("cannot create {}: {}", parent.display(), e))
                })?;
            }
        }

        let store = Self::init(Connection::open(path)?)?;
        log::info!("Detection history at {}", path.display());
        Ok(store)
    }

    pub fn open_in_memory() -> CoreResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> CoreResult<Self> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<(i64, String, String, f64, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn to_record(raw: (i64, String, String, f64, String)) -> CoreResult<DetectionLogRecord> {
    let (id, filename, verdict, probability, timestamp) = raw;
    let timestamp = DateTime::parse_from_rfc3339(&timestamp)
        .map_err(|e| DetectionError::History(format!("row {}: bad timestamp '{}': {}", id, timestamp, e)))?
        .with_timezone(&Utc);

    Ok(DetectionLogRecord {
        id: Some(id),
        filename,
        verdict: verdict.parse()?,
        probability,
        timestamp,
    })
}

impl HistoryStore for SqliteHistoryStore {
    fn append(&self, record: &DetectionLogRecord) -> CoreResult<i64> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO detection_logs (filename, verdict, probability, timestamp) VALUES (?1, ?2, ?3, ?4)",
            params![
                record.filename,
                record.verdict.as_str(),
                record.probability,
                record.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
            ],
        )?;
        let id = conn.last_insert_rowid();
        log::debug!("Logged scan #{} ({}: {})", id, record.filename, record.verdict);
        Ok(id)
    }

    fn recent(&self, limit: usize) -> CoreResult<Vec<DetectionLogRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, filename, verdict, probability, timestamp FROM detection_logs \
             ORDER BY timestamp DESC, id DESC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![limit as i64], from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        // One corrupt row must not hide the rest of the log
        let records = rows
            .into_iter()
            .filter_map(|raw| match to_record(raw) {
                Ok(record) => Some(record),
                Err(e) => {
                    log::warn!("Skipping unreadable detection log row: {}", e);
                    None
                }
            })
            .collect();
        Ok(records)
    }

    fn get(&self, id: i64) -> CoreResult<Option<DetectionLogRecord>> {
        let conn = self.conn.lock();
        let raw = conn
            .query_row(
                "SELECT id, filename, verdict, probability, timestamp FROM detection_logs WHERE id = ?1",
                params![id],
                from_row,
            )
            .optional()?;

        raw.map(to_record).transpose()
    }
}
