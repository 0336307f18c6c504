//! Submission storage (SQLite)
//!
//! Append-only record of assessed submissions; reports are re-derived from
//! the stored measurements.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assessment::{Assessment, MeasurementSet, RiskLevel};
use crate::form::{SiteInfo, WaterSource};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("stored JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("submission {id} has invalid field: {detail}")]
    InvalidRecord { id: i64, detail: String },
}

/// A persisted submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: i64,
    pub site: SiteInfo,
    pub measurements: MeasurementSet,
    pub risk: RiskLevel,
    pub issues: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Append-only store of assessed submissions
pub struct SubmissionStore {
    conn: Connection,
}

const SELECT_COLUMNS: &str =
    "SELECT id, name, location, source, measurements, risk, issues, created_at FROM submissions";

impl SubmissionStore {
    /// Open (or create) a file-backed store. `":memory:"` gives a private
    /// in-memory database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<(), StorageError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS submissions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                location TEXT NOT NULL,
                source TEXT NOT NULL,
                measurements TEXT NOT NULL,
                risk TEXT NOT NULL,
                issues TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_submissions_risk ON submissions(risk)",
            [],
        )?;
        Ok(())
    }

    /// Persist one assessed submission, returning its id
    pub fn record(
        &self,
        site: &SiteInfo,
        measurements: &MeasurementSet,
        assessment: &Assessment,
    ) -> Result<i64, StorageError> {
        self.record_at(site, measurements, assessment, Utc::now())
    }

    pub fn record_at(
        &self,
        site: &SiteInfo,
        measurements: &MeasurementSet,
        assessment: &Assessment,
        created_at: DateTime<Utc>,
    ) -> Result<i64, StorageError> {
        self.conn.execute(
            "INSERT INTO submissions (name, location, source, measurements, risk, issues, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                site.name,
                site.location,
                site.source.as_str(),
                serde_json::to_string(measurements)?,
                assessment.risk.as_str(),
                serde_json::to_string(&assessment.issues)?,
                created_at.to_rfc3339(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!("Recorded submission {} (risk: {})", id, assessment.risk);
        Ok(id)
    }

    pub fn get(&self, id: i64) -> Result<Option<SubmissionRecord>, StorageError> {
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let raw = self
            .conn
            .query_row(&sql, params![id], RawRecord::from_row)
            .optional()?;
        raw.map(RawRecord::into_record).transpose()
    }

    /// Most recent submission, if any
    pub fn latest(&self) -> Result<Option<SubmissionRecord>, StorageError> {
        Ok(self.recent(1)?.into_iter().next())
    }

    /// Newest first
    pub fn recent(&self, limit: usize) -> Result<Vec<SubmissionRecord>, StorageError> {
        let sql = format!("{} ORDER BY id DESC LIMIT ?1", SELECT_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![limit as i64], RawRecord::from_row)?;

        let mut records = Vec::new();
        for raw in rows {
            records.push(raw?.into_record()?);
        }
        Ok(records)
    }

    pub fn count(&self) -> Result<usize, StorageError> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM submissions", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}

/// Row as stored, before JSON/enum decoding
struct RawRecord {
    id: i64,
    name: String,
    location: String,
    source: String,
    measurements: String,
    risk: String,
    issues: String,
    created_at: String,
}

impl RawRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            location: row.get(2)?,
            source: row.get(3)?,
            measurements: row.get(4)?,
            risk: row.get(5)?,
            issues: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    fn into_record(self) -> Result<SubmissionRecord, StorageError> {
        let id = self.id;
        let risk = self
            .risk
            .parse::<RiskLevel>()
            .map_err(|detail| StorageError::InvalidRecord { id, detail })?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| StorageError::InvalidRecord {
                id,
                detail: format!("created_at: {}", e),
            })?
            .with_timezone(&Utc);

        Ok(SubmissionRecord {
            id,
            site: SiteInfo {
                name: self.name,
                location: self.location,
                source: WaterSource::parse(&self.source),
            },
            measurements: serde_json::from_str(&self.measurements)?,
            risk,
            issues: serde_json::from_str(&self.issues)?,
            created_at,
        })
    }
}
