//! SQLite document store.
//!
//! One row per date holding the record's JSON document, mirroring a
//! document database collection keyed by date.

use crate::domain::error::FamilyCostError;
use crate::domain::record::{DATE_FORMAT, DailyRecord};
use crate::domain::settings::StorageSettings;
use crate::ports::record_port::RecordPort;
use chrono::NaiveDate;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{OptionalExtension, params};

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteAdapter {
    pub fn from_settings(settings: &StorageSettings) -> Result<Self, FamilyCostError> {
        let manager = SqliteConnectionManager::file(&settings.path);
        let pool = Pool::builder()
            .max_size(settings.pool_size)
            .build(manager)
            .map_err(|e: r2d2::Error| FamilyCostError::Storage {
                reason: e.to_string(),
            })?;

        let adapter = Self { pool };
        adapter.initialize_schema()?;
        tracing::debug!(path = %settings.path.display(), "opened sqlite store");
        Ok(adapter)
    }

    pub fn in_memory() -> Result<Self, FamilyCostError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e: r2d2::Error| FamilyCostError::Storage {
                reason: e.to_string(),
            })?;

        let adapter = Self { pool };
        adapter.initialize_schema()?;
        Ok(adapter)
    }

    fn connection(&self) -> Result<PooledConnection<SqliteConnectionManager>, FamilyCostError> {
        self.pool.get().map_err(|e: r2d2::Error| FamilyCostError::Storage {
            reason: e.to_string(),
        })
    }

    pub fn initialize_schema(&self) -> Result<(), FamilyCostError> {
        let conn = self.connection()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS logs (
                date TEXT PRIMARY KEY NOT NULL,
                id TEXT NOT NULL,
                document TEXT NOT NULL
            );",
        )
        .map_err(|e: rusqlite::Error| FamilyCostError::StorageQuery {
            reason: e.to_string(),
        })?;
        Ok(())
    }

    /// Store a raw document under `date` without decoding it.
    pub fn insert_raw(&self, date: &str, id: &str, document: &str) -> Result<(), FamilyCostError> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT OR REPLACE INTO logs (date, id, document) VALUES (?1, ?2, ?3)",
            params![date, id, document],
        )
        .map_err(|e: rusqlite::Error| FamilyCostError::StorageQuery {
            reason: e.to_string(),
        })?;
        Ok(())
    }

    fn decode(date: &str, document: &str) -> Option<DailyRecord> {
        match serde_json::from_str::<DailyRecord>(document) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(date, error = %e, "skipping malformed record document");
                None
            }
        }
    }
}

impl RecordPort for SqliteAdapter {
    fn all_records(&self) -> Result<Vec<DailyRecord>, FamilyCostError> {
        let conn = self.connection()?;
        let mut stmt = conn
            .prepare("SELECT date, document FROM logs ORDER BY date DESC")
            .map_err(|e: rusqlite::Error| FamilyCostError::StorageQuery {
                reason: e.to_string(),
            })?;

        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
            .map_err(|e: rusqlite::Error| FamilyCostError::StorageQuery {
                reason: e.to_string(),
            })?;

        let mut records = Vec::new();
        for row in rows {
            let (date, document) = row.map_err(|e: rusqlite::Error| FamilyCostError::StorageQuery {
                reason: e.to_string(),
            })?;
            records.extend(Self::decode(&date, &document));
        }

        tracing::debug!(count = records.len(), "loaded records");
        Ok(records)
    }

    fn save_record(&self, record: &DailyRecord) -> Result<(), FamilyCostError> {
        let document = serde_json::to_string(record)?;
        self.insert_raw(&record.date_key(), &record.id, &document)?;
        tracing::info!(date = %record.date_key(), "saved record");
        Ok(())
    }

    fn find_by_date(&self, date: NaiveDate) -> Result<Option<DailyRecord>, FamilyCostError> {
        let conn = self.connection()?;
        let key = date.format(DATE_FORMAT).to_string();
        let document: Option<String> = conn
            .query_row(
                "SELECT document FROM logs WHERE date = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e: rusqlite::Error| FamilyCostError::StorageQuery {
                reason: e.to_string(),
            })?;

        Ok(document.and_then(|doc| Self::decode(&key, &doc)))
    }
}
