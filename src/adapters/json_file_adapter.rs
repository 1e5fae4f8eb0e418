//! Local JSON file record store.
//!
//! The whole record list lives in one file as a JSON array, the same shape
//! the web client kept in local storage. Documents that fail to decode are
//! skipped on read and written back untouched on save, unless the
//! saved record has the same date.

use crate::domain::error::FamilyCostError;
use crate::domain::ledger;
use crate::domain::record::DailyRecord;
use crate::ports::record_port::RecordPort;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

pub struct JsonFileAdapter {
    path: PathBuf,
}

struct Snapshot {
    records: Vec<DailyRecord>,
    undecodable: Vec<Value>,
}

impl JsonFileAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_snapshot(&self) -> Result<Snapshot, FamilyCostError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "record file missing, starting empty");
                return Ok(Snapshot {
                    records: Vec::new(),
                    undecodable: Vec::new(),
                });
            }
            Err(e) => {
                return Err(FamilyCostError::Storage {
                    reason: format!("failed to read {}: {}", self.path.display(), e),
                });
            }
        };

        if content.trim().is_empty() {
            return Ok(Snapshot {
                records: Vec::new(),
                undecodable: Vec::new(),
            });
        }

        let documents: Vec<Value> =
            serde_json::from_str(&content).map_err(|e| FamilyCostError::Storage {
                reason: format!("{} is not a JSON array of records: {}", self.path.display(), e),
            })?;

        let mut records = Vec::with_capacity(documents.len());
        let mut undecodable = Vec::new();
        for (index, document) in documents.into_iter().enumerate() {
            match serde_json::from_value::<DailyRecord>(document.clone()) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping malformed record document");
                    undecodable.push(document);
                }
            }
        }

        Ok(Snapshot {
            records,
            undecodable,
        })
    }

    fn write_snapshot(&self, snapshot: &Snapshot) -> Result<(), FamilyCostError> {
        let mut documents = Vec::with_capacity(snapshot.records.len() + snapshot.undecodable.len());
        for record in &snapshot.records {
            documents.push(serde_json::to_value(record)?);
        }
        documents.extend(snapshot.undecodable.iter().cloned());

        let body = serde_json::to_string_pretty(&documents)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).map_err(|e| FamilyCostError::Storage {
            reason: format!("failed to write {}: {}", tmp.display(), e),
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| FamilyCostError::Storage {
            reason: format!("failed to replace {}: {}", self.path.display(), e),
        })?;
        Ok(())
    }
}

impl RecordPort for JsonFileAdapter {
    fn all_records(&self) -> Result<Vec<DailyRecord>, FamilyCostError> {
        let snapshot = self.read_snapshot()?;
        tracing::debug!(
            count = snapshot.records.len(),
            path = %self.path.display(),
            "loaded records"
        );
        Ok(snapshot.records)
    }

    fn save_record(&self, record: &DailyRecord) -> Result<(), FamilyCostError> {
        let mut snapshot = self.read_snapshot()?;
        let key = record.date_key();
        snapshot.undecodable.retain(|document| {
            let same_date = document.get("date").and_then(Value::as_str).map(str::trim)
                == Some(key.as_str());
            if same_date {
                tracing::warn!(date = %key, "replacing malformed record document");
            }
            !same_date
        });
        let replaced = ledger::upsert(&mut snapshot.records, record.clone());
        ledger::sort_newest_first(&mut snapshot.records);
        self.write_snapshot(&snapshot)?;
        tracing::info!(date = %record.date_key(), replaced = replaced.is_some(), "saved record");
        Ok(())
    }
}
