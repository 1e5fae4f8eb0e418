//! Typed application settings.

use super::calendar::BusinessCalendar;
use super::unit::UnitRoster;
use std::path::PathBuf;

pub const DEFAULT_JSON_PATH: &str = "family-cost.json";
pub const DEFAULT_SQLITE_PATH: &str = "family-cost.db";
pub const DEFAULT_CURRENCY: &str = "TK";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// One JSON array file on the local device.
    Json,
    /// Document-per-date SQLite database.
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub path: PathBuf,
    pub pool_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSettings {
    pub currency: String,
    /// Leave units with no income and no cost out of the unit sums.
    pub hide_idle_units: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub roster: UnitRoster,
    pub calendar: BusinessCalendar,
    pub storage: StorageSettings,
    pub report: ReportSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            roster: UnitRoster::default(),
            calendar: BusinessCalendar::default(),
            storage: StorageSettings {
                backend: StorageBackend::Json,
                path: PathBuf::from(DEFAULT_JSON_PATH),
                pool_size: 4,
            },
            report: ReportSettings {
                currency: DEFAULT_CURRENCY.to_string(),
                hide_idle_units: false,
            },
        }
    }
}
