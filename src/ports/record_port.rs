//! Record store port trait.

use crate::domain::error::FamilyCostError;
use crate::domain::record::DailyRecord;
use chrono::NaiveDate;

/// Read/write access to the canonical list of daily records.
///
/// Implementations make no ordering promise for `all_records`. Saving a
/// record whose date already exists replaces the stored record.
pub trait RecordPort {
    fn all_records(&self) -> Result<Vec<DailyRecord>, FamilyCostError>;

    fn save_record(&self, record: &DailyRecord) -> Result<(), FamilyCostError>;

    /// Default implementation: linear scan over `all_records`.
    fn find_by_date(&self, date: NaiveDate) -> Result<Option<DailyRecord>, FamilyCostError> {
        Ok(self.all_records()?.into_iter().find(|r| r.date == date))
    }
}
