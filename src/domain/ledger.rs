//! In-memory record collection with one-record-per-date semantics.

use super::record::DailyRecord;

/// Insert `record`, replacing any record with the same date.
///
/// Returns the replaced record, if there was one.
pub fn upsert(records: &mut Vec<DailyRecord>, record: DailyRecord) -> Option<DailyRecord> {
    let mut replaced = None;
    records.retain(|r| {
        if r.date == record.date {
            replaced.get_or_insert_with(|| r.clone());
            false
        } else {
            true
        }
    });
    records.push(record);
    replaced
}

/// Sort newest first, the order records are listed in.
pub fn sort_newest_first(records: &mut [DailyRecord]) {
    records.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
}
