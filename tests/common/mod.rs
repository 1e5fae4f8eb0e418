#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use family_cost::domain::error::FamilyCostError;
use family_cost::domain::ledger;
pub use family_cost::domain::record::{DailyRecord, MiscItem, PurchaseItem, UnitEntry};
use family_cost::ports::clock_port::ClockPort;
use family_cost::ports::record_port::RecordPort;
use std::cell::{Cell, RefCell};

pub struct MockRecordPort {
    pub records: RefCell<Vec<DailyRecord>>,
    pub fail_saves: Cell<bool>,
}

impl MockRecordPort {
    pub fn new() -> Self {
        Self {
            records: RefCell::new(Vec::new()),
            fail_saves: Cell::new(false),
        }
    }

    pub fn with_records(records: Vec<DailyRecord>) -> Self {
        let port = Self::new();
        *port.records.borrow_mut() = records;
        port
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }
}

impl RecordPort for MockRecordPort {
    fn all_records(&self) -> Result<Vec<DailyRecord>, FamilyCostError> {
        Ok(self.records.borrow().clone())
    }

    fn save_record(&self, record: &DailyRecord) -> Result<(), FamilyCostError> {
        if self.fail_saves.get() {
            return Err(FamilyCostError::Storage {
                reason: "save rejected".into(),
            });
        }
        ledger::upsert(&mut self.records.borrow_mut(), record.clone());
        Ok(())
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Noon UTC on the given day.
    pub fn at(y: i32, m: u32, d: u32) -> Self {
        Self(Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap())
    }
}

impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_record(d: NaiveDate, units: &[(&str, i64, i64)], bazar: &[(&str, i64)]) -> DailyRecord {
    let mut record = DailyRecord::new(format!("id-{d}"), d);
    record.unit_logs = units
        .iter()
        .map(|(name, income, cost)| UnitEntry::new(*name, *income, *cost))
        .collect();
    record.bazar_items = bazar
        .iter()
        .enumerate()
        .map(|(i, (name, price))| PurchaseItem::new(format!("b{i}"), *name, *price))
        .collect();
    record
}
