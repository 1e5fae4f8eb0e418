//! Entry draft: the record-creation boundary.
//!
//! A draft holds one entry per configured unit while the user edits a day.
//! All validation of user input happens here; `finish` drops entries that
//! have neither income nor cost and produces the record to persist.

use super::aggregation::{self, RecordTotals};
use super::error::FamilyCostError;
use super::money::Amount;
use super::record::{DailyRecord, MiscItem, PurchaseItem, UnitEntry};
use super::unit::UnitRoster;
use chrono::NaiveDate;

pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Parse a user-entered amount. Blank input is zero.
pub fn parse_amount(field: &str, value: &str) -> Result<Amount, FamilyCostError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    match trimmed.parse::<Amount>() {
        Ok(n) if n >= 0 => Ok(n),
        _ => Err(FamilyCostError::InvalidAmount {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}

fn check_non_negative(field: &str, amount: Amount) -> Result<Amount, FamilyCostError> {
    if amount < 0 {
        return Err(FamilyCostError::InvalidAmount {
            field: field.to_string(),
            value: amount.to_string(),
        });
    }
    Ok(amount)
}

fn check_name(kind: &str, name: &str) -> Result<String, FamilyCostError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(FamilyCostError::InvalidEntry {
            reason: format!("{kind} item name must not be empty"),
        });
    }
    Ok(name.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDraft {
    id: Option<String>,
    date: NaiveDate,
    roster: UnitRoster,
    entries: Vec<UnitEntry>,
    bazar_items: Vec<PurchaseItem>,
    other_items: Vec<MiscItem>,
    building_income: Amount,
    loaded: bool,
}

impl RecordDraft {
    /// Blank draft: one zero entry per unit.
    pub fn new(date: NaiveDate, roster: &UnitRoster) -> Self {
        Self {
            id: None,
            date,
            roster: roster.clone(),
            entries: roster
                .names()
                .iter()
                .map(|name| UnitEntry::new(name.as_str(), 0, 0))
                .collect(),
            bazar_items: Vec::new(),
            other_items: Vec::new(),
            building_income: 0,
            loaded: false,
        }
    }

    /// Draft for `date`, pre-filled from the stored record for that date.
    ///
    /// Entries whose unit is not in the roster are carried over untouched so
    /// re-saving a day never drops historical data.
    pub fn load(date: NaiveDate, roster: &UnitRoster, existing: Option<&DailyRecord>) -> Self {
        let mut draft = Self::new(date, roster);
        let Some(record) = existing.filter(|r| r.date == date) else {
            return draft;
        };

        for entry in &mut draft.entries {
            if let Some(found) = record.unit_entry(&entry.unit_name) {
                *entry = found.clone();
            }
        }
        draft.entries.extend(
            record
                .unit_logs
                .iter()
                .filter(|e| !roster.contains(&e.unit_name))
                .cloned(),
        );
        draft.id = Some(record.id.clone()).filter(|id| !id.is_empty());
        draft.bazar_items = record.bazar_items.clone();
        draft.other_items = record.other_items.clone();
        draft.building_income = record.building_income;
        draft.loaded = true;
        draft
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// True when the draft updates a stored record.
    pub fn is_update(&self) -> bool {
        self.loaded
    }

    pub fn entries(&self) -> &[UnitEntry] {
        &self.entries
    }

    pub fn bazar_items(&self) -> &[PurchaseItem] {
        &self.bazar_items
    }

    pub fn other_items(&self) -> &[MiscItem] {
        &self.other_items
    }

    pub fn set_unit(
        &mut self,
        unit: &str,
        income: Amount,
        cost: Amount,
    ) -> Result<(), FamilyCostError> {
        if !self.roster.contains(unit) {
            return Err(FamilyCostError::UnknownUnit {
                name: unit.to_string(),
            });
        }
        let income = check_non_negative(&format!("{unit} income"), income)?;
        let cost = check_non_negative(&format!("{unit} cost"), cost)?;
        if let Some(entry) = self.entries.iter_mut().find(|e| e.unit_name == unit) {
            entry.income = income;
            entry.cost = cost;
        }
        Ok(())
    }

    pub fn set_building_income(&mut self, amount: Amount) -> Result<(), FamilyCostError> {
        self.building_income = check_non_negative("building income", amount)?;
        Ok(())
    }

    /// Returns the new item's id.
    pub fn add_bazar(&mut self, name: &str, price: Amount) -> Result<String, FamilyCostError> {
        let name = check_name("bazar", name)?;
        let price = check_non_negative(&format!("{name} price"), price)?;
        let id = new_id();
        self.bazar_items.push(PurchaseItem::new(id.clone(), name, price));
        Ok(id)
    }

    /// Returns the new item's id.
    pub fn add_other(&mut self, name: &str, price: Amount) -> Result<String, FamilyCostError> {
        let name = check_name("other", name)?;
        let price = check_non_negative(&format!("{name} price"), price)?;
        let id = new_id();
        self.other_items.push(MiscItem::new(id.clone(), name, price));
        Ok(id)
    }

    /// Remove a bazar or other item by id. Returns whether anything was removed.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.bazar_items.len() + self.other_items.len();
        self.bazar_items.retain(|i| i.id != id);
        self.other_items.retain(|i| i.id != id);
        before != self.bazar_items.len() + self.other_items.len()
    }

    fn to_record(&self, entries: Vec<UnitEntry>) -> DailyRecord {
        DailyRecord {
            id: self.id.clone().unwrap_or_default(),
            date: self.date,
            unit_logs: entries,
            bazar_items: self.bazar_items.clone(),
            other_items: self.other_items.clone(),
            building_income: self.building_income,
        }
    }

    /// Totals of the draft as currently edited, zero entries included.
    pub fn totals(&self) -> RecordTotals {
        aggregation::record_totals(&self.to_record(self.entries.clone()))
    }

    /// Validate and produce the record to persist.
    pub fn finish(self) -> Result<DailyRecord, FamilyCostError> {
        for entry in &self.entries {
            check_non_negative(&format!("{} income", entry.unit_name), entry.income)?;
            check_non_negative(&format!("{} cost", entry.unit_name), entry.cost)?;
        }
        for item in &self.bazar_items {
            check_name("bazar", &item.name)?;
            check_non_negative(&format!("{} price", item.name), item.price)?;
        }
        for item in &self.other_items {
            check_name("other", &item.name)?;
            check_non_negative(&format!("{} price", item.name), item.price)?;
        }
        check_non_negative("building income", self.building_income)?;

        let entries = self.entries.iter().filter(|e| !e.is_empty()).cloned().collect();
        let mut record = self.to_record(entries);
        if record.id.is_empty() {
            record.id = new_id();
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn roster() -> UnitRoster {
        UnitRoster::new(["Car", "Auto"]).unwrap()
    }

    #[test]
    fn parse_amount_accepts_blank_and_digits() {
        assert_eq!(parse_amount("income", "").unwrap(), 0);
        assert_eq!(parse_amount("income", " 3000 ").unwrap(), 3000);
    }

    #[test]
    fn parse_amount_rejects_negative_and_text() {
        assert!(matches!(
            parse_amount("cost", "-5"),
            Err(FamilyCostError::InvalidAmount { field, .. }) if field == "cost"
        ));
        assert!(parse_amount("cost", "12.5").is_err());
        assert!(parse_amount("cost", "ten").is_err());
    }

    #[test]
    fn new_draft_has_one_zero_entry_per_unit() {
        let draft = RecordDraft::new(date(2026, 2, 10), &roster());
        assert_eq!(draft.entries().len(), 2);
        assert!(draft.entries().iter().all(UnitEntry::is_empty));
        assert!(!draft.is_update());
        assert_eq!(draft.totals(), RecordTotals::default());
    }

    #[test]
    fn finish_drops_empty_entries() {
        let mut draft = RecordDraft::new(date(2026, 2, 10), &roster());
        draft.set_unit("Car", 3000, 200).unwrap();
        let record = draft.finish().unwrap();
        assert_eq!(record.unit_logs.len(), 1);
        assert_eq!(record.unit_logs[0].unit_name, "Car");
        assert!(!record.id.is_empty());
    }

    #[test]
    fn zero_entry_contributes_nothing_before_save() {
        let mut draft = RecordDraft::new(date(2026, 2, 10), &roster());
        draft.set_unit("Car", 3000, 200).unwrap();
        draft.set_unit("Auto", 0, 0).unwrap();
        let totals = draft.totals();
        assert_eq!(totals.income, 3000);
        assert_eq!(totals.cost, 200);
    }

    #[test]
    fn set_unit_rejects_unknown_and_negative() {
        let mut draft = RecordDraft::new(date(2026, 2, 10), &roster());
        assert!(matches!(
            draft.set_unit("Truck", 1, 1),
            Err(FamilyCostError::UnknownUnit { name }) if name == "Truck"
        ));
        assert!(matches!(
            draft.set_unit("Car", -1, 0),
            Err(FamilyCostError::InvalidAmount { .. })
        ));
        assert!(draft.set_building_income(-10).is_err());
    }

    #[test]
    fn items_can_be_added_and_removed() {
        let mut draft = RecordDraft::new(date(2026, 2, 10), &roster());
        let rice = draft.add_bazar(" Rice ", 450).unwrap();
        draft.add_other("Phone", 100).unwrap();
        assert_eq!(draft.bazar_items()[0].name, "Rice");
        assert_eq!(draft.totals().cost, 550);

        assert!(draft.remove_item(&rice));
        assert!(!draft.remove_item(&rice));
        assert_eq!(draft.totals().cost, 100);
    }

    #[test]
    fn add_item_rejects_blank_name() {
        let mut draft = RecordDraft::new(date(2026, 2, 10), &roster());
        assert!(matches!(
            draft.add_bazar("  ", 10),
            Err(FamilyCostError::InvalidEntry { .. })
        ));
        assert!(draft.add_other("Fuel", -3).is_err());
    }

    #[test]
    fn load_prefills_from_existing_record() {
        let d = date(2026, 2, 10);
        let mut existing = DailyRecord::new("keep-me", d);
        existing.unit_logs.push(UnitEntry::new("Car", 3000, 200));
        existing.unit_logs.push(UnitEntry::new("Old-Unit", 10, 0));
        existing.bazar_items.push(PurchaseItem::new("b1", "Rice", 450));
        existing.building_income = 1000;

        let draft = RecordDraft::load(d, &roster(), Some(&existing));
        assert!(draft.is_update());
        assert_eq!(draft.entries().len(), 3);
        assert_eq!(draft.entries()[0], UnitEntry::new("Car", 3000, 200));
        assert!(draft.entries()[1].is_empty());

        let record = draft.finish().unwrap();
        assert_eq!(record.id, "keep-me");
        assert_eq!(record.unit_logs.len(), 2);
        assert!(record.unit_entry("Old-Unit").is_some());
        assert_eq!(record.bazar_items.len(), 1);
        assert_eq!(record.building_income, 1000);
    }

    #[test]
    fn load_ignores_record_for_other_date() {
        let existing = DailyRecord::new("x", date(2026, 2, 9));
        let draft = RecordDraft::load(date(2026, 2, 10), &roster(), Some(&existing));
        assert!(!draft.is_update());
    }

    #[test]
    fn finish_rejects_negative_stored_values() {
        let d = date(2026, 2, 10);
        let mut existing = DailyRecord::new("x", d);
        existing.bazar_items.push(PurchaseItem::new("b1", "Refund", -50));
        let draft = RecordDraft::load(d, &roster(), Some(&existing));
        assert!(draft.finish().is_err());
    }
}
