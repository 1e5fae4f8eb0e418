//! Aggregation engine: summary statistics over a snapshot of daily records.
//!
//! Every function here is pure. Input order does not matter; where output
//! order is meaningful it is established by sorting. Nothing here fails:
//! bad input was either rejected at record creation or already coerced to
//! zero when the record was decoded.

use super::money::{self, Amount};
use super::period::{MonthPeriod, Period};
use super::record::DailyRecord;
use super::unit::UnitRoster;
use chrono::NaiveDate;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DayTotals {
    pub income: Amount,
    pub cost: Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonthlyTotals {
    pub unit_income: Amount,
    pub building_income: Amount,
    pub unit_cost: Amount,
    pub bazar: Amount,
    pub other: Amount,
    /// unit_income + building_income
    pub income: Amount,
    /// unit_cost + bazar + other
    pub cost: Amount,
    /// income - cost
    pub balance: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitTotals {
    pub unit: String,
    pub income: Amount,
    pub cost: Amount,
    pub net: Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatedTotal {
    pub date: NaiveDate,
    pub total: Amount,
}

/// Figures for a single record as listed in the history view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordTotals {
    pub income: Amount,
    pub cost: Amount,
    pub balance: Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitDay {
    pub date: NaiveDate,
    pub income: Amount,
    pub cost: Amount,
    pub net: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitHistory {
    pub totals: UnitTotals,
    /// Oldest first.
    pub days: Vec<UnitDay>,
}

/// Everything the stats screen shows, computed in one pass over a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub today: NaiveDate,
    pub month: MonthPeriod,
    pub today_totals: DayTotals,
    pub monthly: MonthlyTotals,
    pub units: Vec<UnitTotals>,
    pub bazar_by_date: Vec<DatedTotal>,
    pub available_months: Vec<MonthPeriod>,
}

/// Income and cost of the record dated `today`.
///
/// Income counts unit entries only. Cost counts unit costs plus every bazar
/// and other item. Zero when no record exists for `today`.
pub fn today_totals(records: &[DailyRecord], today: NaiveDate) -> DayTotals {
    // A raw snapshot may hold more than one record for a date; all of them count.
    let (income, cost) = records
        .iter()
        .filter(|r| r.date == today)
        .fold((0, 0), |(income, cost): (Amount, Amount), r| {
            let day_cost = money::total([r.unit_cost(), r.bazar_total(), r.other_total()]);
            (income.saturating_add(r.unit_income()), cost.saturating_add(day_cost))
        });
    DayTotals { income, cost }
}

pub fn monthly_totals(records: &[DailyRecord], month: MonthPeriod) -> MonthlyTotals {
    let mut totals = MonthlyTotals::default();
    for record in records.iter().filter(|r| month.contains(r.date)) {
        totals.unit_income = totals.unit_income.saturating_add(record.unit_income());
        totals.building_income = totals.building_income.saturating_add(record.building_income);
        totals.unit_cost = totals.unit_cost.saturating_add(record.unit_cost());
        totals.bazar = totals.bazar.saturating_add(record.bazar_total());
        totals.other = totals.other.saturating_add(record.other_total());
    }
    totals.income = totals.unit_income.saturating_add(totals.building_income);
    totals.cost = money::total([totals.unit_cost, totals.bazar, totals.other]);
    totals.balance = totals.income.saturating_sub(totals.cost);
    totals
}

fn totals_for_unit(records: &[DailyRecord], unit: &str, period: Period) -> UnitTotals {
    let mut income: Amount = 0;
    let mut cost: Amount = 0;
    for record in records.iter().filter(|r| period.contains(r.date)) {
        if let Some(entry) = record.unit_entry(unit) {
            income = income.saturating_add(entry.income);
            cost = cost.saturating_add(entry.cost);
        }
    }
    UnitTotals {
        unit: unit.to_string(),
        income,
        cost,
        net: income.saturating_sub(cost),
    }
}

/// Per-unit totals in roster order, matched by exact unit name.
pub fn unit_totals(
    records: &[DailyRecord],
    roster: &UnitRoster,
    period: Period,
) -> Vec<UnitTotals> {
    roster
        .names()
        .iter()
        .map(|unit| totals_for_unit(records, unit, period))
        .collect()
}

/// Daily bazar spend for every record that has bazar items, newest first.
pub fn bazar_by_date(records: &[DailyRecord], period: Period) -> Vec<DatedTotal> {
    let mut out: Vec<DatedTotal> = records
        .iter()
        .filter(|r| !r.bazar_items.is_empty() && period.contains(r.date))
        .map(|r| DatedTotal {
            date: r.date,
            total: r.bazar_total(),
        })
        .collect();
    // Tie-break on total so duplicate dates still give a stable order.
    out.sort_by(|a, b| b.date.cmp(&a.date).then(b.total.cmp(&a.total)));
    out
}

pub fn record_totals(record: &DailyRecord) -> RecordTotals {
    let income = record.unit_income().saturating_add(record.building_income);
    let cost = money::total([record.unit_cost(), record.bazar_total(), record.other_total()]);
    RecordTotals {
        income,
        cost,
        balance: income.saturating_sub(cost),
    }
}

/// Day-by-day figures for one unit, oldest first, with period totals.
pub fn unit_history(records: &[DailyRecord], unit: &str, period: Period) -> UnitHistory {
    let mut days: Vec<UnitDay> = records
        .iter()
        .filter(|r| period.contains(r.date))
        .filter_map(|r| {
            r.unit_entry(unit).map(|e| UnitDay {
                date: r.date,
                income: e.income,
                cost: e.cost,
                net: e.income.saturating_sub(e.cost),
            })
        })
        .collect();
    days.sort_by(|a, b| a.date.cmp(&b.date).then(a.net.cmp(&b.net)));

    UnitHistory {
        totals: totals_for_unit(records, unit, period),
        days,
    }
}

/// Distinct months that have at least one record, newest first.
pub fn available_months(records: &[DailyRecord]) -> Vec<MonthPeriod> {
    let months: BTreeSet<MonthPeriod> = records.iter().map(|r| MonthPeriod::of(r.date)).collect();
    months.into_iter().rev().collect()
}

/// Unit names present in records that match no configured unit.
///
/// Entries under such names are invisible to the per-unit breakdown,
/// typically because a unit was renamed after data was recorded.
pub fn unmatched_unit_names(records: &[DailyRecord], roster: &UnitRoster) -> Vec<String> {
    let names: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.unit_logs.iter())
        .map(|e| e.unit_name.as_str())
        .filter(|name| !roster.contains(name))
        .collect();
    names.into_iter().map(str::to_string).collect()
}

pub fn summarize(
    records: &[DailyRecord],
    roster: &UnitRoster,
    today: NaiveDate,
    month: MonthPeriod,
) -> Dashboard {
    let period = Period::Month(month);
    Dashboard {
        today,
        month,
        today_totals: today_totals(records, today),
        monthly: monthly_totals(records, month),
        units: unit_totals(records, roster, period),
        bazar_by_date: bazar_by_date(records, period),
        available_months: available_months(records),
    }
}
