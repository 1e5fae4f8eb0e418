//! Plain-text report adapter.

use crate::domain::aggregation::{self, Dashboard, UnitHistory};
use crate::domain::error::FamilyCostError;
use crate::domain::money::{Amount, format_amount};
use crate::domain::period::Period;
use crate::domain::record::DailyRecord;
use crate::ports::report_port::ReportPort;
use std::io::Write;

pub struct TextReportAdapter {
    currency: String,
    hide_idle_units: bool,
}

impl TextReportAdapter {
    pub fn new(currency: impl Into<String>, hide_idle_units: bool) -> Self {
        Self {
            currency: currency.into(),
            hide_idle_units,
        }
    }

    fn money(&self, amount: Amount) -> String {
        format!("{} {}", self.currency, format_amount(amount))
    }
}

impl ReportPort for TextReportAdapter {
    fn write_dashboard(
        &self,
        d: &Dashboard,
        out: &mut dyn Write,
    ) -> Result<(), FamilyCostError> {
        writeln!(out, "=== Family Cost: {} ===", d.month.label())?;

        writeln!(out, "\nToday ({})", d.today)?;
        writeln!(out, "  Income:         {}", self.money(d.today_totals.income))?;
        writeln!(out, "  Cost:           {}", self.money(d.today_totals.cost))?;

        let m = &d.monthly;
        writeln!(out, "\nMonthly")?;
        writeln!(out, "  Income:         {}", self.money(m.income))?;
        writeln!(out, "    Units:        {}", self.money(m.unit_income))?;
        writeln!(out, "    Building:     {}", self.money(m.building_income))?;
        writeln!(out, "  Cost:           {}", self.money(m.cost))?;
        writeln!(out, "    Unit cost:    {}", self.money(m.unit_cost))?;
        writeln!(out, "    Bazar:        {}", self.money(m.bazar))?;
        writeln!(out, "    Other:        {}", self.money(m.other))?;
        writeln!(out, "  Balance:        {}", self.money(m.balance))?;

        writeln!(out, "\n=== Unit Sums ===")?;
        let width = d.units.iter().map(|u| u.unit.len()).max().unwrap_or(0);
        for u in &d.units {
            if self.hide_idle_units && u.income == 0 && u.cost == 0 {
                continue;
            }
            writeln!(
                out,
                "  {:<width$}  in {:>10}  out {:>10}  net {:>10}",
                u.unit,
                format_amount(u.income),
                format_amount(u.cost),
                format_amount(u.net),
            )?;
        }

        writeln!(out, "\n=== Bazar by Date ===")?;
        if d.bazar_by_date.is_empty() {
            writeln!(out, "  No bazar records found")?;
        }
        for b in &d.bazar_by_date {
            writeln!(out, "  {}  {}", b.date, self.money(b.total))?;
        }

        if d.available_months.len() > 1 {
            let months: Vec<String> = d.available_months.iter().map(|m| m.to_string()).collect();
            writeln!(out, "\nMonths with data: {}", months.join(", "))?;
        }
        Ok(())
    }

    fn write_history(
        &self,
        records: &[DailyRecord],
        out: &mut dyn Write,
    ) -> Result<(), FamilyCostError> {
        writeln!(out, "{} records found", records.len())?;
        for record in records {
            let totals = aggregation::record_totals(record);
            writeln!(
                out,
                "\n{} {:<9}  in: {}  out: {}  balance: {}",
                record.date,
                record.date.format("%A"),
                format_amount(totals.income),
                format_amount(totals.cost),
                self.money(totals.balance),
            )?;
            for entry in &record.unit_logs {
                writeln!(
                    out,
                    "    {:<16} in {:>8}  out {:>8}",
                    entry.unit_name,
                    format_amount(entry.income),
                    format_amount(entry.cost),
                )?;
            }
            if record.building_income != 0 {
                writeln!(out, "    building income  {}", self.money(record.building_income))?;
            }
            for item in &record.bazar_items {
                writeln!(out, "    bazar: {:<20} {}", item.name, self.money(item.price))?;
            }
            for item in &record.other_items {
                writeln!(out, "    other: {:<20} {}", item.name, self.money(item.price))?;
            }
        }
        Ok(())
    }

    fn write_unit_history(
        &self,
        history: &UnitHistory,
        period: Period,
        out: &mut dyn Write,
    ) -> Result<(), FamilyCostError> {
        let label = match period {
            Period::AllTime => "All time".to_string(),
            Period::Month(m) => m.label(),
        };
        let t = &history.totals;
        writeln!(out, "=== {} ({}) ===", t.unit, label)?;
        writeln!(out, "  Total in:   {}", self.money(t.income))?;
        writeln!(out, "  Total out:  {}", self.money(t.cost))?;
        writeln!(out, "  Net:        {}", self.money(t.net))?;

        if history.days.is_empty() {
            writeln!(out, "\n  No history available")?;
            return Ok(());
        }
        writeln!(out)?;
        for day in history.days.iter().rev() {
            writeln!(
                out,
                "  {}  in {:>8}  out {:>8}  net {:>8}",
                day.date,
                format_amount(day.income),
                format_amount(day.cost),
                format_amount(day.net),
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::period::MonthPeriod;
    use crate::domain::record::{PurchaseItem, UnitEntry};
    use crate::domain::unit::UnitRoster;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn records() -> Vec<DailyRecord> {
        let mut r = DailyRecord::new("r1", date(2026, 2, 10));
        r.unit_logs.push(UnitEntry::new("Car", 3000, 200));
        r.bazar_items.push(PurchaseItem::new("b1", "Rice", 450));
        r.building_income = 1000;
        vec![r]
    }

    fn render(f: impl FnOnce(&mut Vec<u8>)) -> String {
        let mut buf = Vec::new();
        f(&mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn dashboard_shows_totals() {
        let roster = UnitRoster::new(["Car", "Auto"]).unwrap();
        let month = MonthPeriod::new(2026, 2).unwrap();
        let dashboard = aggregation::summarize(&records(), &roster, date(2026, 2, 10), month);
        let report = TextReportAdapter::new("TK", false);
        let text = render(|buf| report.write_dashboard(&dashboard, buf).unwrap());

        assert!(text.contains("February 2026"));
        assert!(text.contains("Income:         TK 3,000"));
        assert!(text.contains("Cost:           TK 650"));
        assert!(text.contains("Balance:        TK 3,350"));
        assert!(text.contains("2026-02-10  TK 450"));
        assert!(text.contains("Auto"));
    }

    #[test]
    fn dashboard_can_hide_idle_units() {
        let roster = UnitRoster::new(["Car", "Auto"]).unwrap();
        let month = MonthPeriod::new(2026, 2).unwrap();
        let dashboard = aggregation::summarize(&records(), &roster, date(2026, 2, 10), month);
        let report = TextReportAdapter::new("TK", true);
        let text = render(|buf| report.write_dashboard(&dashboard, buf).unwrap());
        assert!(!text.contains("Auto"));
    }

    #[test]
    fn empty_dashboard_says_no_bazar() {
        let month = MonthPeriod::new(2026, 2).unwrap();
        let dashboard =
            aggregation::summarize(&[], &UnitRoster::default(), date(2026, 2, 10), month);
        let text = render(|buf| {
            TextReportAdapter::new("TK", false)
                .write_dashboard(&dashboard, buf)
                .unwrap()
        });
        assert!(text.contains("No bazar records found"));
    }

    #[test]
    fn history_lists_record_breakdown() {
        let report = TextReportAdapter::new("TK", false);
        let text = render(|buf| report.write_history(&records(), buf).unwrap());
        assert!(text.starts_with("1 records found"));
        assert!(text.contains("2026-02-10 Tuesday"));
        assert!(text.contains("balance: TK 3,350"));
        assert!(text.contains("bazar: Rice"));
    }

    #[test]
    fn unit_history_newest_first() {
        let mut older = DailyRecord::new("r0", date(2026, 2, 1));
        older.unit_logs.push(UnitEntry::new("Car", 100, 0));
        let mut all = records();
        all.push(older);
        let history = aggregation::unit_history(&all, "Car", Period::AllTime);
        let report = TextReportAdapter::new("TK", false);
        let text = render(|buf| report.write_unit_history(&history, Period::AllTime, buf).unwrap());

        assert!(text.contains("=== Car (All time) ==="));
        let newer = text.find("2026-02-10").unwrap();
        let older = text.find("2026-02-01").unwrap();
        assert!(newer < older);
    }

    #[test]
    fn unit_history_without_days() {
        let history = aggregation::unit_history(&[], "Car", Period::AllTime);
        let text = render(|buf| {
            TextReportAdapter::new("TK", false)
                .write_unit_history(&history, Period::AllTime, buf)
                .unwrap()
        });
        assert!(text.contains("No history available"));
    }
}
