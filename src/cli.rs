//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_file_adapter::JsonFileAdapter;
use crate::adapters::system_clock::SystemClock;
use crate::adapters::text_report::TextReportAdapter;
use crate::domain::aggregation::{self, RecordTotals};
use crate::domain::calendar::BusinessCalendar;
use crate::domain::config_validation::validate_config;
use crate::domain::draft::{RecordDraft, parse_amount};
use crate::domain::error::FamilyCostError;
use crate::domain::ledger;
use crate::domain::money::{Amount, format_amount};
use crate::domain::period::{MonthPeriod, Period};
use crate::domain::record::{DailyRecord, parse_date};
use crate::domain::settings::{
    DEFAULT_CURRENCY, DEFAULT_JSON_PATH, DEFAULT_SQLITE_PATH, ReportSettings, Settings,
    StorageBackend, StorageSettings,
};
use crate::domain::unit::UnitRoster;
use crate::ports::clock_port::ClockPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::record_port::RecordPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "family-cost", about = "Daily income and expense tracker")]
pub struct Cli {
    /// INI configuration file; defaults apply when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create or update the record for a day
    Add {
        /// YYYY-MM-DD, defaults to today in the business zone
        #[arg(long)]
        date: Option<String>,
        #[arg(long = "unit", value_name = "NAME=INCOME/COST")]
        units: Vec<String>,
        #[arg(long = "bazar", value_name = "NAME=PRICE")]
        bazar: Vec<String>,
        #[arg(long = "other", value_name = "NAME=PRICE")]
        other: Vec<String>,
        #[arg(long)]
        building: Option<String>,
        /// Start from a blank record instead of the stored one
        #[arg(long)]
        fresh: bool,
    },
    /// Today's and the month's totals, unit sums and bazar by date
    Stats {
        /// YYYY-MM, defaults to the current month
        #[arg(long)]
        month: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List stored records, newest first
    History {
        #[arg(long)]
        month: Option<String>,
    },
    /// Day-by-day figures for one unit
    Unit {
        name: String,
        #[arg(long)]
        month: Option<String>,
    },
    /// Validate configuration and look for unattributable unit entries
    Check,
}

/// Arguments of the `add` command after parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddRequest {
    pub date: Option<NaiveDate>,
    pub units: Vec<(String, Amount, Amount)>,
    pub bazar: Vec<(String, Amount)>,
    pub other: Vec<(String, Amount)>,
    pub building: Option<Amount>,
    pub fresh: bool,
}

pub fn run(cli: Cli) -> ExitCode {
    let settings = match load_settings(cli.config.as_ref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let store = match open_store(&settings.storage) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let report = TextReportAdapter::new(
        settings.report.currency.clone(),
        settings.report.hide_idle_units,
    );
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = match cli.command {
        Command::Add {
            date,
            units,
            bazar,
            other,
            building,
            fresh,
        } => parse_add_request(date.as_deref(), &units, &bazar, &other, building.as_deref(), fresh)
            .and_then(|req| run_add(store.as_ref(), &settings, &SystemClock, &req))
            .map(|(record, updated)| print_saved(&record, updated, &settings.report)),
        Command::Stats { month, output } => run_stats(
            store.as_ref(),
            &settings,
            &SystemClock,
            &report,
            month.as_deref(),
            output.as_ref(),
            &mut out,
        ),
        Command::History { month } => {
            run_history(store.as_ref(), &report, month.as_deref(), &mut out)
        }
        Command::Unit { name, month } => run_unit(
            store.as_ref(),
            &settings,
            &report,
            &name,
            month.as_deref(),
            &mut out,
        ),
        Command::Check => run_check(store.as_ref(), &settings, &mut out),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, FamilyCostError> {
    FileConfigAdapter::from_file(path).map_err(|e| FamilyCostError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub fn load_settings(path: Option<&PathBuf>) -> Result<Settings, FamilyCostError> {
    let adapter = match path {
        Some(p) => {
            tracing::debug!(path = %p.display(), "loading config");
            load_config(p)?
        }
        None => FileConfigAdapter::empty(),
    };
    validate_config(&adapter)?;
    build_settings(&adapter)
}

pub fn build_settings(adapter: &dyn ConfigPort) -> Result<Settings, FamilyCostError> {
    let roster = match adapter.get_string("units", "names") {
        Some(names) => UnitRoster::parse(&names).map_err(|e| FamilyCostError::ConfigInvalid {
            section: "units".into(),
            key: "names".into(),
            reason: e.to_string(),
        })?,
        None => UnitRoster::default(),
    };

    let calendar = match adapter.get_string("calendar", "utc_offset") {
        Some(offset) => BusinessCalendar::new(BusinessCalendar::parse_offset(&offset).map_err(
            |_| FamilyCostError::ConfigInvalid {
                section: "calendar".into(),
                key: "utc_offset".into(),
                reason: "expected an offset like +06:00".into(),
            },
        )?),
        None => BusinessCalendar::default(),
    };

    let backend = match adapter
        .get_string("storage", "backend")
        .map(|b| b.trim().to_lowercase())
        .as_deref()
    {
        None | Some("json") => StorageBackend::Json,
        Some("sqlite") => StorageBackend::Sqlite,
        Some(other) => {
            return Err(FamilyCostError::ConfigInvalid {
                section: "storage".into(),
                key: "backend".into(),
                reason: format!("unknown backend {other:?}, expected json or sqlite"),
            });
        }
    };
    let path = adapter
        .get_string("storage", "path")
        .map(PathBuf::from)
        .unwrap_or_else(|| match backend {
            StorageBackend::Json => PathBuf::from(DEFAULT_JSON_PATH),
            StorageBackend::Sqlite => PathBuf::from(DEFAULT_SQLITE_PATH),
        });

    Ok(Settings {
        roster,
        calendar,
        storage: StorageSettings {
            backend,
            path,
            pool_size: adapter.get_int("sqlite", "pool_size", 4).clamp(1, 64) as u32,
        },
        report: ReportSettings {
            currency: adapter
                .get_string("report", "currency")
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            hide_idle_units: adapter.get_bool("report", "hide_idle_units", false),
        },
    })
}

pub fn open_store(settings: &StorageSettings) -> Result<Box<dyn RecordPort>, FamilyCostError> {
    match settings.backend {
        StorageBackend::Json => {
            tracing::debug!(path = %settings.path.display(), "using json record store");
            Ok(Box::new(JsonFileAdapter::new(settings.path.clone())))
        }
        #[cfg(feature = "sqlite")]
        StorageBackend::Sqlite => {
            use crate::adapters::sqlite_adapter::SqliteAdapter;
            Ok(Box::new(SqliteAdapter::from_settings(settings)?))
        }
        #[cfg(not(feature = "sqlite"))]
        StorageBackend::Sqlite => Err(FamilyCostError::ConfigInvalid {
            section: "storage".into(),
            key: "backend".into(),
            reason: "sqlite feature is required for the sqlite backend".into(),
        }),
    }
}

/// Parse `NAME=INCOME/COST`; the cost part may be omitted.
pub fn parse_unit_arg(arg: &str) -> Result<(String, Amount, Amount), FamilyCostError> {
    let (name, amounts) = arg.rsplit_once('=').ok_or_else(|| FamilyCostError::InvalidEntry {
        reason: format!("expected NAME=INCOME/COST, got {arg:?}"),
    })?;
    let name = name.trim();
    let (income, cost) = amounts.split_once('/').unwrap_or((amounts, ""));
    Ok((
        name.to_string(),
        parse_amount(&format!("{name} income"), income)?,
        parse_amount(&format!("{name} cost"), cost)?,
    ))
}

/// Parse `NAME=PRICE`.
pub fn parse_item_arg(arg: &str) -> Result<(String, Amount), FamilyCostError> {
    let (name, price) = arg.rsplit_once('=').ok_or_else(|| FamilyCostError::InvalidEntry {
        reason: format!("expected NAME=PRICE, got {arg:?}"),
    })?;
    let name = name.trim();
    if price.trim().is_empty() {
        return Err(FamilyCostError::InvalidAmount {
            field: format!("{name} price"),
            value: price.to_string(),
        });
    }
    Ok((name.to_string(), parse_amount(&format!("{name} price"), price)?))
}

pub fn parse_add_request(
    date: Option<&str>,
    units: &[String],
    bazar: &[String],
    other: &[String],
    building: Option<&str>,
    fresh: bool,
) -> Result<AddRequest, FamilyCostError> {
    Ok(AddRequest {
        date: date.map(parse_date).transpose()?,
        units: units.iter().map(|u| parse_unit_arg(u)).collect::<Result<_, _>>()?,
        bazar: bazar.iter().map(|b| parse_item_arg(b)).collect::<Result<_, _>>()?,
        other: other.iter().map(|o| parse_item_arg(o)).collect::<Result<_, _>>()?,
        building: building
            .map(|b| parse_amount("building income", b))
            .transpose()?,
        fresh,
    })
}

pub fn resolve_month(
    month: Option<&str>,
    today: NaiveDate,
) -> Result<MonthPeriod, FamilyCostError> {
    match month {
        Some(m) => MonthPeriod::parse(m),
        None => Ok(MonthPeriod::of(today)),
    }
}

fn resolve_period(month: Option<&str>) -> Result<Period, FamilyCostError> {
    match month {
        Some(m) => Ok(Period::Month(MonthPeriod::parse(m)?)),
        None => Ok(Period::AllTime),
    }
}

/// Load-or-create the draft for the requested day, apply edits and save.
///
/// Returns the saved record and whether it replaced a stored one.
pub fn run_add(
    store: &dyn RecordPort,
    settings: &Settings,
    clock: &dyn ClockPort,
    req: &AddRequest,
) -> Result<(DailyRecord, bool), FamilyCostError> {
    let date = req.date.unwrap_or_else(|| settings.calendar.today(clock));
    let existing = store.find_by_date(date)?;

    let mut draft = if req.fresh {
        RecordDraft::new(date, &settings.roster)
    } else {
        RecordDraft::load(date, &settings.roster, existing.as_ref())
    };

    for (name, income, cost) in &req.units {
        draft.set_unit(name, *income, *cost)?;
    }
    for (name, price) in &req.bazar {
        draft.add_bazar(name, *price)?;
    }
    for (name, price) in &req.other {
        draft.add_other(name, *price)?;
    }
    if let Some(building) = req.building {
        draft.set_building_income(building)?;
    }

    let mut record = draft.finish()?;
    if let Some(previous) = existing.as_ref().filter(|_| req.fresh) {
        record.id = previous.id.clone();
    }
    store.save_record(&record)?;
    Ok((record, existing.is_some()))
}

fn print_saved(record: &DailyRecord, updated: bool, report: &ReportSettings) {
    let RecordTotals {
        income,
        cost,
        balance,
    } = aggregation::record_totals(record);
    eprintln!(
        "{} record for {}: in {}  out {}  balance {} {}",
        if updated { "Updated" } else { "Saved" },
        record.date,
        format_amount(income),
        format_amount(cost),
        report.currency,
        format_amount(balance),
    );
}

pub fn run_stats(
    store: &dyn RecordPort,
    settings: &Settings,
    clock: &dyn ClockPort,
    report: &dyn ReportPort,
    month: Option<&str>,
    output: Option<&PathBuf>,
    out: &mut dyn Write,
) -> Result<(), FamilyCostError> {
    let today = settings.calendar.today(clock);
    let month = resolve_month(month, today)?;
    let records = store.all_records()?;
    tracing::debug!(count = records.len(), %today, %month, "computing dashboard");

    let dashboard = aggregation::summarize(&records, &settings.roster, today, month);

    match output {
        Some(path) => {
            let mut buf = Vec::new();
            report.write_dashboard(&dashboard, &mut buf)?;
            fs::write(path, buf)?;
            eprintln!("Report written to: {}", path.display());
        }
        None => report.write_dashboard(&dashboard, out)?,
    }
    Ok(())
}

pub fn run_history(
    store: &dyn RecordPort,
    report: &dyn ReportPort,
    month: Option<&str>,
    out: &mut dyn Write,
) -> Result<(), FamilyCostError> {
    let period = resolve_period(month)?;
    let mut records: Vec<DailyRecord> = store
        .all_records()?
        .into_iter()
        .filter(|r| period.contains(r.date))
        .collect();
    ledger::sort_newest_first(&mut records);
    report.write_history(&records, out)
}

pub fn run_unit(
    store: &dyn RecordPort,
    settings: &Settings,
    report: &dyn ReportPort,
    name: &str,
    month: Option<&str>,
    out: &mut dyn Write,
) -> Result<(), FamilyCostError> {
    let period = resolve_period(month)?;
    if !settings.roster.contains(name) {
        eprintln!("warning: {name:?} is not a configured unit");
    }
    let records = store.all_records()?;
    let history = aggregation::unit_history(&records, name, period);
    report.write_unit_history(&history, period, out)
}

pub fn run_check(
    store: &dyn RecordPort,
    settings: &Settings,
    out: &mut dyn Write,
) -> Result<(), FamilyCostError> {
    let records = store.all_records()?;
    writeln!(out, "Units:    {}", settings.roster.names().join(", "))?;
    writeln!(out, "Offset:   {}", settings.calendar.offset())?;
    writeln!(
        out,
        "Storage:  {:?} at {}",
        settings.storage.backend,
        settings.storage.path.display()
    )?;
    writeln!(out, "Records:  {}", records.len())?;

    let unmatched = aggregation::unmatched_unit_names(&records, &settings.roster);
    if unmatched.is_empty() {
        writeln!(out, "All unit entries match a configured unit.")?;
    } else {
        for name in &unmatched {
            tracing::warn!(unit = %name, "unit entries do not match any configured unit");
            writeln!(out, "warning: entries for {name:?} match no configured unit")?;
        }
    }
    Ok(())
}
