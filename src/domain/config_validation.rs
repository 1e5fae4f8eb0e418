//! Configuration validation.
//!
//! Checks every configured field before the settings are built. Missing
//! keys are fine: each one has a default.

use super::calendar::BusinessCalendar;
use super::error::FamilyCostError;
use super::unit::UnitRoster;
use crate::ports::config_port::ConfigPort;

pub const STORAGE_BACKENDS: [&str; 2] = ["json", "sqlite"];

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), FamilyCostError> {
    validate_units(config)?;
    validate_utc_offset(config)?;
    validate_storage(config)?;
    validate_pool_size(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> FamilyCostError {
    FamilyCostError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_units(config: &dyn ConfigPort) -> Result<(), FamilyCostError> {
    match config.get_string("units", "names") {
        None => Ok(()),
        Some(names) => UnitRoster::parse(&names).map(|_| ()).map_err(|e| match e {
            FamilyCostError::InvalidEntry { reason } => invalid("units", "names", reason),
            other => other,
        }),
    }
}

fn validate_utc_offset(config: &dyn ConfigPort) -> Result<(), FamilyCostError> {
    match config.get_string("calendar", "utc_offset") {
        None => Ok(()),
        Some(value) => BusinessCalendar::parse_offset(&value)
            .map(|_| ())
            .map_err(|_| invalid("calendar", "utc_offset", "expected an offset like +06:00")),
    }
}

fn validate_storage(config: &dyn ConfigPort) -> Result<(), FamilyCostError> {
    if let Some(backend) = config.get_string("storage", "backend") {
        let backend = backend.trim().to_lowercase();
        if !STORAGE_BACKENDS.contains(&backend.as_str()) {
            return Err(invalid(
                "storage",
                "backend",
                format!("unknown backend {backend:?}, expected json or sqlite"),
            ));
        }
    }
    if let Some(path) = config.get_string("storage", "path") {
        if path.trim().is_empty() {
            return Err(invalid("storage", "path", "path must not be empty"));
        }
    }
    Ok(())
}

fn validate_pool_size(config: &dyn ConfigPort) -> Result<(), FamilyCostError> {
    let Some(raw) = config.get_string("sqlite", "pool_size") else {
        return Ok(());
    };
    match raw.trim().parse::<i64>() {
        Ok(value) if (1..=64).contains(&value) => Ok(()),
        Ok(_) => Err(invalid("sqlite", "pool_size", "pool_size must be between 1 and 64")),
        Err(_) => Err(invalid(
            "sqlite",
            "pool_size",
            format!("expected an integer, got {raw:?}"),
        )),
    }
}
