//! Core domain types and logic.

pub mod money;
pub mod record;
pub mod unit;
pub mod period;
pub mod calendar;
pub mod aggregation;
pub mod ledger;
pub mod draft;
pub mod config_validation;
pub mod settings;
pub mod error;
