//! Concrete adapter implementations for ports.

pub mod file_config_adapter;
pub mod json_file_adapter;
#[cfg(feature = "sqlite")]
pub mod sqlite_adapter;
pub mod system_clock;
pub mod text_report;
