//! Domain error types.
//!
//! The aggregation engine never produces these; they surface from the
//! record-creation boundary, configuration, and the record stores.

/// Top-level error type for family-cost.
#[derive(Debug, thiserror::Error)]
pub enum FamilyCostError {
    #[error("storage error: {reason}")]
    Storage { reason: String },

    #[error("storage query error: {reason}")]
    StorageQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid date {value:?}: expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("invalid amount for {field}: {value:?}")]
    InvalidAmount { field: String, value: String },

    #[error("invalid entry: {reason}")]
    InvalidEntry { reason: String },

    #[error("unknown unit {name:?}")]
    UnknownUnit { name: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&FamilyCostError> for std::process::ExitCode {
    fn from(err: &FamilyCostError) -> Self {
        let code: u8 = match err {
            FamilyCostError::Io(_) => 1,
            FamilyCostError::ConfigParse { .. } | FamilyCostError::ConfigInvalid { .. } => 2,
            FamilyCostError::Storage { .. }
            | FamilyCostError::StorageQuery { .. }
            | FamilyCostError::Json(_) => 3,
            FamilyCostError::InvalidDate { .. }
            | FamilyCostError::InvalidAmount { .. }
            | FamilyCostError::InvalidEntry { .. }
            | FamilyCostError::UnknownUnit { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
