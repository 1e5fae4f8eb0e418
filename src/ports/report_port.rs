//! Report output port trait.

use crate::domain::aggregation::{Dashboard, UnitHistory};
use crate::domain::error::FamilyCostError;
use crate::domain::period::Period;
use crate::domain::record::DailyRecord;
use std::io::Write;

/// Port for rendering aggregation results.
pub trait ReportPort {
    fn write_dashboard(
        &self,
        dashboard: &Dashboard,
        out: &mut dyn Write,
    ) -> Result<(), FamilyCostError>;

    /// `records` are listed in the order given.
    fn write_history(
        &self,
        records: &[DailyRecord],
        out: &mut dyn Write,
    ) -> Result<(), FamilyCostError>;

    fn write_unit_history(
        &self,
        history: &UnitHistory,
        period: Period,
        out: &mut dyn Write,
    ) -> Result<(), FamilyCostError>;
}
