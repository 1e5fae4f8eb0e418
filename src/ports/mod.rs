//! Port traits for the collaborators the domain talks to.

pub mod clock_port;
pub mod config_port;
pub mod record_port;
pub mod report_port;
