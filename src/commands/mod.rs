//! CLI commands for chatlens

pub mod accuracy;
pub mod analyze;
pub mod dispatch;
pub mod report;
pub mod summary;
