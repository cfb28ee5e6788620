//! CLI subcommand implementations.

pub mod backup;
pub mod day;
pub mod holidays;
pub mod report;
pub mod settings;
pub mod stats;
pub mod util;
