//! Work-time ledger CLI library.
//!
//! This crate provides the CLI interface for the work-time ledger.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, HolidaysAction, ReportArgs, ReportPeriodArgs, SettingsAction};
pub use config::Config;
