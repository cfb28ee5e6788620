//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Personal work-time ledger.
///
/// Records one free-form text per day (`08:00 - 12:00`, `urlaub`, ...) and
/// reports totals, break compliance and statistics.
#[derive(Debug, Parser)]
#[command(name = "zt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replace the text of a day (reads stdin when no lines are given).
    Set {
        /// Day as yyyy-mm-dd, `today` or `yesterday`.
        date: String,
        /// Lines of the day, one argument per line.
        lines: Vec<String>,
    },

    /// Append one line to a day.
    Add {
        /// Day as yyyy-mm-dd, `today` or `yesterday`.
        date: String,
        /// The line to append, e.g. "13:00 - 17:00 Homeoffice".
        line: String,
    },

    /// Remove the entry that came from the given line.
    Remove {
        /// Day as yyyy-mm-dd, `today` or `yesterday`.
        date: String,
        /// The original line of the entry.
        line: String,
    },

    /// Show the details of one day.
    Show {
        /// Day as yyyy-mm-dd, `today` or `yesterday` (default: today).
        date: Option<String>,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show totals for a period.
    Report(ReportArgs),

    /// Show yearly statistics.
    Stats {
        /// Year to analyse (default: current year).
        #[arg(long)]
        year: Option<i32>,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Manage cached public holidays.
    #[command(subcommand)]
    Holidays(HolidaysAction),

    /// Show or change user settings.
    #[command(subcommand)]
    Settings(SettingsAction),

    /// Write all days and settings as JSON to stdout.
    Export,

    /// Restore days and settings from JSON on stdin.
    Import,
}

/// Period selection for `zt report`.
#[derive(Debug, Args)]
#[group(multiple = false)]
pub struct ReportPeriodArgs {
    /// The week (Monday to Sunday) around the date (default).
    #[arg(long)]
    pub week: bool,
    /// The calendar month around the date.
    #[arg(long)]
    pub month: bool,
    /// The calendar year around the date.
    #[arg(long)]
    pub year: bool,
    /// Everything stored.
    #[arg(long)]
    pub all: bool,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub period: ReportPeriodArgs,
    /// Reference date (default: today).
    #[arg(long)]
    pub date: Option<String>,
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum HolidaysAction {
    /// Download the holidays of a year into the local cache.
    Fetch {
        /// Year to fetch (default: current year).
        #[arg(long)]
        year: Option<i32>,
        /// Two-letter country code (default: from config).
        #[arg(long)]
        country: Option<String>,
    },
    /// List cached holidays of a year.
    List {
        /// Year to list (default: current year).
        #[arg(long)]
        year: Option<i32>,
    },
}

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Print the current settings as JSON.
    Show,
    /// Change settings.
    Set {
        /// Contracted hours per week.
        #[arg(long)]
        weekly_hours: Option<f64>,
        /// Vacation days per year.
        #[arg(long)]
        vacation_days: Option<u32>,
        /// Background gradient name.
        #[arg(long)]
        gradient: Option<String>,
    },
}
