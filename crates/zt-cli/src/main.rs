use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDateTime};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use zt_cli::commands::settings::SettingsUpdate;
use zt_cli::commands::{backup, day, holidays, report, settings, stats};
use zt_cli::{Cli, Commands, Config, HolidaysAction, ReportPeriodArgs, SettingsAction};
use zt_core::Period;

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(zt_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = zt_db::Database::open(&config.database_path).context("failed to open database")?;
    Ok((db, config))
}

const fn report_period(args: &ReportPeriodArgs) -> Period {
    if args.month {
        Period::Month
    } else if args.year {
        Period::Year
    } else if args.all {
        Period::AllTime
    } else {
        Period::Week
    }
}

/// Initialize tracing with verbose flag support.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run_holidays<W: Write>(
    out: &mut W,
    action: &HolidaysAction,
    config_path: Option<&Path>,
    now: NaiveDateTime,
) -> Result<()> {
    let (mut db, config) = open_database(config_path)?;
    match action {
        HolidaysAction::Fetch { year, country } => holidays::fetch(
            out,
            &mut db,
            &config,
            year.unwrap_or_else(|| now.year()),
            country.as_deref(),
        ),
        HolidaysAction::List { year } => {
            holidays::list(out, &db, &config, year.unwrap_or_else(|| now.year()))
        }
    }
}

fn run_settings<W: Write>(
    out: &mut W,
    action: &SettingsAction,
    config_path: Option<&Path>,
) -> Result<()> {
    let (db, _config) = open_database(config_path)?;
    match action {
        SettingsAction::Show => settings::show(out, &db),
        SettingsAction::Set {
            weekly_hours,
            vacation_days,
            gradient,
        } => settings::set(
            out,
            &db,
            SettingsUpdate {
                weekly_hours: *weekly_hours,
                vacation_days: *vacation_days,
                gradient: gradient.clone(),
            },
        ),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let now = Local::now().naive_local();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Some(Commands::Set { date, lines }) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            day::set(&mut out, &mut io::stdin().lock(), &db, &config, date, lines, now)?;
        }
        Some(Commands::Add { date, line }) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            day::add(&mut out, &db, &config, date, line, now)?;
        }
        Some(Commands::Remove { date, line }) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            day::remove(&mut out, &db, &config, date, line, now)?;
        }
        Some(Commands::Show { date, json }) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            day::show(&mut out, &db, &config, date.as_deref(), *json, now)?;
        }
        Some(Commands::Report(args)) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            report::run(
                &mut out,
                &db,
                &config,
                report_period(&args.period),
                args.date.as_deref(),
                args.json,
                now,
            )?;
        }
        Some(Commands::Stats { year, json }) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            stats::run(&mut out, &db, &config, *year, *json, now)?;
        }
        Some(Commands::Holidays(action)) => {
            run_holidays(&mut out, action, cli.config.as_deref(), now)?;
        }
        Some(Commands::Settings(action)) => {
            run_settings(&mut out, action, cli.config.as_deref())?;
        }
        Some(Commands::Export) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            backup::export(&mut out, &db)?;
        }
        Some(Commands::Import) => {
            let (mut db, _config) = open_database(cli.config.as_deref())?;
            let imported = backup::import(io::stdin().lock(), &mut db)?;
            eprintln!("Imported {imported} days.");
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
