use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use clinic_cli::commands::view::Period;
use clinic_cli::commands::{exception, hours, status, status_override, util, view};
use clinic_cli::{Cli, Commands, Config, ExceptionAction, HoursAction, OverrideAction};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(clinic_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = clinic_db::Database::open(&config.database_path).with_context(|| {
        format!("failed to open {}", config.database_path.display())
    })?;
    Ok((db, config))
}

#[expect(
    clippy::too_many_lines,
    reason = "CLI command dispatch is inherently verbose"
)]
fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let now = Utc::now();
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Some(Commands::Status { at, json }) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            let at = at
                .as_deref()
                .map(|s| util::parse_instant(s, now))
                .transpose()?
                .unwrap_or(now);
            status::run(&mut stdout, &db, &config, at, json)?;
        }
        Some(Commands::Week { date, json }) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            let today = now.with_timezone(&config.tz()?).date_naive();
            let period = Period::Week(date.unwrap_or(today));
            view::run(&mut stdout, &db, &config, now, period, json)?;
        }
        Some(Commands::Month { year, month, json }) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            let today = now.with_timezone(&config.tz()?).date_naive();
            let period = Period::Month {
                year: year.unwrap_or_else(|| today.year()),
                month: month.unwrap_or_else(|| today.month()),
            };
            view::run(&mut stdout, &db, &config, now, period, json)?;
        }
        Some(Commands::Hours(action)) => {
            let (mut db, _config) = open_database(cli.config.as_deref())?;
            match action {
                HoursAction::Show { json } => hours::show(&mut stdout, &db, json)?,
                HoursAction::Set { weekday, ranges } => {
                    hours::set(&mut stdout, &mut db, weekday, &ranges)?;
                }
            }
        }
        Some(Commands::Exception(action)) => {
            let (mut db, _config) = open_database(cli.config.as_deref())?;
            match action {
                ExceptionAction::Add {
                    date,
                    end_date,
                    closed: _,
                    hours,
                    yearly,
                    note,
                    id,
                } => {
                    let args = exception::AddArgs {
                        date,
                        end_date,
                        hours,
                        yearly,
                        note,
                        id,
                    };
                    exception::add(&mut stdout, &mut db, &args)?;
                }
                ExceptionAction::List { json } => exception::list(&mut stdout, &db, json)?,
                ExceptionAction::Remove { id } => exception::remove(&mut stdout, &mut db, &id)?,
            }
        }
        Some(Commands::Override(action)) => {
            let (mut db, config) = open_database(cli.config.as_deref())?;
            match action {
                OverrideAction::Set {
                    status,
                    from,
                    to,
                    description,
                    next_return,
                } => {
                    let args = status_override::SetArgs {
                        status,
                        from,
                        to,
                        description,
                        next_return,
                    };
                    status_override::set(&mut stdout, &mut db, &args, now)?;
                }
                OverrideAction::Clear => status_override::clear(&mut stdout, &mut db, now)?,
                OverrideAction::Show { json } => {
                    status_override::show(&mut stdout, &db, &config, now, json)?;
                }
            }
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            writeln!(stdout)?;
        }
    }

    Ok(())
}
