//! Command-line front end for the attendance tracker.
//!
//! # Responsibility
//! - Parse commands and configuration, then call `rollcall_core`.
//! - Own the presentation concerns the core leaves out: confirmation
//!   prompts, reading import files, writing export files.

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use rollcall_core::db::open_db;
use rollcall_core::{
    default_log_level, export_file_name, init_logging, AttendanceTracker, ConfirmPrompt, DateKey,
    Mark, MutationOutcome, SqliteKeyValueStore, StudentId, TrackerError,
};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

const DEFAULT_DB_FILE: &str = "rollcall.sqlite3";
const STDOUT_PATH: &str = "-";

#[derive(Parser)]
#[command(name = "rollcall", version, about = "Class attendance tracker")]
struct Cli {
    /// SQLite file holding the roster and attendance.
    #[arg(long, global = true, env = "ROLLCALL_DB", default_value = DEFAULT_DB_FILE)]
    db: PathBuf,
    /// Log level (trace|debug|info|warn|error).
    #[arg(long, global = true, env = "ROLLCALL_LOG_LEVEL")]
    log_level: Option<String>,
    /// Absolute directory for rolling log files; file logging is off when unset.
    #[arg(long, global = true, env = "ROLLCALL_LOG_DIR")]
    log_dir: Option<String>,
    /// Answer yes to every confirmation prompt.
    #[arg(long, short = 'y', global = true, default_value_t = false)]
    yes: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a student to the end of the roster.
    Add {
        name: String,
        #[arg(long, default_value = "")]
        roll: String,
    },
    /// Remove a student and all of their attendance.
    Remove {
        /// Student id or roll.
        student: String,
    },
    /// Toggle a present/absent mark; repeating the same mark clears it.
    Mark {
        /// Student id or roll.
        student: String,
        #[arg(value_enum)]
        mark: MarkArg,
        #[command(flatten)]
        date: DateArg,
    },
    /// Print the roster with status, present/total days and attendance percentage.
    Roster {
        #[command(flatten)]
        date: DateArg,
    },
    /// Export attendance as CSV.
    Export {
        #[command(flatten)]
        date: DateArg,
        /// Export every recorded date instead of one.
        #[arg(long, default_value_t = false)]
        all: bool,
        /// Output path, `-` for stdout. Defaults to the conventional file name.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Import attendance from a CSV file.
    Import { file: PathBuf },
    /// Remove every student and every attendance entry.
    Clear,
    /// Save the current state explicitly.
    Save,
}

#[derive(Args)]
struct DateArg {
    /// Date as YYYY-MM-DD; defaults to today.
    #[arg(long)]
    date: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum MarkArg {
    #[value(alias = "p")]
    Present,
    #[value(alias = "a")]
    Absent,
}

impl From<MarkArg> for Mark {
    fn from(value: MarkArg) -> Self {
        match value {
            MarkArg::Present => Mark::Present,
            MarkArg::Absent => Mark::Absent,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let conn = open_db(&cli.db).map_err(|err| format!("cannot open {}: {err}", cli.db.display()))?;
    let mut tracker =
        AttendanceTracker::load(SqliteKeyValueStore::new(&conn)).map_err(|err| err.to_string())?;
    if let Some(date) = command_date(&cli.command) {
        tracker.select_date(date).map_err(|err| err.to_string())?;
    }
    let confirm = |prompt: &ConfirmPrompt| cli.yes || ask(prompt);

    match &cli.command {
        Command::Add { name, roll } => match tracker.add_student(name, roll, confirm) {
            Ok(MutationOutcome::Applied(student)) => {
                println!("added {} ({})", student.name, student.id);
                Ok(())
            }
            Ok(MutationOutcome::Declined) => {
                println!("not added");
                Ok(())
            }
            Err(err) => Err(err.to_string()),
        },
        Command::Remove { student } => {
            let id = resolve_student(&tracker, student);
            match tracker.remove_student(&id, confirm) {
                Ok(MutationOutcome::Applied(Some(removed))) => {
                    println!("removed {}", removed.name);
                    Ok(())
                }
                Ok(MutationOutcome::Applied(None)) => {
                    println!("no student {student}");
                    Ok(())
                }
                Ok(MutationOutcome::Declined) => Ok(()),
                Err(err) => Err(err.to_string()),
            }
        }
        Command::Mark { student, mark, .. } => {
            let id = resolve_student(&tracker, student);
            let date = tracker.selected_date().to_string();
            let status = tracker
                .set_status(&date, &id, (*mark).into())
                .map_err(|err| err.to_string())?;
            println!("{date} {student}: {status}");
            Ok(())
        }
        Command::Roster { .. } => {
            print_roster(&tracker);
            Ok(())
        }
        Command::Export { all, out, .. } => {
            let (csv, file_name) = if *all {
                (tracker.export_all(), export_file_name(None))
            } else {
                let date = tracker.selected_date().clone();
                let csv = tracker
                    .export_date(date.as_str())
                    .map_err(|err| err.to_string())?;
                (csv, export_file_name(Some(&date)))
            };
            write_export(&csv, out.clone().unwrap_or_else(|| PathBuf::from(file_name)))
        }
        Command::Import { file } => {
            let text = fs::read_to_string(file)
                .map_err(|err| format!("cannot read {}: {err}", file.display()))?;
            let summary = tracker
                .import_text(&text)
                .map_err(|err: TrackerError| err.to_string())?;
            println!(
                "imported {} rows: {} students created, {} matched, {} marks written, {} skipped, {} bad dates",
                summary.rows,
                summary.students_created,
                summary.students_updated,
                summary.statuses_written,
                summary.statuses_skipped,
                summary.invalid_dates
            );
            Ok(())
        }
        Command::Clear => match tracker.clear_all(confirm) {
            Ok(outcome) => {
                if !outcome.is_declined() {
                    println!("cleared");
                }
                Ok(())
            }
            Err(err) => Err(err.to_string()),
        },
        Command::Save => {
            tracker.save().map_err(|err| err.to_string())?;
            println!("saved");
            Ok(())
        }
    }
}

fn command_date(command: &Command) -> Option<&str> {
    match command {
        Command::Mark { date, .. } | Command::Roster { date } | Command::Export { date, .. } => {
            date.date.as_deref()
        }
        _ => None,
    }
}

/// Accepts a student id, falling back to an exact roll match.
fn resolve_student(tracker: &AttendanceTracker<SqliteKeyValueStore<'_>>, key: &str) -> StudentId {
    let key = key.trim();
    let roster = tracker.roster();
    let as_id = StudentId::from(key);
    if roster.contains(&as_id) {
        return as_id;
    }
    roster
        .find_by_roll(key)
        .map(|student| student.id.clone())
        .unwrap_or(as_id)
}

fn print_roster(tracker: &AttendanceTracker<SqliteKeyValueStore<'_>>) {
    let date: &DateKey = tracker.selected_date();
    let rows = tracker.render(date);
    if rows.is_empty() {
        println!("No students yet - add a student.");
        return;
    }

    println!("date {date}");
    println!(
        "{:<8} {:<24} {:<8} {:>7} {:>5}  id",
        "roll", "name", "status", "days", "pct"
    );
    for row in rows {
        println!(
            "{:<8} {:<24} {:<8} {:>7} {:>5}  {}",
            row.roll,
            row.name,
            row.status.to_string(),
            format!("{}/{}", row.summary.present, row.summary.total),
            row.percent.to_string(),
            row.id
        );
    }
}

fn write_export(csv: &str, out: PathBuf) -> Result<(), String> {
    if out.as_os_str() == STDOUT_PATH {
        println!("{csv}");
        return Ok(());
    }
    fs::write(&out, csv).map_err(|err| format!("cannot write {}: {err}", out.display()))?;
    info!("event=csv_export_write module=cli status=ok bytes={}", csv.len());
    println!("wrote {}", out.display());
    Ok(())
}

fn ask(prompt: &ConfirmPrompt) -> bool {
    print!("{prompt} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
