//! Command-line driver for the task list core.
//!
//! # Responsibility
//! - Parse flags and environment into core configuration.
//! - Open the SQLite-backed store and run one command or an interactive shell.

mod commands;
mod console;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Command, Outcome};
use console::ConsoleNotifier;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tasklist_core::db::open_db;
use tasklist_core::{
    default_log_level, init_logging, LoggingConfig, SqliteTaskRepository, StoreConfig, TaskStore,
};

#[derive(Parser)]
#[command(name = "tasklist", version, about = "Persistent task list")]
struct Cli {
    /// SQLite database file holding the task list
    #[arg(long, env = "TASKLIST_DB", default_value = "tasklist.sqlite3", global = true)]
    db: PathBuf,
    /// Storage key of the task list inside the database
    #[arg(long, env = "TASKLIST_KEY", global = true)]
    key: Option<String>,
    /// Directory for rolling log files; logging is off when unset
    #[arg(long, env = "TASKLIST_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,
    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(Outcome::Failed) => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<Outcome> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(&LoggingConfig::new(level, absolute(log_dir)?))
            .context("failed to initialize logging")?;
    }

    let config = StoreConfig::with_storage_key(cli.key.as_deref());
    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    let repo = SqliteTaskRepository::try_new(&conn, config.storage_key.as_str())?;
    let mut store = TaskStore::open(repo, ConsoleNotifier::default())?;

    match cli.command {
        Command::Shell => commands::run_shell(&mut store),
        command => commands::execute(&mut store, command),
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    Ok(cwd.join(path))
}
