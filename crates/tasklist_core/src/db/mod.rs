//! SQLite storage bootstrap.
//!
//! A connection handed out by this module is configured and migrated; the
//! repositories only ever check the result, they never upgrade.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while preparing a connection for the task store.
#[derive(Debug)]
pub enum DbError {
    /// SQLite could not open the file or the in-memory database.
    Connect {
        mode: &'static str,
        source: rusqlite::Error,
    },
    /// Pragmas or the busy timeout were rejected.
    Configure(rusqlite::Error),
    /// A script failed; `user_version` still holds the pre-upgrade value.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// The file was written by a build with more migrations than this one.
    NewerSchema { found: u32, supported: u32 },
    Sqlite(rusqlite::Error),
}

impl DbError {
    /// Stable identifier used as `error_code` in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Connect { .. } => "db_connect_failed",
            Self::Configure(_) => "db_configure_failed",
            Self::Migration { .. } => "db_migration_failed",
            Self::NewerSchema { .. } => "db_schema_newer",
            Self::Sqlite(_) => "db_sqlite_error",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connect { mode, source } => write!(f, "cannot open {mode} database: {source}"),
            Self::Configure(source) => write!(f, "cannot configure connection: {source}"),
            Self::Migration { version, source } => {
                write!(f, "schema migration {version} failed: {source}")
            }
            Self::NewerSchema { found, supported } => write!(
                f,
                "task database uses schema {found}; this build supports up to {supported}"
            ),
            Self::Sqlite(source) => write!(f, "{source}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connect { source, .. } | Self::Migration { source, .. } => Some(source),
            Self::Configure(source) | Self::Sqlite(source) => Some(source),
            Self::NewerSchema { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
