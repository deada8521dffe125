//! Task collection repository contract and SQLite key-value implementation.
//!
//! # Responsibility
//! - Load and save the full task collection as one JSON value.
//! - Validate every record and id uniqueness on read.
//!
//! # Invariants
//! - Writes are full replacements of the value stored under `key`.
//! - The JSON value is an array of camelCase task records.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::task::Task;
use crate::model::validation::TaskValidationError;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const KV_TABLE: &str = "kv_store";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for collection load/save.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Serialization(serde_json::Error),
    /// A persisted record failed validation.
    InvalidRecord {
        index: usize,
        source: TaskValidationError,
    },
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    /// Backend refused the operation (used by non-SQLite backends).
    Unavailable(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "task collection encoding failed: {err}"),
            Self::InvalidRecord { index, source } => {
                write!(f, "invalid persisted task at index {index}: {source}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::InvalidRecord { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Load/save contract for the whole task collection.
pub trait TaskRepository {
    /// Loads the collection; an absent key yields an empty collection.
    fn load_tasks(&self) -> RepoResult<Vec<Task>>;
    /// Replaces the stored collection with `tasks`.
    fn save_tasks(&mut self, tasks: &[Task]) -> RepoResult<()>;
}

/// Encodes a collection into its persisted JSON form.
pub fn encode_collection(tasks: &[Task]) -> RepoResult<String> {
    serde_json::to_string(tasks).map_err(Into::into)
}

/// Decodes and validates a persisted collection.
///
/// # Errors
/// - `Serialization` when the value is not a JSON array of tasks.
/// - `InvalidRecord` when a record breaks a task invariant.
/// - `InvalidData` when two records share an id.
pub fn decode_collection(value: &str) -> RepoResult<Vec<Task>> {
    let tasks: Vec<Task> = serde_json::from_str(value)?;
    let mut seen = HashSet::with_capacity(tasks.len());
    for (index, task) in tasks.iter().enumerate() {
        task.validate()
            .map_err(|source| RepoError::InvalidRecord { index, source })?;
        if !seen.insert(task.id) {
            return Err(RepoError::InvalidData(format!(
                "duplicate task id {} at index {index}",
                task.id
            )));
        }
    }
    Ok(tasks)
}

/// SQLite-backed repository storing the collection in `kv_store`.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
    key: String,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository over a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` when `kv_store` is absent.
    pub fn try_new(conn: &'conn Connection, key: impl Into<String>) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_version(conn)?;
        if actual_version < expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let table_exists: bool = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
            );",
            [KV_TABLE],
            |row| row.get(0),
        )?;
        if !table_exists {
            return Err(RepoError::MissingRequiredTable(KV_TABLE));
        }

        Ok(Self {
            conn,
            key: key.into(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn load_tasks(&self) -> RepoResult<Vec<Task>> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [self.key.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        match value {
            Some(value) => decode_collection(&value),
            None => Ok(Vec::new()),
        }
    }

    fn save_tasks(&mut self, tasks: &[Task]) -> RepoResult<()> {
        let value = encode_collection(tasks)?;
        self.conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![self.key.as_str(), value],
        )?;
        Ok(())
    }
}
