//! Error type for `pawlog-store-sqlite`.

use pawlog_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// The `UNIQUE (subject, date)` constraint rejected a write.
  #[error("an entry for {subject} on {date} already exists")]
  Conflict { subject: String, date: String },

  /// A stored row no longer satisfies the domain invariants.
  #[error("row {id} is invalid: {reason}")]
  CorruptRow { id: i64, reason: String },
}

impl StoreError for Error {
  fn is_conflict(&self) -> bool {
    match self {
      Error::Conflict { .. } => true,
      Error::Database(tokio_rusqlite::Error::Rusqlite(e)) => is_unique_violation(e),
      _ => false,
    }
  }
}

/// `true` for SQLite's `SQLITE_CONSTRAINT_UNIQUE`, as opposed to `CHECK` or
/// `NOT NULL` failures that share the primary constraint code.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
  matches!(
    err,
    rusqlite::Error::SqliteFailure(failure, _)
      if failure.code == rusqlite::ErrorCode::ConstraintViolation
        && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
