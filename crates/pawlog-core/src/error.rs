//! Error types for `pawlog-core`.

use thiserror::Error;

use crate::entry::{CatName, EntryDate};

/// Malformed or missing caller input. Raised before the store is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("cat name must not be empty")]
  EmptySubject,

  #[error("weight is required")]
  MissingWeight,

  #[error("weight must be a number, got {0:?}")]
  InvalidWeight(String),

  #[error("weight must be positive")]
  NonPositiveWeight,

  #[error("date is required")]
  EmptyDate,

  #[error("date must be a calendar date in YYYY-MM-DD form, got {0:?}")]
  InvalidDate(String),

  #[error("{field} must be a calendar date in YYYY-MM-DD form, got {value:?}")]
  InvalidFilterDate {
    field: &'static str,
    value: String,
  },

  #[error("entry id must be a positive integer, got {0:?}")]
  InvalidId(String),
}

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  /// The store's (subject, date) uniqueness constraint rejected an insert.
  #[error("an entry for {subject} on {date} already exists; update it instead")]
  Conflict { subject: CatName, date: EntryDate },

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
