//! Entry operations: upsert, delete, lookup and the filtered listing.
//!
//! These are the request-level units of work. Each one validates its input,
//! performs at most one mutation through a [`WeightStore`], and reports
//! failures through [`crate::Error`] with backend errors already classified.

use serde::Serialize;

use crate::{
  entry::{CatName, EntryId, EntryInput, NewEntry, WeightEntry},
  error::{Error, Result},
  filter::{EntryFilter, FilterParams},
  series::{Projection, project},
  store::{StoreError, UpsertOutcome, Upserted, WeightStore},
};

// ─── Upsert ──────────────────────────────────────────────────────────────────

/// Validate `input` and insert or update the entry for its (subject, date).
pub async fn submit_entry<S: WeightStore>(
  store: &S,
  input: &EntryInput,
) -> Result<Upserted> {
  let entry = input.validate()?;
  let key = entry.clone();
  store
    .upsert_entry(entry)
    .await
    .map_err(|e| classify_write(e, &key))
}

impl Upserted {
  /// Human-readable status line for the caller.
  pub fn message(&self) -> String {
    let WeightEntry { subject, weight, date, .. } = &self.entry;
    match self.outcome {
      UpsertOutcome::Created => format!("Recorded {weight} for {subject} on {date}."),
      UpsertOutcome::Updated => format!("Updated {subject}'s weight on {date} to {weight}."),
    }
  }
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
  Deleted,
  NotFound,
}

impl DeleteOutcome {
  pub fn message(self, id: EntryId) -> String {
    match self {
      Self::Deleted => format!("Deleted entry {id}."),
      Self::NotFound => format!("No entry with id {id}; nothing was deleted."),
    }
  }
}

/// Remove entry `id`. A missing row is reported, not treated as an error.
pub async fn delete_entry<S: WeightStore>(store: &S, id: EntryId) -> Result<DeleteOutcome> {
  let removed = store.delete_entry(id).await.map_err(storage)?;
  Ok(if removed { DeleteOutcome::Deleted } else { DeleteOutcome::NotFound })
}

// ─── Reads ───────────────────────────────────────────────────────────────────

pub async fn get_entry<S: WeightStore>(store: &S, id: EntryId) -> Result<Option<WeightEntry>> {
  store.get_entry(id).await.map_err(storage)
}

pub async fn list_subjects<S: WeightStore>(store: &S) -> Result<Vec<CatName>> {
  store.list_subjects().await.map_err(storage)
}

/// Everything a listing view needs for one filter request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
  /// The criteria that were applied.
  pub filter:   EntryFilter,
  /// Matching rows, ascending by date.
  pub entries:  Vec<WeightEntry>,
  /// All subjects in the store, independent of the filter.
  pub subjects: Vec<CatName>,
  pub chart:    Projection,
}

pub async fn list_entries<S: WeightStore>(store: &S, params: &FilterParams) -> Result<Listing> {
  let filter = EntryFilter::build(params)?;
  let entries = store.list_entries(&filter).await.map_err(storage)?;
  let subjects = store.list_subjects().await.map_err(storage)?;
  let chart = project(&entries);
  Ok(Listing { filter, entries, subjects, chart })
}

// ─── Error mapping ───────────────────────────────────────────────────────────

fn classify_write<E: StoreError>(err: E, entry: &NewEntry) -> Error {
  if err.is_conflict() {
    Error::Conflict {
      subject: entry.subject.clone(),
      date:    entry.date,
    }
  } else {
    storage(err)
  }
}

fn storage<E: StoreError>(err: E) -> Error { Error::Storage(Box::new(err)) }
