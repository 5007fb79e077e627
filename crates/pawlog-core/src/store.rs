//! The `WeightStore` trait: persistence behind every entry operation.
//!
//! Implemented by storage backends (e.g. `pawlog-store-sqlite`). The service
//! layer and the HTTP crates depend on this abstraction only.

use std::future::Future;

use serde::Serialize;

use crate::{
  entry::{CatName, EntryDate, EntryId, NewEntry, Weight, WeightEntry},
  filter::EntryFilter,
};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Error type reported by a [`WeightStore`] backend.
///
/// Backends signal uniqueness violations differently; each one classifies
/// its own errors so callers never inspect backend error codes.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// `true` if a write was rejected because its (subject, date) is taken.
  fn is_conflict(&self) -> bool;
}

// ─── Upsert result ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
  Created,
  Updated,
}

/// The row as it stands after an upsert, and which branch was taken.
#[derive(Debug, Clone, PartialEq)]
pub struct Upserted {
  pub outcome: UpsertOutcome,
  pub entry:   WeightEntry,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a weight-entry store.
///
/// The store owns the (subject, date) uniqueness constraint. All methods
/// return `Send` futures so the trait can be used behind `axum`.
pub trait WeightStore: Send + Sync {
  type Error: StoreError;

  /// Look up the entry for `(subject, date)`, if one exists.
  fn find_entry<'a>(
    &'a self,
    subject: &'a CatName,
    date: EntryDate,
  ) -> impl Future<Output = Result<Option<WeightEntry>, Self::Error>> + Send + 'a;

  /// Retrieve an entry by id. Returns `None` if not found.
  fn get_entry(
    &self,
    id: EntryId,
  ) -> impl Future<Output = Result<Option<WeightEntry>, Self::Error>> + Send + '_;

  /// Insert a new row and return it with its assigned id.
  ///
  /// Fails with an error whose [`StoreError::is_conflict`] is `true` if the
  /// (subject, date) pair is already present.
  fn insert_entry(
    &self,
    entry: NewEntry,
  ) -> impl Future<Output = Result<WeightEntry, Self::Error>> + Send + '_;

  /// Overwrite the weight of entry `id`. Returns `None` if no such row.
  fn update_weight(
    &self,
    id: EntryId,
    weight: Weight,
  ) -> impl Future<Output = Result<Option<WeightEntry>, Self::Error>> + Send + '_;

  /// Remove entry `id`. Returns whether a row was removed.
  fn delete_entry(
    &self,
    id: EntryId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// All entries matching `filter`, ascending by date, then subject, then id.
  fn list_entries<'a>(
    &'a self,
    filter: &'a EntryFilter,
  ) -> impl Future<Output = Result<Vec<WeightEntry>, Self::Error>> + Send + 'a;

  /// Every distinct subject in the store, sorted ascending.
  fn list_subjects(
    &self,
  ) -> impl Future<Output = Result<Vec<CatName>, Self::Error>> + Send + '_;

  /// Insert `entry`, or overwrite the weight of the row already holding its
  /// (subject, date).
  ///
  /// The provided implementation checks then writes. A concurrent insert
  /// between the two steps surfaces as a conflict from
  /// [`insert_entry`](Self::insert_entry). Backends with a native atomic
  /// upsert should override this.
  fn upsert_entry(
    &self,
    entry: NewEntry,
  ) -> impl Future<Output = Result<Upserted, Self::Error>> + Send + '_ {
    async move {
      if let Some(existing) = self.find_entry(&entry.subject, entry.date).await?
        && let Some(updated) = self.update_weight(existing.id, entry.weight).await?
      {
        return Ok(Upserted { outcome: UpsertOutcome::Updated, entry: updated });
      }

      let created = self.insert_entry(entry).await?;
      Ok(Upserted { outcome: UpsertOutcome::Created, entry: created })
    }
  }
}
