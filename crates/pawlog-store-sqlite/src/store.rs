//! [`SqliteStore`]: the SQLite implementation of [`WeightStore`].

use std::path::Path;

use pawlog_core::{
  entry::{CatName, EntryDate, EntryId, NewEntry, Weight, WeightEntry},
  filter::EntryFilter,
  store::{UpsertOutcome, Upserted, WeightStore},
};
use rusqlite::{OptionalExtension as _, TransactionBehavior};

use crate::{
  Error, Result,
  encode::{ENTRY_COLUMNS, RawEntry, decode_id, encode_date, encode_subject},
  error::is_unique_violation,
  query::{WhereClause, where_clause},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A pawlog weight store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. Every call
/// runs on the connection's own thread, so calls are serialised.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  #[cfg(test)]
  pub(crate) fn connection(&self) -> &tokio_rusqlite::Connection { &self.conn }
}

/// Turn a write failure into [`Error::Conflict`] when the unique key is hit.
fn classify_write(err: tokio_rusqlite::Error, entry: &NewEntry) -> Error {
  match &err {
    tokio_rusqlite::Error::Rusqlite(e) if is_unique_violation(e) => Error::Conflict {
      subject: encode_subject(&entry.subject),
      date:    encode_date(entry.date),
    },
    _ => Error::Database(err),
  }
}

const INSERT_ENTRY: &str = "INSERT INTO weights (subject, weight, date) VALUES (?1, ?2, ?3)";

// ─── WeightStore impl ────────────────────────────────────────────────────────

impl WeightStore for SqliteStore {
  type Error = Error;

  async fn find_entry(&self, subject: &CatName, date: EntryDate) -> Result<Option<WeightEntry>> {
    let subject_str = encode_subject(subject);
    let date_str    = encode_date(date);

    let raw: Option<RawEntry> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {ENTRY_COLUMNS} FROM weights WHERE subject = ?1 AND date = ?2"),
            rusqlite::params![subject_str, date_str],
            RawEntry::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawEntry::into_entry).transpose()
  }

  async fn get_entry(&self, id: EntryId) -> Result<Option<WeightEntry>> {
    let raw: Option<RawEntry> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {ENTRY_COLUMNS} FROM weights WHERE id = ?1"),
            rusqlite::params![id.get()],
            RawEntry::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawEntry::into_entry).transpose()
  }

  async fn insert_entry(&self, entry: NewEntry) -> Result<WeightEntry> {
    let subject_str = encode_subject(&entry.subject);
    let date_str    = encode_date(entry.date);
    let kg          = entry.weight.kg();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(INSERT_ENTRY, rusqlite::params![subject_str, kg, date_str])?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(|e| classify_write(e, &entry))?;

    Ok(entry.into_entry(decode_id(id)?))
  }

  async fn update_weight(&self, id: EntryId, weight: Weight) -> Result<Option<WeightEntry>> {
    let kg = weight.kg();

    let raw: Option<RawEntry> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("UPDATE weights SET weight = ?1 WHERE id = ?2 RETURNING {ENTRY_COLUMNS}"),
            rusqlite::params![kg, id.get()],
            RawEntry::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawEntry::into_entry).transpose()
  }

  async fn delete_entry(&self, id: EntryId) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM weights WHERE id = ?1", rusqlite::params![id.get()])?)
      })
      .await?;
    Ok(removed > 0)
  }

  async fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<WeightEntry>> {
    let WhereClause { sql: where_sql, params } = where_clause(filter);

    let raws: Vec<RawEntry> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {ENTRY_COLUMNS} FROM weights {where_sql} ORDER BY date, subject, id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), RawEntry::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEntry::into_entry).collect()
  }

  async fn list_subjects(&self) -> Result<Vec<CatName>> {
    // One representative id per subject, so a bad name can be traced to a row.
    let names: Vec<(String, i64)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT subject, MIN(id) FROM weights GROUP BY subject ORDER BY subject",
        )?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    names
      .iter()
      .map(|(name, id)| {
        CatName::parse(name).map_err(|e| Error::CorruptRow { id: *id, reason: e.to_string() })
      })
      .collect()
  }

  /// Check-then-write inside one `IMMEDIATE` transaction. The write lock is
  /// taken before the lookup, so other connections cannot slip an insert in
  /// between; a unique violation is still reported as a conflict.
  async fn upsert_entry(&self, entry: NewEntry) -> Result<Upserted> {
    let subject_str = encode_subject(&entry.subject);
    let date_str    = encode_date(entry.date);
    let kg          = entry.weight.kg();

    let (outcome, id) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let existing: Option<i64> = tx
          .query_row(
            "SELECT id FROM weights WHERE subject = ?1 AND date = ?2",
            rusqlite::params![subject_str, date_str],
            |row| row.get(0),
          )
          .optional()?;

        let step = match existing {
          Some(id) => {
            tx.execute(
              "UPDATE weights SET weight = ?1 WHERE id = ?2",
              rusqlite::params![kg, id],
            )?;
            (UpsertOutcome::Updated, id)
          }
          None => {
            tx.execute(INSERT_ENTRY, rusqlite::params![subject_str, kg, date_str])?;
            (UpsertOutcome::Created, tx.last_insert_rowid())
          }
        };

        tx.commit()?;
        Ok(step)
      })
      .await
      .map_err(|e| classify_write(e, &entry))?;

    Ok(Upserted { outcome, entry: entry.into_entry(decode_id(id)?) })
  }
}
