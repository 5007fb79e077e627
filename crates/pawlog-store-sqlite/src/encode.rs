//! Encoding and decoding helpers between pawlog domain types and the plain
//! column values stored in SQLite.
//!
//! Dates are stored as `YYYY-MM-DD` text, weights as REAL kilograms and
//! subjects as the trimmed name.

use pawlog_core::{
  ValidationError,
  entry::{CatName, EntryDate, EntryId, Weight, WeightEntry},
};

use crate::{Error, Result};

/// Column list matching [`RawEntry::from_row`].
pub const ENTRY_COLUMNS: &str = "id, subject, weight, date";

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_date(d: EntryDate) -> String { d.to_string() }

pub fn encode_subject(s: &CatName) -> String { s.as_str().to_owned() }

pub fn decode_id(id: i64) -> Result<EntryId> {
  EntryId::new(id).map_err(|e| corrupt(id, e))
}

fn corrupt(id: i64, err: ValidationError) -> Error {
  Error::CorruptRow { id, reason: err.to_string() }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `weights` row.
pub struct RawEntry {
  pub id:      i64,
  pub subject: String,
  pub weight:  f64,
  pub date:    String,
}

impl RawEntry {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:      row.get(0)?,
      subject: row.get(1)?,
      weight:  row.get(2)?,
      date:    row.get(3)?,
    })
  }

  pub fn into_entry(self) -> Result<WeightEntry> {
    let id = self.id;
    Ok(WeightEntry {
      id:      decode_id(id)?,
      subject: CatName::parse(&self.subject).map_err(|e| corrupt(id, e))?,
      weight:  Weight::new(self.weight).map_err(|e| corrupt(id, e))?,
      date:    EntryDate::parse(&self.date).map_err(|e| corrupt(id, e))?,
    })
  }
}
