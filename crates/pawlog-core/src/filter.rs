//! Entry filters.
//!
//! Turns optional, loosely-typed criteria into an [`EntryFilter`]: a
//! conjunctive predicate over weight entries. The builder never touches the
//! store; backends render the filter into their own query language.

use serde::{Deserialize, Serialize};

use crate::{
  entry::{CatName, EntryDate, WeightEntry},
  error::ValidationError,
};

/// Raw filter criteria as they arrive from a query string or form.
/// Absent and blank values both mean "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterParams {
  pub start_date: Option<String>,
  pub end_date:   Option<String>,
  pub subject:    Option<String>,
}

/// A conjunction of optional criteria. The default value matches every row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntryFilter {
  /// Inclusive lower bound on `date`.
  #[serde(rename = "start_date")]
  pub start:   Option<EntryDate>,
  /// Inclusive upper bound on `date`.
  #[serde(rename = "end_date")]
  pub end:     Option<EntryDate>,
  /// Exact, case-sensitive match on `subject`.
  pub subject: Option<CatName>,
}

impl EntryFilter {
  pub fn build(params: &FilterParams) -> Result<Self, ValidationError> {
    Ok(Self {
      start:   parse_bound("start date", params.start_date.as_deref())?,
      end:     parse_bound("end date", params.end_date.as_deref())?,
      subject: non_blank(params.subject.as_deref())
        .map(CatName::parse)
        .transpose()?,
    })
  }

  /// `true` when no criterion is set.
  pub fn is_unrestricted(&self) -> bool {
    self.start.is_none() && self.end.is_none() && self.subject.is_none()
  }

  pub fn matches(&self, entry: &WeightEntry) -> bool {
    self.start.is_none_or(|start| entry.date >= start)
      && self.end.is_none_or(|end| entry.date <= end)
      && self.subject.as_ref().is_none_or(|s| *s == entry.subject)
  }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
  raw.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_bound(
  field: &'static str,
  raw: Option<&str>,
) -> Result<Option<EntryDate>, ValidationError> {
  non_blank(raw)
    .map(|value| {
      EntryDate::parse(value).map_err(|_| ValidationError::InvalidFilterDate {
        field,
        value: value.to_owned(),
      })
    })
    .transpose()
}
