//! Rendering of [`EntryFilter`] into a parameterised `WHERE` clause.
//!
//! Date bounds compare the `YYYY-MM-DD` column text. `EntryDate` only ever
//! renders in that zero-padded form, so text order is date order.

use pawlog_core::filter::EntryFilter;

use crate::encode::{encode_date, encode_subject};

/// A `WHERE` fragment (possibly empty) and its positional parameters.
#[derive(Debug, PartialEq, Eq)]
pub struct WhereClause {
  pub sql:    String,
  pub params: Vec<String>,
}

pub fn where_clause(filter: &EntryFilter) -> WhereClause {
  if filter.is_unrestricted() {
    return WhereClause { sql: String::new(), params: Vec::new() };
  }

  let mut conds: Vec<String> = Vec::new();
  let mut params: Vec<String> = Vec::new();

  let mut push = |cond: &str, value: String| {
    params.push(value);
    conds.push(format!("{cond} ?{}", params.len()));
  };

  if let Some(start) = filter.start {
    push("date >=", encode_date(start));
  }
  if let Some(end) = filter.end {
    push("date <=", encode_date(end));
  }
  if let Some(subject) = &filter.subject {
    push("subject =", encode_subject(subject));
  }

  WhereClause { sql: format!("WHERE {}", conds.join(" AND ")), params }
}
