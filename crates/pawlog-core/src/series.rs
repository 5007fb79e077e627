//! Series projection: pivots weight rows into chart-ready series.
//!
//! All series share one date axis: the sorted, distinct dates across every
//! input row. A subject with no entry on an axis date gets `None` at that
//! position, which serialises as `null`. Consumers must treat it as "no data"
//! and never as zero.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::entry::{CatName, EntryDate, Weight, WeightEntry};

/// One subject's weights aligned to [`Projection::date_axis`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
  pub subject: CatName,
  /// Same length as the date axis; `None` marks a gap.
  pub points:  Vec<Option<Weight>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Projection {
  pub date_axis: Vec<EntryDate>,
  /// Ordered by each subject's first appearance in the input rows.
  pub series:    Vec<Series>,
}

impl Projection {
  pub fn is_empty(&self) -> bool { self.date_axis.is_empty() }
}

/// Project `rows` onto a shared date axis.
///
/// Duplicate (subject, date) rows resolve to the last one seen.
pub fn project(rows: &[WeightEntry]) -> Projection {
  let mut groups: Vec<(&CatName, HashMap<EntryDate, Weight>)> = Vec::new();
  let mut slots: HashMap<&CatName, usize> = HashMap::new();
  let mut axis: BTreeSet<EntryDate> = BTreeSet::new();

  for row in rows {
    let slot = *slots.entry(&row.subject).or_insert_with(|| {
      groups.push((&row.subject, HashMap::new()));
      groups.len() - 1
    });
    groups[slot].1.insert(row.date, row.weight);
    axis.insert(row.date);
  }

  let date_axis: Vec<EntryDate> = axis.into_iter().collect();
  let series = groups
    .into_iter()
    .map(|(subject, by_date)| Series {
      subject: subject.clone(),
      points:  date_axis.iter().map(|d| by_date.get(d).copied()).collect(),
    })
    .collect();

  Projection { date_axis, series }
}
