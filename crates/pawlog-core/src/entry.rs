//! Weight entries, the single entity tracked by pawlog.
//!
//! Every field of a stored entry is a validated newtype. Raw caller input
//! arrives as an [`EntryInput`] and becomes a [`NewEntry`] through
//! [`EntryInput::validate`]; nothing past that point re-checks invariants.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, de::IgnoredAny};

use crate::error::ValidationError;

/// Wire and column format for [`EntryDate`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── EntryId ─────────────────────────────────────────────────────────────────

/// Surrogate key assigned by the store on creation. Always positive.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct EntryId(i64);

impl EntryId {
  pub fn new(raw: i64) -> Result<Self, ValidationError> {
    if raw > 0 {
      Ok(Self(raw))
    } else {
      Err(ValidationError::InvalidId(raw.to_string()))
    }
  }

  /// Parse an id supplied as text (path segment, form field).
  pub fn parse(raw: &str) -> Result<Self, ValidationError> {
    let trimmed = raw.trim();
    let value: i64 = trimmed
      .parse()
      .map_err(|_| ValidationError::InvalidId(trimmed.to_owned()))?;
    Self::new(value)
  }

  pub fn get(self) -> i64 { self.0 }
}

impl TryFrom<i64> for EntryId {
  type Error = ValidationError;

  fn try_from(raw: i64) -> Result<Self, Self::Error> { Self::new(raw) }
}

impl From<EntryId> for i64 {
  fn from(id: EntryId) -> Self { id.0 }
}

impl fmt::Display for EntryId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

// ─── CatName ─────────────────────────────────────────────────────────────────

/// The cat an entry belongs to. Trimmed, never empty, compared exactly.
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct CatName(String);

impl CatName {
  pub fn parse(raw: &str) -> Result<Self, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
      return Err(ValidationError::EmptySubject);
    }
    Ok(Self(trimmed.to_owned()))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl TryFrom<String> for CatName {
  type Error = ValidationError;

  fn try_from(raw: String) -> Result<Self, Self::Error> { Self::parse(&raw) }
}

impl From<CatName> for String {
  fn from(name: CatName) -> Self { name.0 }
}

impl fmt::Display for CatName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

// ─── Weight ──────────────────────────────────────────────────────────────────

/// A body weight in kilograms. Finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Weight(f64);

impl Weight {
  pub fn new(kg: f64) -> Result<Self, ValidationError> {
    if !kg.is_finite() {
      return Err(ValidationError::InvalidWeight(kg.to_string()));
    }
    if kg <= 0.0 {
      return Err(ValidationError::NonPositiveWeight);
    }
    Ok(Self(kg))
  }

  pub fn parse(raw: &str) -> Result<Self, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
      return Err(ValidationError::MissingWeight);
    }
    let kg: f64 = trimmed
      .parse()
      .map_err(|_| ValidationError::InvalidWeight(trimmed.to_owned()))?;
    Self::new(kg)
  }

  pub fn kg(self) -> f64 { self.0 }
}

impl TryFrom<f64> for Weight {
  type Error = ValidationError;

  fn try_from(kg: f64) -> Result<Self, Self::Error> { Self::new(kg) }
}

impl From<Weight> for f64 {
  fn from(weight: Weight) -> Self { weight.0 }
}

impl fmt::Display for Weight {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} kg", self.0)
  }
}

// ─── EntryDate ───────────────────────────────────────────────────────────────

/// A calendar date without time component.
///
/// Only the zero-padded `YYYY-MM-DD` form with a four-digit year is accepted,
/// so the text rendering sorts the same way the dates do.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct EntryDate(NaiveDate);

impl EntryDate {
  pub fn new(date: NaiveDate) -> Result<Self, ValidationError> {
    if (1..=9999).contains(&date.year()) {
      Ok(Self(date))
    } else {
      Err(ValidationError::InvalidDate(date.to_string()))
    }
  }

  pub fn parse(raw: &str) -> Result<Self, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
      return Err(ValidationError::EmptyDate);
    }
    let invalid = || ValidationError::InvalidDate(trimmed.to_owned());
    if trimmed.len() != 10 {
      return Err(invalid());
    }
    let date = NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| invalid())?;
    Self::new(date).map_err(|_| invalid())
  }

  pub fn naive(self) -> NaiveDate { self.0 }
}

impl TryFrom<String> for EntryDate {
  type Error = ValidationError;

  fn try_from(raw: String) -> Result<Self, Self::Error> { Self::parse(&raw) }
}

impl From<EntryDate> for String {
  fn from(date: EntryDate) -> Self { date.to_string() }
}

impl fmt::Display for EntryDate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0.format(DATE_FORMAT))
  }
}

// ─── Entries ─────────────────────────────────────────────────────────────────

/// A persisted weight entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
  pub id:      EntryId,
  pub subject: CatName,
  pub weight:  Weight,
  pub date:    EntryDate,
}

/// A validated entry that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
  pub subject: CatName,
  pub weight:  Weight,
  pub date:    EntryDate,
}

impl NewEntry {
  pub fn into_entry(self, id: EntryId) -> WeightEntry {
    WeightEntry {
      id,
      subject: self.subject,
      weight: self.weight,
      date: self.date,
    }
  }
}

// ─── Raw input ───────────────────────────────────────────────────────────────

/// A weight as supplied by a caller: a JSON number or text from a form field.
///
/// `null` and values of any other type still decode, so they are rejected by
/// [`WeightInput::parse`] instead of by the decoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeightInput {
  Number(f64),
  Text(String),
  Missing,
  #[serde(skip_serializing)]
  Unsupported(IgnoredAny),
}

impl Default for WeightInput {
  fn default() -> Self { Self::Text(String::new()) }
}

impl WeightInput {
  pub fn parse(&self) -> Result<Weight, ValidationError> {
    match self {
      Self::Number(kg) => Weight::new(*kg),
      Self::Text(raw) => Weight::parse(raw),
      Self::Missing => Err(ValidationError::MissingWeight),
      Self::Unsupported(_) => Err(ValidationError::InvalidWeight("a non-numeric value".into())),
    }
  }
}

impl From<f64> for WeightInput {
  fn from(kg: f64) -> Self { Self::Number(kg) }
}

impl From<&str> for WeightInput {
  fn from(raw: &str) -> Self { Self::Text(raw.to_owned()) }
}

/// An unvalidated submission. Missing, `null` and wrongly typed fields
/// deserialise as empty so that they surface as validation errors rather
/// than decode failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryInput {
  #[serde(default, deserialize_with = "lenient_text")]
  pub subject: String,
  #[serde(default)]
  pub weight:  WeightInput,
  #[serde(default, deserialize_with = "lenient_text")]
  pub date:    String,
}

/// Only a string carries text; anything else reads as blank.
fn lenient_text<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Raw {
    Text(String),
    Other(IgnoredAny),
  }

  Ok(match Raw::deserialize(de)? {
    Raw::Text(text) => text,
    Raw::Other(_) => String::new(),
  })
}

impl EntryInput {
  pub fn new(
    subject: impl Into<String>,
    weight: impl Into<WeightInput>,
    date: impl Into<String>,
  ) -> Self {
    Self {
      subject: subject.into(),
      weight:  weight.into(),
      date:    date.into(),
    }
  }

  /// Check fields in order (subject, weight, date) and stop at the first
  /// violation.
  pub fn validate(&self) -> Result<NewEntry, ValidationError> {
    let subject = CatName::parse(&self.subject)?;
    let weight = self.weight.parse()?;
    let date = EntryDate::parse(&self.date)?;
    Ok(NewEntry { subject, weight, date })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn validate_accepts_well_formed_input() {
    let entry = EntryInput::new("  Tom ", 4.2, "2024-01-01").validate().unwrap();
    assert_eq!(entry.subject.as_str(), "Tom");
    assert_eq!(entry.weight.kg(), 4.2);
    assert_eq!(entry.date.to_string(), "2024-01-01");
  }

  #[test]
  fn validate_rejects_empty_subject() {
    let err = EntryInput::new("", 5.0, "2024-01-01").validate().unwrap_err();
    assert_eq!(err, ValidationError::EmptySubject);

    let err = EntryInput::new("   ", 5.0, "2024-01-01").validate().unwrap_err();
    assert_eq!(err, ValidationError::EmptySubject);
  }

  #[test]
  fn validate_rejects_non_positive_weight() {
    let err = EntryInput::new("Tom", -1.0, "2024-01-01").validate().unwrap_err();
    assert_eq!(err, ValidationError::NonPositiveWeight);

    let err = EntryInput::new("Tom", "0", "2024-01-01").validate().unwrap_err();
    assert_eq!(err, ValidationError::NonPositiveWeight);
  }

  #[test]
  fn validate_rejects_non_numeric_weight() {
    let err = EntryInput::new("Tom", "heavy", "2024-01-01").validate().unwrap_err();
    assert_eq!(err, ValidationError::InvalidWeight("heavy".into()));

    let err = EntryInput::new("Tom", f64::NAN, "2024-01-01").validate().unwrap_err();
    assert!(matches!(err, ValidationError::InvalidWeight(_)));

    let err = EntryInput::new("Tom", "", "2024-01-01").validate().unwrap_err();
    assert_eq!(err, ValidationError::MissingWeight);
  }

  #[test]
  fn validate_rejects_empty_date() {
    let err = EntryInput::new("Tom", 5.0, "").validate().unwrap_err();
    assert_eq!(err, ValidationError::EmptyDate);
  }

  #[test]
  fn validate_reports_first_violation() {
    let err = EntryInput::new("", -3.0, "").validate().unwrap_err();
    assert_eq!(err, ValidationError::EmptySubject);
  }

  #[test]
  fn date_requires_padded_iso_form() {
    assert!(EntryDate::parse("2024-02-29").is_ok());
    assert!(EntryDate::parse("2023-02-29").is_err());
    assert!(EntryDate::parse("2024-1-5").is_err());
    assert!(EntryDate::parse("01/05/2024").is_err());
    assert!(EntryDate::parse("+12024-01-05").is_err());
  }

  #[test]
  fn date_order_matches_text_order() {
    let a = EntryDate::parse("2023-12-31").unwrap();
    let b = EntryDate::parse("2024-01-01").unwrap();
    assert!(a < b);
    assert!(a.to_string() < b.to_string());
  }

  #[test]
  fn entry_id_must_be_positive() {
    assert_eq!(EntryId::parse("42").unwrap().get(), 42);
    assert!(EntryId::parse("0").is_err());
    assert!(EntryId::parse("-7").is_err());
    assert!(EntryId::parse("seven").is_err());
  }

  #[test]
  fn weight_input_accepts_number_or_text() {
    let json: EntryInput =
      serde_json::from_str(r#"{"subject":"Tom","weight":"4.5","date":"2024-01-01"}"#)
        .unwrap();
    assert_eq!(json.weight, WeightInput::Text("4.5".into()));

    let json: EntryInput =
      serde_json::from_str(r#"{"subject":"Tom","weight":4.5,"date":"2024-01-01"}"#)
        .unwrap();
    assert_eq!(json.weight, WeightInput::Number(4.5));
  }

  #[test]
  fn missing_fields_become_validation_errors() {
    let input: EntryInput = serde_json::from_str(r#"{"weight":4.5}"#).unwrap();
    assert_eq!(input.validate().unwrap_err(), ValidationError::EmptySubject);
  }

  fn decode_err(json: &str) -> ValidationError {
    let input: EntryInput = serde_json::from_str(json).unwrap();
    input.validate().unwrap_err()
  }

  #[test]
  fn null_and_mistyped_fields_become_validation_errors() {
    assert_eq!(
      decode_err(r#"{"subject":"Tom","weight":null,"date":"2024-01-01"}"#),
      ValidationError::MissingWeight
    );
    assert!(matches!(
      decode_err(r#"{"subject":"Tom","weight":true,"date":"2024-01-01"}"#),
      ValidationError::InvalidWeight(_)
    ));
    assert!(matches!(
      decode_err(r#"{"subject":"Tom","weight":[4.2],"date":"2024-01-01"}"#),
      ValidationError::InvalidWeight(_)
    ));
    assert_eq!(
      decode_err(r#"{"subject":null,"weight":4.0,"date":"2024-01-01"}"#),
      ValidationError::EmptySubject
    );
    assert_eq!(
      decode_err(r#"{"subject":7,"weight":4.0,"date":"2024-01-01"}"#),
      ValidationError::EmptySubject
    );
    assert_eq!(
      decode_err(r#"{"subject":"Tom","weight":4.0,"date":null}"#),
      ValidationError::EmptyDate
    );
  }

  #[test]
  fn entry_serialises_with_plain_fields() {
    let entry = EntryInput::new("Tom", 4.5, "2024-01-01")
      .validate()
      .unwrap()
      .into_entry(EntryId::new(3).unwrap());
    let value = serde_json::to_value(&entry).unwrap();
    assert_eq!(
      value,
      serde_json::json!({ "id": 3, "subject": "Tom", "weight": 4.5, "date": "2024-01-01" })
    );
  }
}
