//! SQL schema for the pawlog SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- AUTOINCREMENT keeps ids from being reused after a delete.
CREATE TABLE IF NOT EXISTS weights (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    subject  TEXT NOT NULL CHECK (length(subject) > 0),
    weight   REAL NOT NULL CHECK (weight > 0),
    date     TEXT NOT NULL CHECK (length(date) = 10),   -- YYYY-MM-DD
    UNIQUE (subject, date)
);

CREATE INDEX IF NOT EXISTS weights_date_idx ON weights(date);

PRAGMA user_version = 1;
";
