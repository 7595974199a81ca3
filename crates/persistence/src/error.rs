// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.


use std::fmt;

/// Failures of the `SQLite` store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// Diesel reported an error while running a statement.
    Database(String),
    /// The connection could not be opened.
    Connection(String),
    /// Embedded migrations could not be applied.
    Migration(String),
    /// A stored row could not be turned back into a domain value.
    InvalidRecord(String),
    /// The database path is not valid UTF-8.
    InvalidPath,
    /// `PRAGMA foreign_keys` is off on this connection.
    ForeignKeysDisabled,
    /// A row a transition depends on is gone.
    MissingRow(String),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database(msg) => write!(f, "Database error: {msg}"),
            Self::Connection(msg) => write!(f, "Could not open database: {msg}"),
            Self::Migration(msg) => write!(f, "Migration failed: {msg}"),
            Self::InvalidRecord(msg) => write!(f, "Stored record is invalid: {msg}"),
            Self::InvalidPath => f.write_str("Database path is not valid UTF-8"),
            Self::ForeignKeysDisabled => f.write_str("Foreign key enforcement is not enabled"),
            Self::MissingRow(what) => write!(f, "Missing row: {what}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::MissingRow(String::from("record not found")),
            other => Self::Database(other.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::Connection(err.to_string())
    }
}
