use chrono::{DateTime, Utc};
use thiserror::Error;

use super::reading::OFF_MODE;

/// A reading row as it was persisted in the records table.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub captured_at: DateTime<Utc>,
    pub temperature: i32,
    pub marked_time: Option<String>,
    pub running_mode: char,
    pub is_burning: bool,
}

impl StoredRecord {
    pub fn new(
        captured_at: DateTime<Utc>,
        temperature: i32,
        running_mode: char,
        is_burning: bool,
    ) -> Self {
        Self {
            captured_at,
            temperature,
            marked_time: None,
            running_mode: if is_burning { running_mode } else { OFF_MODE },
            is_burning,
        }
    }
}

/// A stored row that could not be turned into a [`StoredRecord`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("column {column} holds {found}, expected {expected}")]
    UnexpectedType {
        column: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("column {column} value {value} is out of range")]
    OutOfRange { column: &'static str, value: i64 },
    #[error("system timestamp {0} is not a valid instant")]
    InvalidTimestamp(i64),
}
