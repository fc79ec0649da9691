use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{types::Value, ErrorCode};

use crate::models::RecordError;

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

/// True when the error (or anything it wraps) is a SQLite constraint violation.
pub fn is_constraint_violation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<rusqlite::Error>(),
            Some(rusqlite::Error::SqliteFailure(failure, _))
                if failure.code == ErrorCode::ConstraintViolation
        )
    })
}

pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Integer(_) => "integer",
        Value::Real(_) => "real",
        Value::Text(_) => "text",
        Value::Blob(_) => "blob",
    }
}

pub fn integer_column(value: Value, column: &'static str) -> Result<i64, RecordError> {
    match value {
        Value::Integer(number) => Ok(number),
        other => Err(RecordError::UnexpectedType {
            column,
            expected: "integer",
            found: value_type_name(&other),
        }),
    }
}

pub fn small_integer_column(value: Value, column: &'static str) -> Result<i32, RecordError> {
    let number = integer_column(value, column)?;
    i32::try_from(number).map_err(|_| RecordError::OutOfRange {
        column,
        value: number,
    })
}

pub fn optional_text_column(
    value: Value,
    column: &'static str,
) -> Result<Option<String>, RecordError> {
    match value {
        Value::Null => Ok(None),
        Value::Text(text) => Ok(Some(text)),
        other => Err(RecordError::UnexpectedType {
            column,
            expected: "text",
            found: value_type_name(&other),
        }),
    }
}

pub fn bool_column(value: Value, column: &'static str) -> Result<bool, RecordError> {
    match integer_column(value, column)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RecordError::OutOfRange {
            column,
            value: other,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_expected_types() {
        assert_eq!(integer_column(Value::Integer(7), "t"), Ok(7));
        assert_eq!(small_integer_column(Value::Integer(-3), "t"), Ok(-3));
        assert_eq!(bool_column(Value::Integer(1), "b"), Ok(true));
        assert_eq!(
            optional_text_column(Value::Text("1".into()), "m"),
            Ok(Some("1".to_string()))
        );
        assert_eq!(optional_text_column(Value::Null, "m"), Ok(None));
    }

    #[test]
    fn rejects_unexpected_types() {
        assert_eq!(
            small_integer_column(Value::Text("hot".into()), "temperature"),
            Err(RecordError::UnexpectedType {
                column: "temperature",
                expected: "integer",
                found: "text",
            })
        );
        assert_eq!(
            small_integer_column(Value::Integer(i64::MAX), "temperature"),
            Err(RecordError::OutOfRange {
                column: "temperature",
                value: i64::MAX,
            })
        );
        assert!(bool_column(Value::Integer(2), "is_burning").is_err());
        assert!(bool_column(Value::Real(1.0), "is_burning").is_err());
    }
}
