use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use log::error;
use rusqlite::{params, types::Value, Row};

use crate::db::{
    connection::Database,
    helpers::{bool_column, integer_column, is_constraint_violation, optional_text_column, small_integer_column},
};
use crate::models::{Reading, RecordError, StoredRecord, OFF_MODE};

/// Decodes one row column by column so a single bad value only loses its own row.
fn row_to_record(row: &Row) -> rusqlite::Result<Result<StoredRecord, RecordError>> {
    let system_timestamp: Value = row.get("system_timestamp")?;
    let temperature: Value = row.get("temperature")?;
    let marked_time: Value = row.get("marked_time")?;
    let running_mode: Value = row.get("running_mode")?;
    let is_burning: Value = row.get("is_burning")?;

    Ok(decode_record(
        system_timestamp,
        temperature,
        marked_time,
        running_mode,
        is_burning,
    ))
}

fn decode_record(
    system_timestamp: Value,
    temperature: Value,
    marked_time: Value,
    running_mode: Value,
    is_burning: Value,
) -> Result<StoredRecord, RecordError> {
    let timestamp = integer_column(system_timestamp, "system_timestamp")?;
    let captured_at = Utc
        .timestamp_opt(timestamp, 0)
        .single()
        .ok_or(RecordError::InvalidTimestamp(timestamp))?;
    let running_mode = optional_text_column(running_mode, "running_mode")?
        .and_then(|mode| mode.chars().next())
        .unwrap_or(OFF_MODE);

    Ok(StoredRecord {
        captured_at,
        temperature: small_integer_column(temperature, "temperature")?,
        marked_time: optional_text_column(marked_time, "marked_time")?,
        running_mode,
        is_burning: bool_column(is_burning, "is_burning")?,
    })
}

impl Database {
    pub async fn try_insert_record(&self, reading: &Reading) -> Result<i64> {
        let system_timestamp = reading.system_timestamp();
        let temperature = reading.temperature();
        let marked_time = reading.formatted_marked_time();
        let running_mode = reading.running_mode().to_string();
        let is_burning = reading.is_burning();

        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO records (system_timestamp, temperature, marked_time, running_mode, is_burning)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![system_timestamp, temperature, marked_time, running_mode, is_burning],
            )
            .with_context(|| format!("failed to insert record {system_timestamp}"))?;
            Ok(system_timestamp)
        })
        .await
    }

    /// Stores a reading keyed by its capture second.
    ///
    /// Returns `None` after logging when the write fails; a second reading in
    /// the same second is an integrity error.
    pub async fn insert_record(&self, reading: &Reading) -> Option<i64> {
        match self.try_insert_record(reading).await {
            Ok(id) => Some(id),
            Err(err) if is_constraint_violation(&err) => {
                error!("Integrity error: {err:#}");
                None
            }
            Err(err) => {
                error!("Command error: {err:#}");
                None
            }
        }
    }

    /// All records strictly after `since`, oldest first. Each row decodes on its own.
    pub async fn get_records_after(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<Result<StoredRecord, RecordError>>> {
        let since = since.timestamp();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT
                    system_timestamp,
                    temperature,
                    marked_time,
                    running_mode,
                    is_burning
                FROM records
                WHERE system_timestamp > ?1
                ORDER BY system_timestamp ASC",
            )?;

            let rows_iter = stmt.query_map(params![since], |row| row_to_record(row))?;

            let mut rows = Vec::new();
            for row_result in rows_iter {
                rows.push(row_result?);
            }

            Ok(rows)
        })
        .await
    }
}
