use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use log::{error, info};
use rusqlite::params;

use crate::db::{
    connection::Database,
    helpers::{is_constraint_violation, parse_datetime},
};
use crate::models::{format_hms, round_one_decimal, Mode, Session};

/// 2026-02-03T00:00:00Z, the lower bound used before any report exists.
const DEFAULT_REPORT_EPOCH_SECS: i64 = 1_770_076_800;

pub fn default_report_epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(DEFAULT_REPORT_EPOCH_SECS, 0)
        .single()
        .unwrap_or_default()
}

impl Database {
    /// Latest `end_time` over stored reports, or the default epoch when there are none.
    pub async fn get_last_report_end_time(&self) -> Result<DateTime<Utc>> {
        self.execute(|conn| {
            let latest: Option<String> = conn
                .query_row("SELECT MAX(end_time) FROM reports", [], |row| row.get(0))
                .context("failed to fetch latest report end time")?;

            match latest {
                Some(raw) => parse_datetime(&raw, "end_time"),
                None => {
                    info!("No rows found in reports table, using default start date");
                    Ok(default_report_epoch())
                }
            }
        })
        .await
    }

    pub async fn try_insert_report(&self, session: &Session) -> Result<i64> {
        let record = session.clone();
        self.execute(move |conn| {
            let durations = record.mode_durations;
            conn.execute(
                "INSERT INTO reports (
                    start_time,
                    end_time,
                    avg_temperature,
                    mode1,
                    mode2,
                    mode3,
                    mode4,
                    mode5,
                    mode_a,
                    total_duration,
                    has_standby
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    record.start_time.to_rfc3339(),
                    record.end_time.to_rfc3339(),
                    round_one_decimal(record.avg_temperature),
                    format_hms(durations.get(Mode::One)),
                    format_hms(durations.get(Mode::Two)),
                    format_hms(durations.get(Mode::Three)),
                    format_hms(durations.get(Mode::Four)),
                    format_hms(durations.get(Mode::Five)),
                    format_hms(durations.get(Mode::A)),
                    format_hms(record.total_duration()),
                    record.has_standby,
                ],
            )
            .with_context(|| "failed to insert report")?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    /// Stores a session, returning its report id or `None` after logging a failure.
    pub async fn insert_report(&self, session: &Session) -> Option<i64> {
        match self.try_insert_report(session).await {
            Ok(id) => {
                info!("Inserted report record with ID {id}");
                Some(id)
            }
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModeDurations;
    use chrono::Duration;
    use tempfile::tempdir;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn session(start: i64, end: i64) -> Session {
        let mut mode_durations = ModeDurations::default();
        mode_durations.add(Mode::One, Duration::seconds(end - start - 60));
        mode_durations.add(Mode::A, Duration::seconds(60));
        Session {
            start_time: at(start),
            end_time: at(end),
            avg_temperature: 61.25,
            mode_durations,
            has_standby: false,
            reading_count: 4,
        }
    }

    #[tokio::test]
    async fn empty_store_uses_default_epoch() -> Result<()> {
        let dir = tempdir()?;
        let db = Database::new(dir.path().join("boiler.sqlite3"))?;

        let since = db.get_last_report_end_time().await?;
        assert_eq!(since, default_report_epoch());
        assert_eq!(since.to_rfc3339(), "2026-02-03T00:00:00+00:00");
        Ok(())
    }

    #[tokio::test]
    async fn last_end_time_follows_inserted_reports() -> Result<()> {
        let dir = tempdir()?;
        let db = Database::new(dir.path().join("boiler.sqlite3"))?;

        let first = DEFAULT_REPORT_EPOCH_SECS + 3_600;
        assert!(db.insert_report(&session(first, first + 7_200)).await.is_some());
        assert!(db.insert_report(&session(first + 10_000, first + 12_000)).await.is_some());

        assert_eq!(db.get_last_report_end_time().await?, at(first + 12_000));
        Ok(())
    }

    #[tokio::test]
    async fn writes_durations_as_clock_text() -> Result<()> {
        let dir = tempdir()?;
        let db = Database::new(dir.path().join("boiler.sqlite3"))?;

        let start = DEFAULT_REPORT_EPOCH_SECS;
        let id = db
            .insert_report(&session(start, start + 3_725))
            .await
            .expect("report inserted");

        let (mode1, mode_a, total, avg): (String, String, String, f64) = db
            .execute(move |conn| {
                Ok(conn.query_row(
                    "SELECT mode1, mode_a, total_duration, avg_temperature FROM reports WHERE id = ?1",
                    params![id],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
                )?)
            })
            .await?;

        assert_eq!(mode1, "01:01:05");
        assert_eq!(mode_a, "00:01:00");
        assert_eq!(total, "01:02:05");
        assert_eq!(avg, 61.2);
        Ok(())
    }
}
