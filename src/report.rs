use anyhow::{Context, Result};
use log::info;

use crate::aggregation::SessionAggregator;
use crate::db::Database;
use crate::recorder::Recorder;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub rows: usize,
    pub skipped: usize,
    pub sessions: usize,
    pub failed: usize,
    pub left_open: bool,
}

/// Turns every record stored since the last report into session reports.
pub async fn run_report(db: &Database, recorder: &Recorder) -> Result<ReportSummary> {
    let since = db
        .get_last_report_end_time()
        .await
        .context("failed to read last report time")?;
    info!("Aggregating records after {since}");

    let rows = db
        .get_records_after(since)
        .await
        .context("failed to fetch records")?;

    let mut summary = ReportSummary {
        rows: rows.len(),
        ..ReportSummary::default()
    };
    let mut aggregator = SessionAggregator::new();
    for row in rows {
        let Some(session) = aggregator.push_result(row) else {
            continue;
        };
        match recorder.persist_session(&session).await {
            Some(_) => summary.sessions += 1,
            None => summary.failed += 1,
        }
    }

    summary.skipped = aggregator.skipped();
    summary.left_open = aggregator.pending().is_some();
    if let Some(open) = aggregator.pending() {
        info!(
            "Session started at {} is still burning; it will be reported next run",
            open.start_time
        );
    }

    info!(
        "Report done: {} rows, {} skipped, {} sessions written, {} failed",
        summary.rows, summary.skipped, summary.sessions, summary.failed
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;
    use chrono::{DateTime, Local, TimeZone};
    use tempfile::tempdir;

    fn at(minute: u32, second: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 14, 9, minute, second).unwrap()
    }

    async fn store(db: &Database, text: &str, captured_at: DateTime<Local>) {
        let reading = parser::parse(text, captured_at);
        assert!(db.insert_record(&reading).await.is_some());
    }

    #[tokio::test]
    async fn reports_closed_sessions_once() -> Result<()> {
        let dir = tempdir()?;
        let db = Database::new(dir.path().join("boiler.sqlite3"))?;
        let recorder = Recorder::live(db.clone());

        store(&db, "0900\n1 18", at(0, 0)).await;
        store(&db, "0901\n1 19", at(1, 0)).await;
        store(&db, "0902\n00", at(2, 0)).await;
        store(&db, "0910\n2 40", at(10, 0)).await;

        let first = run_report(&db, &recorder).await?;
        assert_eq!(
            first,
            ReportSummary {
                rows: 4,
                skipped: 0,
                sessions: 1,
                failed: 0,
                left_open: true,
            }
        );
        assert_eq!(
            db.get_last_report_end_time().await?,
            at(2, 0).with_timezone(&chrono::Utc)
        );

        // Only the still-open burn is picked up again.
        store(&db, "0911\n50", at(11, 0)).await;
        let second = run_report(&db, &recorder).await?;
        assert_eq!(second.rows, 2);
        assert_eq!(second.sessions, 1);
        assert!(!second.left_open);
        Ok(())
    }

    #[tokio::test]
    async fn dry_run_writes_nothing() -> Result<()> {
        let dir = tempdir()?;
        let db = Database::new(dir.path().join("boiler.sqlite3"))?;

        store(&db, "0900\n1 18", at(0, 0)).await;
        store(&db, "0902\n00", at(2, 0)).await;

        let summary = run_report(&db, &Recorder::dry_run()).await?;
        assert_eq!(summary.sessions, 1);
        assert_eq!(
            db.get_last_report_end_time().await?,
            crate::db::default_report_epoch()
        );
        Ok(())
    }

    #[tokio::test]
    async fn empty_store_reports_nothing() -> Result<()> {
        let dir = tempdir()?;
        let db = Database::new(dir.path().join("boiler.sqlite3"))?;

        let summary = run_report(&db, &Recorder::live(db.clone())).await?;
        assert_eq!(summary, ReportSummary::default());
        Ok(())
    }
}
