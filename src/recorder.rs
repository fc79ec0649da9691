use log::info;

use crate::db::Database;
use crate::models::{format_hms, Reading, Session};

/// Where accepted readings and finished sessions end up.
///
/// A dry-run recorder only logs what it would have written and reports every
/// write as successful.
#[derive(Clone)]
pub struct Recorder {
    db: Option<Database>,
}

impl Recorder {
    pub fn live(db: Database) -> Self {
        Self { db: Some(db) }
    }

    pub fn dry_run() -> Self {
        Self { db: None }
    }

    pub fn is_dry_run(&self) -> bool {
        self.db.is_none()
    }

    pub async fn persist_reading(&self, reading: &Reading) -> Option<i64> {
        match &self.db {
            Some(db) => db.insert_record(reading).await,
            None => {
                info!("{}", status_line(reading));
                Some(reading.system_timestamp())
            }
        }
    }

    pub async fn persist_session(&self, session: &Session) -> Option<i64> {
        match &self.db {
            Some(db) => db.insert_report(session).await,
            None => {
                info!("{}", session_line(session));
                Some(0)
            }
        }
    }
}

pub fn status_line(reading: &Reading) -> String {
    let burning = if reading.is_burning() { "Yes" } else { "No" };
    format!(
        "Current status: Marked time - {}|Temperature - {}|Running mode - {}|Burning - {}",
        reading.marked_time(),
        reading.temperature(),
        reading.running_mode(),
        burning
    )
}

pub fn session_line(session: &Session) -> String {
    let modes: Vec<String> = session
        .mode_durations
        .iter()
        .map(|(mode, duration)| format!("{mode}={}", format_hms(duration)))
        .collect();
    format!(
        "Session: {} -> {}|Avg temperature - {:.1}|Total - {}|Modes - {}",
        session.start_time,
        session.end_time,
        session.avg_temperature,
        format_hms(session.total_duration()),
        modes.join(" ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;
    use chrono::{Local, TimeZone};

    #[tokio::test]
    async fn dry_run_reports_success_without_storage() {
        let now = Local.with_ymd_and_hms(2026, 3, 14, 9, 41, 27).unwrap();
        let reading = parser::parse("1230\n3 65", now);

        let recorder = Recorder::dry_run();
        assert!(recorder.is_dry_run());
        assert_eq!(
            recorder.persist_reading(&reading).await,
            Some(reading.system_timestamp())
        );
    }

    #[test]
    fn status_line_lists_every_field() {
        let now = Local.with_ymd_and_hms(2026, 3, 14, 9, 41, 27).unwrap();
        let line = status_line(&parser::parse("1230\n45", now));
        assert_eq!(
            line,
            "Current status: Marked time - 2026-03-14 12:30:27|Temperature - 45|Running mode - 0|Burning - No"
        );
    }
}
