use chrono::{DateTime, Utc};
use log::{debug, error};

use crate::models::{round_one_decimal, Mode, ModeDurations, RecordError, Session, StoredRecord};

/// A session that has seen a burning row but no closing off row yet.
#[derive(Debug, Clone)]
pub struct OpenSession {
    pub start_time: DateTime<Utc>,
    pub mode_durations: ModeDurations,
    temperature_sum: i64,
    temperature_count: usize,
    last_mode: Option<Mode>,
}

impl OpenSession {
    fn start(start_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            mode_durations: ModeDurations::default(),
            temperature_sum: 0,
            temperature_count: 0,
            last_mode: None,
        }
    }

    fn fold(&mut self, record: &StoredRecord) {
        self.temperature_sum += i64::from(record.temperature);
        self.temperature_count += 1;

        if let Some(mode) = Mode::from_code(record.running_mode) {
            self.attribute_to(mode, record.captured_at);
            self.last_mode = Some(mode);
        }
    }

    /// Assigns all time since `start_time` not yet attributed to any mode.
    fn attribute_to(&mut self, mode: Mode, at: DateTime<Utc>) {
        let unattributed = at - self.start_time - self.mode_durations.total();
        self.mode_durations.add(mode, unattributed);
    }

    fn close(mut self, end_time: DateTime<Utc>) -> Session {
        if let Some(mode) = self.last_mode {
            self.attribute_to(mode, end_time);
        }

        let avg_temperature = if self.temperature_count == 0 {
            0.0
        } else {
            round_one_decimal(self.temperature_sum as f64 / self.temperature_count as f64)
        };

        Session {
            start_time: self.start_time,
            end_time,
            avg_temperature,
            mode_durations: self.mode_durations,
            has_standby: false,
            reading_count: self.temperature_count,
        }
    }
}

/// Regroups persisted reading rows into burn sessions in a single forward pass.
///
/// Rows must arrive in ascending timestamp order. A session opens on the first
/// burning row, folds every burning row after it and closes on the next off
/// row. A session still open when the input ends is never emitted.
#[derive(Debug, Default)]
pub struct SessionAggregator {
    open: Option<OpenSession>,
    last_seen: Option<DateTime<Utc>>,
    skipped: usize,
}

impl SessionAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one row, returning the session it closes, if any.
    pub fn push(&mut self, record: &StoredRecord) -> Option<Session> {
        if let Some(last_seen) = self.last_seen {
            if record.captured_at < last_seen {
                error!(
                    "Skipping out-of-order row at {} (previous row at {})",
                    record.captured_at, last_seen
                );
                self.skipped += 1;
                return None;
            }
        }
        self.last_seen = Some(record.captured_at);

        if !record.is_burning {
            return self
                .open
                .take()
                .map(|session| session.close(record.captured_at));
        }

        self.open
            .get_or_insert_with(|| OpenSession::start(record.captured_at))
            .fold(record);
        None
    }

    /// Feeds a row that may have failed to decode. Bad rows are logged and skipped.
    pub fn push_result(&mut self, row: Result<StoredRecord, RecordError>) -> Option<Session> {
        match row {
            Ok(record) => self.push(&record),
            Err(err) => {
                error!("Skipping malformed record row: {err}");
                self.skipped += 1;
                None
            }
        }
    }

    pub fn pending(&self) -> Option<&OpenSession> {
        self.open.as_ref()
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Runs a whole batch of rows through a fresh [`SessionAggregator`].
pub fn aggregate<I>(rows: I) -> Vec<Session>
where
    I: IntoIterator<Item = Result<StoredRecord, RecordError>>,
{
    let mut aggregator = SessionAggregator::new();
    let sessions: Vec<Session> = rows
        .into_iter()
        .filter_map(|row| aggregator.push_result(row))
        .collect();

    if let Some(open) = aggregator.pending() {
        debug!(
            "Session started at {} is still open; leaving it for the next run",
            open.start_time
        );
    }

    sessions
}
