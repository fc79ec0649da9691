use chrono::{DateTime, Duration, Utc};

use super::ModeDurations;

/// A closed run of burning activity, the unit written to the reports table.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Mean burning temperature, rounded to one decimal.
    pub avg_temperature: f64,
    pub mode_durations: ModeDurations,
    /// Carried for the reports schema; nothing sets it yet.
    pub has_standby: bool,
    pub reading_count: usize,
}

impl Session {
    pub fn total_duration(&self) -> Duration {
        self.end_time - self.start_time
    }
}

/// Rounds to one decimal place. Exact halves go to the even digit.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// Formats a duration as `HH:MM:SS`. Hours are not wrapped at 24.
pub fn format_hms(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
