//! Recovery of the clock printed on the boiler display.
//!
//! OCR regularly drops, duplicates or splits the clock digits. Each display
//! shape seen in practice is an entry in a closed table keyed by
//! `(length, has_space)` giving the character ranges that hold the hour and
//! the minute. Anything outside the table falls back to the capture time.

use std::ops::Range;

use chrono::{DateTime, Local, NaiveDateTime, NaiveTime, Timelike};

use super::diagnostics::ParseDiagnostic;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ClockSlots {
    pub hour: Range<usize>,
    pub minute: Range<usize>,
}

pub(crate) fn slots_for(len: usize, has_space: bool) -> Option<ClockSlots> {
    let (hour, minute) = match (len, has_space) {
        (4, false) => (0..2, 2..4),
        (5, true) => (0..2, 3..5),
        (5, false) => (1..3, 3..5),
        (6, _) => (1..2, 5..6),
        _ => return None,
    };
    Some(ClockSlots { hour, minute })
}

/// Rebuilds the marked time from the (already trimmed) clock line.
///
/// The date and the seconds always come from `now`.
pub fn recover(clock: &str, now: DateTime<Local>) -> Result<NaiveDateTime, ParseDiagnostic> {
    let chars: Vec<char> = clock.chars().collect();
    let slots = slots_for(chars.len(), chars.contains(&' '))
        .ok_or_else(|| ParseDiagnostic::MarkedTimeShape(clock.to_string()))?;

    let value_error = || ParseDiagnostic::MarkedTimeValue(clock.to_string());
    let hour = digits(&chars[slots.hour]).ok_or_else(value_error)?;
    let minute = digits(&chars[slots.minute]).ok_or_else(value_error)?;
    let time = NaiveTime::from_hms_opt(hour, minute, now.second()).ok_or_else(value_error)?;

    Ok(now.date_naive().and_time(time))
}

/// Time-of-day fallback used whenever the clock line can't be read.
pub fn fallback(now: DateTime<Local>) -> NaiveDateTime {
    now.naive_local()
}

fn digits(chars: &[char]) -> Option<u32> {
    let text: String = chars.iter().collect();
    text.trim().parse().ok()
}
