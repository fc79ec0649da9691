//! Turns the raw two-line OCR text of the boiler display into a [`Reading`].
//!
//! Line 0 carries the display clock. Line 1 carries `<mode> <temperature>`
//! while burning and a bare temperature otherwise. Parsing is total: every
//! malformed field degrades to a fixed fallback and yields a
//! [`ParseDiagnostic`] instead of an error.

pub mod diagnostics;
pub mod marked_time;

use chrono::{DateTime, Local};

pub use diagnostics::ParseDiagnostic;

use crate::models::{Reading, OFF_MODE};

/// Display texts at least this long are burning layouts.
const BURNING_MIN_LEN: usize = 8;

/// Parses display text and logs every recovered problem.
pub fn parse(raw_text: &str, now: DateTime<Local>) -> Reading {
    let (reading, diagnostics) = parse_with_diagnostics(raw_text, now);
    for diagnostic in &diagnostics {
        log::log!(diagnostic.level(), "{diagnostic}");
    }
    reading
}

/// Parses display text, returning the reading with what had to be recovered.
pub fn parse_with_diagnostics(
    raw_text: &str,
    now: DateTime<Local>,
) -> (Reading, Vec<ParseDiagnostic>) {
    let mut diagnostics = Vec::new();
    let lines: Vec<&str> = raw_text.lines().collect();

    let (clock_line, value_line) = match lines.as_slice() {
        [clock, value, ..] => (clock.trim(), value.trim()),
        _ => {
            diagnostics.push(ParseDiagnostic::MissingLines { lines: lines.len() });
            let reading = Reading::new(now, marked_time::fallback(now), false, OFF_MODE, 0);
            return (reading, diagnostics);
        }
    };

    let is_burning = raw_text.chars().count() >= BURNING_MIN_LEN;

    let marked_time = marked_time::recover(clock_line, now).unwrap_or_else(|diagnostic| {
        diagnostics.push(diagnostic);
        marked_time::fallback(now)
    });

    let running_mode = if is_burning {
        value_line.chars().next().unwrap_or(OFF_MODE)
    } else {
        OFF_MODE
    };

    let temperature = read_temperature(value_line, is_burning).unwrap_or_else(|diagnostic| {
        diagnostics.push(diagnostic);
        0
    });

    let reading = Reading::new(now, marked_time, is_burning, running_mode, temperature);
    (reading, diagnostics)
}

fn read_temperature(value_line: &str, is_burning: bool) -> Result<i32, ParseDiagnostic> {
    let failure = || ParseDiagnostic::Temperature(value_line.to_string());

    let digits: String = if is_burning {
        let chars: Vec<char> = value_line.chars().collect();
        if chars.len() < 2 {
            return Err(failure());
        }
        chars[chars.len() - 2..].iter().collect()
    } else {
        value_line.to_string()
    };

    digits.trim().parse().map_err(|_| failure())
}
