use chrono::{DateTime, Local, NaiveDateTime};

/// Running mode code shown while the boiler is off or the mode is unreadable.
pub const OFF_MODE: char = '0';

/// Format used when a marked time is written to storage.
pub const MARKED_TIME_FORMAT: &str = "%Y-%m-%dT%H:%MZ";

/// One interpreted OCR capture of the boiler display.
///
/// Built once per polling cycle by the parser and never mutated afterwards.
/// When `is_burning` is false the running mode is always [`OFF_MODE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reading {
    captured_at: DateTime<Local>,
    marked_time: NaiveDateTime,
    is_burning: bool,
    running_mode: char,
    temperature: i32,
}

impl Reading {
    pub(crate) fn new(
        captured_at: DateTime<Local>,
        marked_time: NaiveDateTime,
        is_burning: bool,
        running_mode: char,
        temperature: i32,
    ) -> Self {
        let running_mode = if is_burning { running_mode } else { OFF_MODE };
        Self {
            captured_at,
            marked_time,
            is_burning,
            running_mode,
            temperature,
        }
    }

    pub fn captured_at(&self) -> DateTime<Local> {
        self.captured_at
    }

    pub fn marked_time(&self) -> NaiveDateTime {
        self.marked_time
    }

    pub fn is_burning(&self) -> bool {
        self.is_burning
    }

    pub fn running_mode(&self) -> char {
        self.running_mode
    }

    pub fn temperature(&self) -> i32 {
        self.temperature
    }

    /// Unix seconds of the capture, used as the storage key.
    pub fn system_timestamp(&self) -> i64 {
        self.captured_at.timestamp()
    }

    pub fn formatted_marked_time(&self) -> String {
        self.marked_time.format(MARKED_TIME_FORMAT).to_string()
    }

    /// True when both readings show the same burning flag, temperature and mode.
    pub fn same_state_as(&self, other: &Reading) -> bool {
        self.is_burning == other.is_burning
            && self.temperature == other.temperature
            && self.running_mode == other.running_mode
    }
}
