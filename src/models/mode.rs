use std::fmt;
use std::ops::{Index, IndexMut};

use chrono::Duration;

/// Operating program shown on the display while burning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    One,
    Two,
    Three,
    Four,
    Five,
    A,
}

impl Mode {
    pub const ALL: [Mode; 6] = [
        Mode::One,
        Mode::Two,
        Mode::Three,
        Mode::Four,
        Mode::Five,
        Mode::A,
    ];

    pub fn from_code(code: char) -> Option<Mode> {
        match code {
            '1' => Some(Mode::One),
            '2' => Some(Mode::Two),
            '3' => Some(Mode::Three),
            '4' => Some(Mode::Four),
            '5' => Some(Mode::Five),
            'A' => Some(Mode::A),
            _ => None,
        }
    }

    pub fn code(&self) -> char {
        match self {
            Mode::One => '1',
            Mode::Two => '2',
            Mode::Three => '3',
            Mode::Four => '4',
            Mode::Five => '5',
            Mode::A => 'A',
        }
    }

    fn index(&self) -> usize {
        match self {
            Mode::One => 0,
            Mode::Two => 1,
            Mode::Three => 2,
            Mode::Four => 3,
            Mode::Five => 4,
            Mode::A => 5,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Elapsed time attributed to each mode within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeDurations([Duration; 6]);

impl Default for ModeDurations {
    fn default() -> Self {
        Self([Duration::zero(); 6])
    }
}

impl ModeDurations {
    pub fn get(&self, mode: Mode) -> Duration {
        self[mode]
    }

    pub fn add(&mut self, mode: Mode, elapsed: Duration) {
        self[mode] = self[mode] + elapsed;
    }

    /// Sum over every mode.
    pub fn total(&self) -> Duration {
        self.0
            .iter()
            .fold(Duration::zero(), |acc, duration| acc + *duration)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Mode, Duration)> + '_ {
        Mode::ALL.iter().map(move |mode| (*mode, self[*mode]))
    }
}

impl Index<Mode> for ModeDurations {
    type Output = Duration;

    fn index(&self, mode: Mode) -> &Duration {
        &self.0[mode.index()]
    }
}

impl IndexMut<Mode> for ModeDurations {
    fn index_mut(&mut self, mode: Mode) -> &mut Duration {
        &mut self.0[mode.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_back_to_modes() {
        for mode in Mode::ALL {
            assert_eq!(Mode::from_code(mode.code()), Some(mode));
        }
        assert_eq!(Mode::from_code('0'), None);
        assert_eq!(Mode::from_code('7'), None);
    }

    #[test]
    fn total_sums_every_bucket() {
        let mut durations = ModeDurations::default();
        durations.add(Mode::One, Duration::seconds(30));
        durations.add(Mode::A, Duration::seconds(15));
        durations.add(Mode::One, Duration::seconds(5));

        assert_eq!(durations.get(Mode::One), Duration::seconds(35));
        assert_eq!(durations.total(), Duration::seconds(50));
        assert_eq!(durations.iter().count(), 6);
    }
}
