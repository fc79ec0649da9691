//! Decides which readings are worth persisting.
//!
//! The idle boiler shows the same "off" frame over and over. Unchanged
//! readings are suppressed, and a standby latch lets exactly one off reading
//! through per off-transition until the boiler burns again.

use crate::models::Reading;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterAction {
    Persist,
    Suppress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub action: FilterAction,
    pub next_standby: bool,
}

/// Evaluates one reading against the last accepted one and the standby latch.
pub fn decide(current: &Reading, previous: Option<&Reading>, standby: bool) -> Decision {
    if previous.is_some_and(|previous| current.same_state_as(previous)) {
        return Decision {
            action: FilterAction::Suppress,
            next_standby: standby,
        };
    }

    match (current.is_burning(), standby) {
        // Burning again clears the latch.
        (true, _) => Decision {
            action: FilterAction::Persist,
            next_standby: false,
        },
        // The off-transition itself is stored once, then the latch closes.
        (false, false) => Decision {
            action: FilterAction::Persist,
            next_standby: true,
        },
        (false, true) => Decision {
            action: FilterAction::Suppress,
            next_standby: true,
        },
    }
}

/// Cross-cycle filter state, owned by the caller and threaded through
/// [`FilterState::advance`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    previous: Option<Reading>,
    standby: bool,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous(&self) -> Option<&Reading> {
        self.previous.as_ref()
    }

    pub fn in_standby(&self) -> bool {
        self.standby
    }

    /// Returns the action for `current` and the state to use on the next cycle.
    pub fn advance(&self, current: Reading) -> (FilterAction, FilterState) {
        let decision = decide(&current, self.previous.as_ref(), self.standby);
        let previous = match decision.action {
            FilterAction::Persist => Some(current),
            FilterAction::Suppress => self.previous.clone(),
        };

        (
            decision.action,
            FilterState {
                previous,
                standby: decision.next_standby,
            },
        )
    }
}
