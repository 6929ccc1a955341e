//! Nullable clock: deterministic time for challenge windows and vote periods.

use std::cell::Cell;
use svrp_types::Timestamp;

const SECS_PER_DAY: u64 = 24 * 3600;

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to.
pub struct NullClock {
    current: Cell<u64>,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current: Cell::new(initial_secs),
        }
    }

    /// Get the current time.
    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.current.get())
    }

    /// Advance time by a number of seconds.
    pub fn advance(&self, secs: u64) {
        self.current.set(self.current.get().saturating_add(secs));
    }

    pub fn advance_days(&self, days: u64) {
        self.advance(days.saturating_mul(SECS_PER_DAY));
    }

    /// Move to the first second at which a window of `window_secs` opened at
    /// `opened` is over.
    pub fn move_past(&self, opened: Timestamp, window_secs: u64) {
        self.set(opened.plus(window_secs).as_secs());
    }

    /// Set the time to a specific value.
    pub fn set(&self, secs: u64) {
        self.current.set(secs);
    }
}

impl Default for NullClock {
    fn default() -> Self {
        Self::new(1_000_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_only_on_request() {
        let clock = NullClock::new(10);
        assert_eq!(clock.now(), Timestamp::new(10));
        clock.advance(5);
        assert_eq!(clock.now(), Timestamp::new(15));
        clock.advance_days(1);
        assert_eq!(clock.now(), Timestamp::new(15 + 86_400));
    }

    #[test]
    fn move_past_lands_on_window_end() {
        let clock = NullClock::new(0);
        clock.move_past(Timestamp::new(100), 50);
        assert_eq!(clock.now(), Timestamp::new(150));
    }
}
