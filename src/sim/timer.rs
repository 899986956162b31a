//! Countdown clock
//!
//! Whole-second countdown driven by the session's 1000 ms scheduler task.
//! Freezing is imposed externally once any terminal outcome latches; a
//! frozen or exhausted countdown ignores further ticks, so the value can
//! never go negative.

/// Session countdown in whole seconds
#[derive(Debug, Clone)]
pub struct Countdown {
    remaining: u32,
    frozen: bool,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            frozen: false,
        }
    }

    /// Seconds left
    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Stop decrementing for the rest of the session
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// One whole-second tick. Returns true exactly when the countdown
    /// reaches zero; frozen or already-expired clocks do nothing.
    pub fn tick(&mut self) -> bool {
        if self.frozen || self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapses_exactly_once_and_never_goes_negative() {
        let mut countdown = Countdown::new(30);

        for second in 1..30 {
            assert!(!countdown.tick());
            assert_eq!(countdown.remaining(), 30 - second);
        }
        // The 30th tick signals expiry
        assert!(countdown.tick());
        assert_eq!(countdown.remaining(), 0);

        // No 31st decrement, no second signal
        assert!(!countdown.tick());
        assert_eq!(countdown.remaining(), 0);
    }

    #[test]
    fn frozen_countdown_ignores_ticks() {
        let mut countdown = Countdown::new(5);
        countdown.tick();
        countdown.freeze();
        assert!(!countdown.tick());
        assert_eq!(countdown.remaining(), 4);
        assert!(countdown.is_frozen());
    }
}
