use chrono::{DateTime, Duration, Utc};

/// Default test time budget: 20 minutes.
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 20 * 60;

/// A simple clock abstraction for deterministic time in services and tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// If this is a fixed clock, advance it by the given duration.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }
}

/// Deterministic timestamp for tests (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Whole-second countdown from a fixed budget.
///
/// The owner calls [`Countdown::tick`] once per elapsed second; there is no
/// drift correction and no pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    budget_secs: u32,
    remaining_secs: u32,
}

impl Countdown {
    #[must_use]
    pub fn new(budget_secs: u32) -> Self {
        Self {
            budget_secs,
            remaining_secs: budget_secs,
        }
    }

    /// Resume with a previously saved remaining time, clamped to the budget.
    #[must_use]
    pub fn with_remaining(budget_secs: u32, remaining_secs: u32) -> Self {
        Self {
            budget_secs,
            remaining_secs: remaining_secs.min(budget_secs),
        }
    }

    #[must_use]
    pub fn budget_secs(&self) -> u32 {
        self.budget_secs
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining_secs == 0
    }

    /// Consume one second. Returns `true` once the budget is exhausted.
    pub fn tick(&mut self) -> bool {
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        self.is_expired()
    }

    /// Fraction of the budget already spent, in `0.0..=1.0`.
    #[must_use]
    pub fn elapsed_fraction(&self) -> f64 {
        if self.budget_secs == 0 {
            return 1.0;
        }
        f64::from(self.budget_secs - self.remaining_secs) / f64::from(self.budget_secs)
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_LIMIT_SECS)
    }
}
