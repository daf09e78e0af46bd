//! Reference clock for completion stamps and streak evaluation.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};

/// Source of "now" for services. Fixed clocks make completions and streaks
/// reproducible.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Calendar day of "now" as seen from `offset`.
    #[must_use]
    pub fn today(&self, offset: FixedOffset) -> NaiveDate {
        self.now().with_timezone(&offset).date_naive()
    }

    /// Same wall-clock time `days` days before "now".
    ///
    /// Returns `None` when the result leaves chrono's representable range.
    #[must_use]
    pub fn days_before(&self, days: u32) -> Option<DateTime<Utc>> {
        days_before(self.now(), days)
    }

    /// Moves a fixed clock forward by `delta`. A system clock is untouched,
    /// and so is a fixed clock the move would push out of range.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            if let Some(next) = t.checked_add_signed(delta) {
                *t = next;
            }
        }
    }

    #[must_use]
    pub fn is_fixed(&self) -> bool {
        matches!(self, Clock::Fixed(_))
    }
}

/// `at` shifted back by whole days, or `None` on overflow.
#[must_use]
pub fn days_before(at: DateTime<Utc>, days: u32) -> Option<DateTime<Utc>> {
    at.checked_sub_signed(Duration::try_days(i64::from(days))?)
}

/// Reference instant shared by tests and the demo: 2024-06-10T12:00:00Z.
pub const FIXED_TEST_TIMESTAMP: i64 = 1_718_020_800;

/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// A clock pinned at [`fixed_now`].
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn fixed_now_is_midday_june_tenth() {
        let now = fixed_now();
        assert_eq!((now.year(), now.month(), now.day()), (2024, 6, 10));
        assert_eq!(now.hour(), 12);
    }

    #[test]
    fn today_depends_on_offset() {
        let clock = Clock::fixed(fixed_now() + Duration::hours(11));
        let utc = FixedOffset::east_opt(0).unwrap();
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();

        assert_eq!(clock.today(utc), NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        assert_eq!(clock.today(plus_two), NaiveDate::from_ymd_opt(2024, 6, 11).unwrap());
    }

    #[test]
    fn days_before_is_checked() {
        let clock = fixed_clock();
        assert_eq!(clock.days_before(3), Some(fixed_now() - Duration::days(3)));
        assert_eq!(clock.days_before(0), Some(fixed_now()));
        assert_eq!(clock.days_before(u32::MAX), None);
    }

    #[test]
    fn advance_moves_fixed_clocks_only() {
        let mut clock = fixed_clock();
        clock.advance(Duration::days(1));
        assert_eq!(clock.now(), fixed_now() + Duration::days(1));

        let mut pinned = Clock::fixed(DateTime::<Utc>::MAX_UTC);
        pinned.advance(Duration::days(1));
        assert_eq!(pinned.now(), DateTime::<Utc>::MAX_UTC);

        let mut real = Clock::default_clock();
        real.advance(Duration::days(1));
        assert!(!real.is_fixed());
    }
}
