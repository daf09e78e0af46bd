//! Day-streak computation over lesson completion timestamps.
//!
//! A streak is the number of consecutive calendar days, ending today or
//! yesterday, on which at least one lesson was completed. Calendar days are
//! taken in a single fixed offset per calculator so that every timestamp and
//! the reference "now" are bucketed the same way.

use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

use crate::time::Clock;

/// Counts the consecutive-day streak for a set of completion dates.
///
/// The walk anchors at `today` when it holds a completion, otherwise at the
/// day before. Duplicates collapse to one day and the count stops at the
/// first missing day. Dates after `today` are ignored.
#[must_use]
pub fn calculate_streak<I>(dates: I, today: NaiveDate) -> u32
where
    I: IntoIterator<Item = NaiveDate>,
{
    let days: BTreeSet<NaiveDate> = dates.into_iter().filter(|day| *day <= today).collect();

    let Some(yesterday) = today.pred_opt() else {
        return u32::from(days.contains(&today));
    };

    let anchor = if days.contains(&today) {
        today
    } else if days.contains(&yesterday) {
        yesterday
    } else {
        return 0;
    };

    days.iter()
        .rev()
        .skip_while(|day| **day > anchor)
        .try_fold((anchor, 0_u32), |(expected, streak), day| {
            if *day != expected {
                return Err(streak);
            }
            let streak = streak.saturating_add(1);
            match expected.pred_opt() {
                Some(next) => Ok((next, streak)),
                None => Err(streak),
            }
        })
        .map_or_else(|streak| streak, |(_, streak)| streak)
}

/// Streak calculator bound to the offset used for calendar-day bucketing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakCalculator {
    offset: FixedOffset,
}

impl Default for StreakCalculator {
    fn default() -> Self {
        Self::utc()
    }
}

impl StreakCalculator {
    #[must_use]
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Calculator that buckets days at UTC midnight.
    #[must_use]
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    #[must_use]
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Calendar date of `at` in this calculator's offset.
    #[must_use]
    pub fn calendar_day(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    /// Streak length for `completions` relative to `now`.
    #[must_use]
    pub fn streak<I>(&self, completions: I, now: DateTime<Utc>) -> u32
    where
        I: IntoIterator<Item = DateTime<Utc>>,
    {
        calculate_streak(
            completions.into_iter().map(|at| self.calendar_day(at)),
            self.calendar_day(now),
        )
    }

    #[must_use]
    pub fn streak_with_clock<I>(&self, completions: I, clock: &Clock) -> u32
    where
        I: IntoIterator<Item = DateTime<Utc>>,
    {
        self.streak(completions, clock.now())
    }
}
