//! Pure calendar-period arithmetic for habit goals.
//!
//! A period is the inclusive date range corresponding to one instance of a
//! goal type, anchored to a reference date: the day itself for daily goals,
//! Monday through Sunday for weekly goals, and the calendar month for monthly
//! goals. Everything in this module is a pure function of its arguments; the
//! "current" period is simply the period computed for today's date, which
//! callers pass in explicitly so the arithmetic stays testable.

use chrono::{Datelike, Duration, Months, NaiveDate};

use crate::entities::GoalType;

/// An inclusive calendar date range covering one goal period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    /// First date of the period
    pub start: NaiveDate,
    /// Last date of the period (inclusive)
    pub end: NaiveDate,
}

impl Period {
    /// Whether `date` falls within this period (boundaries included).
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days the period spans.
    #[must_use]
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Calculates the period containing `reference_date` for the given goal type.
///
/// - Daily: the single day itself.
/// - Weekly: Monday through Sunday of the reference date's week.
/// - Monthly: the 1st through the last day of the reference date's month,
///   honoring month length and leap years (Feb 2024 ends on the 29th,
///   Feb 2025 on the 28th).
#[must_use]
pub fn period_boundaries(goal_type: GoalType, reference_date: NaiveDate) -> Period {
    match goal_type {
        GoalType::Daily => Period {
            start: reference_date,
            end: reference_date,
        },
        GoalType::Weekly => {
            // Week runs Monday (0) to Sunday (6)
            let days_since_monday =
                i64::from(reference_date.weekday().num_days_from_monday());
            let start = reference_date - Duration::days(days_since_monday);
            Period {
                start,
                end: start + Duration::days(6),
            }
        }
        GoalType::Monthly => {
            let start = first_of_month(reference_date);
            // Last day of month: 1st of next month, back one day
            let end = start + Months::new(1) - Duration::days(1);
            Period { start, end }
        }
    }
}

/// Start date of the period immediately before the one containing
/// `reference_date`.
///
/// - Daily: the previous day.
/// - Weekly: Monday of the previous week.
/// - Monthly: the 1st of the previous month (Jan steps back into December of
///   the previous year).
#[must_use]
pub fn previous_period_start(reference_date: NaiveDate, goal_type: GoalType) -> NaiveDate {
    match goal_type {
        GoalType::Daily => reference_date - Duration::days(1),
        GoalType::Weekly => {
            let days_since_monday =
                i64::from(reference_date.weekday().num_days_from_monday());
            let current_week_monday = reference_date - Duration::days(days_since_monday);
            current_week_monday - Duration::days(7)
        }
        GoalType::Monthly => first_of_month(reference_date) - Months::new(1),
    }
}

/// Number of days in one period of the given goal type: 1 for daily, 7 for
/// weekly, and the length of `today`'s month for monthly.
#[must_use]
pub fn days_in_period(goal_type: GoalType, today: NaiveDate) -> i64 {
    match goal_type {
        GoalType::Daily => 1,
        GoalType::Weekly => 7,
        GoalType::Monthly => period_boundaries(GoalType::Monthly, today).num_days(),
    }
}

/// Whether `date` falls within the period containing `today`.
#[must_use]
pub fn is_date_in_current_period(date: NaiveDate, goal_type: GoalType, today: NaiveDate) -> bool {
    period_boundaries(goal_type, today).contains(date)
}

/// Human-readable label for the period containing `reference_date`.
///
/// Examples: `"Friday, Dec 13"`, `"Week of Dec 09 - Dec 15"`,
/// `"December 2024"`. English only; localized labels are the caller's job.
#[must_use]
pub fn format_period_label(goal_type: GoalType, reference_date: NaiveDate) -> String {
    match goal_type {
        GoalType::Daily => reference_date.format("%A, %b %d").to_string(),
        GoalType::Weekly => {
            let period = period_boundaries(GoalType::Weekly, reference_date);
            format!(
                "Week of {} - {}",
                period.start.format("%b %d"),
                period.end.format("%b %d")
            )
        }
        GoalType::Monthly => reference_date.format("%B %Y").to_string(),
    }
}

/// Upper bound on how many periods [`periods_back`] will yield, roughly ten
/// years per goal type. Guarantees the backward walk terminates regardless of
/// how much data a habit has.
#[must_use]
pub const fn max_periods(goal_type: GoalType) -> u32 {
    match goal_type {
        GoalType::Daily => 3650,
        GoalType::Weekly => 520,
        GoalType::Monthly => 120,
    }
}

/// Lazy, finite sequence of periods walking backward in time.
///
/// Created by [`periods_back`]; yields the period containing the anchor date
/// first, then each immediately-preceding period, stopping after
/// [`max_periods`] items.
#[derive(Debug, Clone)]
pub struct PeriodsBack {
    goal_type: GoalType,
    cursor: NaiveDate,
    remaining: u32,
}

impl Iterator for PeriodsBack {
    type Item = Period;

    fn next(&mut self) -> Option<Period> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let period = period_boundaries(self.goal_type, self.cursor);
        self.cursor = previous_period_start(self.cursor, self.goal_type);
        Some(period)
    }
}

/// Iterates periods backward starting at the period containing `from`.
///
/// The sequence is bounded by [`max_periods`], so consumers can loop over it
/// without their own safety counter.
#[must_use]
pub fn periods_back(goal_type: GoalType, from: NaiveDate) -> PeriodsBack {
    PeriodsBack {
        goal_type,
        cursor: from,
        remaining: max_periods(goal_type),
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    // Day 1 exists in every month, so with_day(1) cannot fail here.
    date.with_day(1).unwrap_or(date)
}
