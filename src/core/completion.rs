//! Completion business logic - logging, undo, aggregation, and progress.
//!
//! Completions are stored one row per (habit, date); logging the same date
//! twice increments the existing row instead of inserting a second one. The
//! progress evaluator composes the period calculator with the aggregation
//! here to produce a point-in-time snapshot of how a habit is doing against
//! its goal.

use chrono::{Local, NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, warn};

use crate::{
    core::heatmap::HeatmapCache,
    core::period::{Period, period_boundaries},
    entities::{Completion, GoalType, completion},
    errors::{Error, Result},
};

/// Today's date in the local timezone. All "not in the future" checks and
/// current-period anchors use this.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Progress toward a habit's goal within one period.
///
/// Ephemeral - recomputed on demand, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct HabitProgress {
    /// Sum of completion counts within the period
    pub current_count: i64,
    /// The habit's target for the period
    pub goal_count: i32,
    /// `current / goal` as a percentage, clamped to 100, one decimal
    pub percentage: f64,
    /// Whether the goal has been met (`current >= goal`)
    pub goal_met: bool,
    /// Completions still needed (0 once met)
    pub remaining: i64,
    /// The date progress was evaluated for
    pub reference_date: NaiveDate,
    /// First day of the evaluated period
    pub period_start: NaiveDate,
    /// Last day of the evaluated period
    pub period_end: NaiveDate,
}

/// Retrieves completion rows for a habit, optionally restricted to an
/// inclusive date range, ordered by date descending.
///
/// Dates with no stored row simply have no entry; aggregation treats them
/// as 0.
pub async fn get_completions_for_habit(
    db: &DatabaseConnection,
    habit_id: i64,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Vec<completion::Model>> {
    let mut query = Completion::find().filter(completion::Column::HabitId.eq(habit_id));
    if let Some(start) = start {
        query = query.filter(completion::Column::Date.gte(start));
    }
    if let Some(end) = end {
        query = query.filter(completion::Column::Date.lte(end));
    }
    query
        .order_by_desc(completion::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds the completion row for a habit on one specific date, if any.
pub async fn get_completion_for_date(
    db: &DatabaseConnection,
    habit_id: i64,
    date: NaiveDate,
) -> Result<Option<completion::Model>> {
    Completion::find()
        .filter(completion::Column::HabitId.eq(habit_id))
        .filter(completion::Column::Date.eq(date))
        .one(db)
        .await
        .map_err(Into::into)
}

/// The completion count for a habit on one date, 0 when nothing was logged.
pub async fn completion_count_for_date(
    db: &DatabaseConnection,
    habit_id: i64,
    date: NaiveDate,
) -> Result<i32> {
    Ok(get_completion_for_date(db, habit_id, date)
        .await?
        .map_or(0, |c| c.count))
}

/// Upserts the completion row for (habit, date): inserts with
/// `count = amount` when absent, otherwise adds `amount` to the existing
/// count. `completed_at` records the time of this write either way.
///
/// This is raw storage-level plumbing; callers that need precondition checks
/// (habit exists, not archived, date not in the future) go through
/// [`log_completion`].
pub async fn increment_completion(
    db: &DatabaseConnection,
    habit_id: i64,
    date: NaiveDate,
    amount: i32,
) -> Result<completion::Model> {
    let now = Utc::now().naive_utc();

    match get_completion_for_date(db, habit_id, date).await? {
        Some(existing) => {
            let new_count = existing.count + amount;
            let mut active: completion::ActiveModel = existing.into();
            active.count = Set(new_count);
            active.completed_at = Set(now);
            active.update(db).await.map_err(Into::into)
        }
        None => {
            let row = completion::ActiveModel {
                habit_id: Set(habit_id),
                date: Set(date),
                count: Set(amount),
                completed_at: Set(now),
                ..Default::default()
            };
            row.insert(db).await.map_err(Into::into)
        }
    }
}

/// Decrements the completion row for (habit, date), flooring the count at 0.
///
/// Fails with [`Error::CompletionNotFound`] when no row exists for that date;
/// rows are never deleted by decrementing, they just sit at 0.
pub async fn decrement_completion(
    db: &DatabaseConnection,
    habit_id: i64,
    date: NaiveDate,
    amount: i32,
) -> Result<completion::Model> {
    let existing = get_completion_for_date(db, habit_id, date)
        .await?
        .ok_or(Error::CompletionNotFound { habit_id, date })?;

    let new_count = (existing.count - amount).max(0);
    let mut active: completion::ActiveModel = existing.into();
    active.count = Set(new_count);
    active.completed_at = Set(Utc::now().naive_utc());
    active.update(db).await.map_err(Into::into)
}

/// Sums the stored completion counts for a habit within an inclusive period.
/// Dates without a row contribute 0.
pub async fn sum_completions_in_period(
    db: &DatabaseConnection,
    habit_id: i64,
    period: Period,
) -> Result<i64> {
    let rows =
        get_completions_for_habit(db, habit_id, Some(period.start), Some(period.end)).await?;
    Ok(rows.iter().map(|c| i64::from(c.count)).sum())
}

/// Retrieves all completion rows in the period containing `reference_date`
/// (today when omitted).
pub async fn get_period_completions(
    db: &DatabaseConnection,
    habit_id: i64,
    goal_type: GoalType,
    reference_date: Option<NaiveDate>,
) -> Result<Vec<completion::Model>> {
    let period = period_boundaries(goal_type, reference_date.unwrap_or_else(today));
    get_completions_for_habit(db, habit_id, Some(period.start), Some(period.end)).await
}

/// Evaluates progress toward a habit goal for the period containing
/// `reference_date` (today when omitted).
///
/// The percentage is clamped at 100 even when over-complete, and a zero
/// `goal_count` yields 0 rather than dividing by zero (defensive only -
/// validated input is always 1-100).
pub async fn get_habit_progress(
    db: &DatabaseConnection,
    habit_id: i64,
    goal_count: i32,
    goal_type: GoalType,
    reference_date: Option<NaiveDate>,
) -> Result<HabitProgress> {
    let reference_date = reference_date.unwrap_or_else(today);
    let period = period_boundaries(goal_type, reference_date);
    let current_count = sum_completions_in_period(db, habit_id, period).await?;

    #[allow(clippy::cast_precision_loss)]
    let percentage = if goal_count > 0 {
        let raw = current_count as f64 / f64::from(goal_count) * 100.0;
        round_one_decimal(raw.min(100.0))
    } else {
        0.0
    };

    Ok(HabitProgress {
        current_count,
        goal_count,
        percentage,
        goal_met: current_count >= i64::from(goal_count),
        remaining: (i64::from(goal_count) - current_count).max(0),
        reference_date,
        period_start: period.start,
        period_end: period.end,
    })
}

/// Logs completions for a habit on a date (today when omitted).
///
/// Preconditions, each returned as a recoverable validation error with no
/// write performed:
/// - the date must not be after today ([`Error::FutureDate`])
/// - `amount` must be positive ([`Error::InvalidAmount`])
/// - the habit must exist ([`Error::HabitNotFound`])
/// - the habit must not be archived ([`Error::HabitArchived`])
///
/// On success the row is upserted and the heatmap cache entries for this
/// habit are invalidated so analytics never serve stale data.
pub async fn log_completion(
    db: &DatabaseConnection,
    cache: &HeatmapCache,
    habit_id: i64,
    completion_date: Option<NaiveDate>,
    amount: i32,
) -> Result<completion::Model> {
    let completion_date = completion_date.unwrap_or_else(today);

    if completion_date > today() {
        warn!("Rejected future-dated completion for habit {habit_id}: {completion_date}");
        return Err(Error::FutureDate {
            date: completion_date,
        });
    }
    if amount <= 0 {
        return Err(Error::InvalidAmount { amount });
    }

    let habit = crate::core::habit::get_habit_by_id(db, habit_id)
        .await?
        .ok_or(Error::HabitNotFound { id: habit_id })?;
    if habit.archived {
        warn!("Rejected completion for archived habit {habit_id}");
        return Err(Error::HabitArchived { id: habit_id });
    }

    let row = increment_completion(db, habit_id, completion_date, amount).await?;
    info!("Logged {amount} completion(s) for habit {habit_id} on {completion_date}");

    cache.invalidate_habit(habit_id).await;
    Ok(row)
}

/// Undoes (decrements) completions for a habit on a date (today when
/// omitted), flooring the count at 0.
///
/// Requires a positive `amount` and an existing habit. The archived check is
/// intentionally absent: undoing a mistaken log on a freshly-archived habit
/// is allowed. Fails with [`Error::CompletionNotFound`] when nothing was
/// logged on that date.
pub async fn undo_completion(
    db: &DatabaseConnection,
    cache: &HeatmapCache,
    habit_id: i64,
    completion_date: Option<NaiveDate>,
    amount: i32,
) -> Result<completion::Model> {
    let completion_date = completion_date.unwrap_or_else(today);

    if amount <= 0 {
        return Err(Error::InvalidAmount { amount });
    }
    crate::core::habit::get_habit_by_id(db, habit_id)
        .await?
        .ok_or(Error::HabitNotFound { id: habit_id })?;

    let row = decrement_completion(db, habit_id, completion_date, amount).await?;
    info!("Decremented {amount} completion(s) for habit {habit_id} on {completion_date}");

    cache.invalidate_habit(habit_id).await;
    Ok(row)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use chrono::Duration;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[tokio::test]
    async fn test_increment_creates_then_accumulates() -> Result<()> {
        let (db, habit) = setup_with_habit().await?;
        let date = d(2024, 12, 10);

        let first = increment_completion(&db, habit.id, date, 1).await?;
        assert_eq!(first.count, 1);

        let second = increment_completion(&db, habit.id, date, 2).await?;
        assert_eq!(second.count, 3);
        assert_eq!(second.id, first.id, "repeat logging must reuse the row");

        let rows = get_completions_for_habit(&db, habit.id, None, None).await?;
        assert_eq!(rows.len(), 1, "one row per (habit, date)");
        Ok(())
    }

    #[tokio::test]
    async fn test_decrement_floors_at_zero() -> Result<()> {
        let (db, habit) = setup_with_habit().await?;
        let date = d(2024, 12, 10);
        increment_completion(&db, habit.id, date, 2).await?;

        let row = decrement_completion(&db, habit.id, date, 5).await?;
        assert_eq!(row.count, 0, "count never goes negative");
        Ok(())
    }

    #[tokio::test]
    async fn test_decrement_without_row_fails() -> Result<()> {
        let (db, habit) = setup_with_habit().await?;
        let result = decrement_completion(&db, habit.id, d(2024, 12, 10), 1).await;
        assert!(matches!(result, Err(Error::CompletionNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_range_query_and_sum() -> Result<()> {
        let (db, habit) = setup_with_habit().await?;
        increment_completion(&db, habit.id, d(2024, 12, 8), 1).await?;
        increment_completion(&db, habit.id, d(2024, 12, 10), 2).await?;
        increment_completion(&db, habit.id, d(2024, 12, 12), 4).await?;

        let rows = get_completions_for_habit(
            &db,
            habit.id,
            Some(d(2024, 12, 9)),
            Some(d(2024, 12, 11)),
        )
        .await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, d(2024, 12, 10));

        let period = Period {
            start: d(2024, 12, 8),
            end: d(2024, 12, 12),
        };
        assert_eq!(sum_completions_in_period(&db, habit.id, period).await?, 7);
        Ok(())
    }

    #[tokio::test]
    async fn test_completions_ordered_newest_first() -> Result<()> {
        let (db, habit) = setup_with_habit().await?;
        increment_completion(&db, habit.id, d(2024, 12, 8), 1).await?;
        increment_completion(&db, habit.id, d(2024, 12, 12), 1).await?;
        increment_completion(&db, habit.id, d(2024, 12, 10), 1).await?;

        let rows = get_completions_for_habit(&db, habit.id, None, None).await?;
        let dates: Vec<NaiveDate> = rows.iter().map(|c| c.date).collect();
        assert_eq!(dates, vec![d(2024, 12, 12), d(2024, 12, 10), d(2024, 12, 8)]);
        Ok(())
    }

    #[tokio::test]
    async fn test_progress_counts_whole_period() -> Result<()> {
        let (db, habit) = setup_with_habit().await?;
        // Wednesday Dec 11 2024; Monday is Dec 9
        let reference = d(2024, 12, 11);
        increment_completion(&db, habit.id, d(2024, 12, 9), 1).await?;
        increment_completion(&db, habit.id, d(2024, 12, 10), 1).await?;
        // Outside the week
        increment_completion(&db, habit.id, d(2024, 12, 8), 5).await?;

        let progress =
            get_habit_progress(&db, habit.id, 3, GoalType::Weekly, Some(reference)).await?;
        assert_eq!(progress.current_count, 2);
        assert_eq!(progress.goal_count, 3);
        assert!(!progress.goal_met);
        assert_eq!(progress.remaining, 1);
        assert_eq!(progress.percentage, 66.7);
        assert_eq!(progress.period_start, d(2024, 12, 9));
        assert_eq!(progress.period_end, d(2024, 12, 15));
        Ok(())
    }

    #[tokio::test]
    async fn test_progress_percentage_clamped_at_100() -> Result<()> {
        let (db, habit) = setup_with_habit().await?;
        let reference = d(2024, 12, 10);
        increment_completion(&db, habit.id, reference, 50).await?;

        let progress =
            get_habit_progress(&db, habit.id, 2, GoalType::Daily, Some(reference)).await?;
        assert_eq!(progress.percentage, 100.0);
        assert!(progress.goal_met);
        assert_eq!(progress.remaining, 0);
        assert_eq!(progress.current_count, 50);
        Ok(())
    }

    #[tokio::test]
    async fn test_progress_zero_goal_count_does_not_divide() -> Result<()> {
        let (db, habit) = setup_with_habit().await?;
        let reference = d(2024, 12, 10);
        increment_completion(&db, habit.id, reference, 3).await?;

        let progress =
            get_habit_progress(&db, habit.id, 0, GoalType::Daily, Some(reference)).await?;
        assert_eq!(progress.percentage, 0.0);
        assert!(progress.goal_met, "0 >= 0 counts as met");
        assert_eq!(progress.remaining, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_progress_empty_period() -> Result<()> {
        let (db, habit) = setup_with_habit().await?;
        let progress =
            get_habit_progress(&db, habit.id, 3, GoalType::Daily, Some(d(2024, 12, 10))).await?;
        assert_eq!(progress.current_count, 0);
        assert_eq!(progress.percentage, 0.0);
        assert!(!progress.goal_met);
        assert_eq!(progress.remaining, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_log_completion_rejects_future_date() -> Result<()> {
        let (db, habit) = setup_with_habit().await?;
        let cache = HeatmapCache::new();
        let tomorrow = today() + Duration::days(1);

        let result = log_completion(&db, &cache, habit.id, Some(tomorrow), 1).await;
        assert!(matches!(result, Err(Error::FutureDate { .. })));

        // No partial write
        let rows = get_completions_for_habit(&db, habit.id, None, None).await?;
        assert!(rows.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_log_completion_rejects_non_positive_amount() -> Result<()> {
        let (db, habit) = setup_with_habit().await?;
        let cache = HeatmapCache::new();

        for amount in [0, -1] {
            let result = log_completion(&db, &cache, habit.id, None, amount).await;
            assert!(matches!(result, Err(Error::InvalidAmount { .. })));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_log_completion_rejects_missing_and_archived_habits() -> Result<()> {
        let (db, habit) = setup_with_habit().await?;
        let cache = HeatmapCache::new();

        let result = log_completion(&db, &cache, 999, None, 1).await;
        assert!(matches!(result, Err(Error::HabitNotFound { id: 999 })));

        crate::core::habit::archive_habit(&db, habit.id).await?;
        let result = log_completion(&db, &cache, habit.id, None, 1).await;
        assert!(matches!(result, Err(Error::HabitArchived { .. })));

        let rows = get_completions_for_habit(&db, habit.id, None, None).await?;
        assert!(rows.is_empty(), "rejected logs must not write");
        Ok(())
    }

    #[tokio::test]
    async fn test_log_completion_past_dates_allowed() -> Result<()> {
        let (db, habit) = setup_with_habit().await?;
        let cache = HeatmapCache::new();

        // No lower bound on history other than "not future"
        let long_ago = today() - Duration::days(3000);
        let row = log_completion(&db, &cache, habit.id, Some(long_ago), 1).await?;
        assert_eq!(row.date, long_ago);
        Ok(())
    }

    #[tokio::test]
    async fn test_undo_completion_flow() -> Result<()> {
        let (db, habit) = setup_with_habit().await?;
        let cache = HeatmapCache::new();
        let date = today() - Duration::days(1);

        log_completion(&db, &cache, habit.id, Some(date), 3).await?;
        let row = undo_completion(&db, &cache, habit.id, Some(date), 1).await?;
        assert_eq!(row.count, 2);

        // Undo on a date with nothing logged
        let result =
            undo_completion(&db, &cache, habit.id, Some(date - Duration::days(1)), 1).await;
        assert!(matches!(result, Err(Error::CompletionNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_undo_completion_allowed_for_archived_habit() -> Result<()> {
        let (db, habit) = setup_with_habit().await?;
        let cache = HeatmapCache::new();
        let date = today();

        log_completion(&db, &cache, habit.id, Some(date), 2).await?;
        crate::core::habit::archive_habit(&db, habit.id).await?;

        let row = undo_completion(&db, &cache, habit.id, Some(date), 1).await?;
        assert_eq!(row.count, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_completion_count_for_date() -> Result<()> {
        let (db, habit) = setup_with_habit().await?;
        let date = d(2024, 12, 10);
        assert_eq!(completion_count_for_date(&db, habit.id, date).await?, 0);

        increment_completion(&db, habit.id, date, 4).await?;
        assert_eq!(completion_count_for_date(&db, habit.id, date).await?, 4);
        Ok(())
    }

    #[test]
    fn test_round_one_decimal() {
        assert_eq!(round_one_decimal(66.666_666), 66.7);
        assert_eq!(round_one_decimal(33.333_333), 33.3);
        assert_eq!(round_one_decimal(100.0), 100.0);
    }
}
