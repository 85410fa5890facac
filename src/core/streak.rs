//! Consecutive goal-met streak calculation.
//!
//! A streak is the number of consecutive periods, ending at the most recent
//! complete period, whose aggregated completion count met the habit's goal.
//! The walk starts at the period containing today: that period is counted
//! when its goal is already met, and skipped (without breaking the streak)
//! while it is still in progress. The first unmet period before it ends the
//! walk.

use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use tracing::{debug, error};

use crate::{
    core::completion::{sum_completions_in_period, today},
    core::period::periods_back,
    entities::GoalType,
    errors::{Error, Result},
};

/// Calculates the current streak for a habit, always relative to today.
///
/// Never fails: any internal error (unexpected storage fault, out-of-range
/// goal count) is logged and converted to 0 so a UI can always render a
/// number. The backward walk is bounded by
/// [`crate::core::period::max_periods`], roughly ten years per goal type.
pub async fn calculate_streak(
    db: &DatabaseConnection,
    habit_id: i64,
    goal_type: GoalType,
    goal_count: i32,
) -> u32 {
    match streak_as_of(db, habit_id, goal_type, goal_count, today()).await {
        Ok(streak) => {
            debug!("Habit {habit_id} has streak of {streak} {goal_type} period(s)");
            streak
        }
        Err(e) => {
            error!("Error calculating streak for habit {habit_id}: {e}");
            0
        }
    }
}

/// The fallible walk behind [`calculate_streak`], anchored to an explicit
/// date so the arithmetic is testable without clock control.
async fn streak_as_of(
    db: &DatabaseConnection,
    habit_id: i64,
    goal_type: GoalType,
    goal_count: i32,
    today: NaiveDate,
) -> Result<u32> {
    // Validated input is 1-100; a zero or negative goal would make every
    // period trivially met and the walk meaningless, so refuse instead of
    // guessing. The public wrapper turns this into a logged 0.
    if goal_count <= 0 {
        return Err(Error::InvalidGoalCount { count: goal_count });
    }

    let mut streak = 0;
    for (index, period) in periods_back(goal_type, today).enumerate() {
        let total = sum_completions_in_period(db, habit_id, period).await?;

        if total >= i64::from(goal_count) {
            streak += 1;
        } else if index == 0 {
            // The current period is still in progress; an unmet goal here is
            // pending, not a break.
        } else {
            break;
        }
    }
    Ok(streak)
}
