//! Habit business logic - Handles all habit-related operations.
//!
//! Provides functions for creating, retrieving, updating, archiving and
//! deleting habits, including field validation and the case-insensitive
//! unique-name rule. All functions are async and return Result types for
//! error handling.

use chrono::Utc;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};

use crate::{
    entities::{Completion, GoalType, Habit, completion, habit},
    errors::{Error, Result},
};

/// Maximum length of a habit name after trimming.
const MAX_NAME_LEN: usize = 50;

/// Optional fields for a partial habit update. Only the fields that are
/// `Some` are validated and written.
#[derive(Debug, Clone, Default)]
pub struct HabitUpdate {
    /// New name, if changing
    pub name: Option<String>,
    /// New display color, if changing
    pub color: Option<String>,
    /// New goal recurrence, if changing
    pub goal_type: Option<GoalType>,
    /// New per-period goal count, if changing
    pub goal_count: Option<i32>,
    /// New archived flag, if changing
    pub archived: Option<bool>,
}

/// Validates and trims a habit name: non-empty and at most 50 characters.
pub fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidName {
            message: "Habit name cannot be empty or whitespace only".to_string(),
        });
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(Error::InvalidName {
            message: "Habit name must be 50 characters or less".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// Validates a display color: `#` followed by exactly six hex digits.
pub fn validate_color(color: &str) -> Result<()> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidColor {
            value: color.to_string(),
        })
    }
}

/// Validates a per-period goal count: 1 through 100 inclusive.
pub fn validate_goal_count(goal_count: i32) -> Result<()> {
    if (1..=100).contains(&goal_count) {
        Ok(())
    } else {
        Err(Error::InvalidGoalCount { count: goal_count })
    }
}

/// Checks whether a habit name is unique, case-insensitively, against all
/// habits including archived ones.
///
/// # Arguments
/// * `exclude_id` - Habit ID to skip, so edits don't collide with themselves
///
/// # Returns
/// `true` if no other habit uses the name.
pub async fn check_unique_name(
    db: &DatabaseConnection,
    name: &str,
    exclude_id: Option<i64>,
) -> Result<bool> {
    let normalized = name.trim().to_lowercase();

    // Archived habits keep their names reserved, so scan everything.
    let habits = Habit::find().all(db).await?;
    let duplicate = habits.iter().any(|h| {
        exclude_id != Some(h.id) && h.name.trim().to_lowercase() == normalized
    });
    Ok(!duplicate)
}

/// Creates a new habit with the specified parameters, performing input
/// validation and the unique-name check.
///
/// The habit starts unarchived with `created_at` set to now.
pub async fn create_habit(
    db: &DatabaseConnection,
    name: String,
    color: String,
    goal_type: GoalType,
    goal_count: i32,
) -> Result<habit::Model> {
    let name = validate_name(&name)?;
    validate_color(&color)?;
    validate_goal_count(goal_count)?;

    if !check_unique_name(db, &name, None).await? {
        return Err(Error::DuplicateName { name });
    }

    let habit = habit::ActiveModel {
        name: Set(name),
        color: Set(color),
        goal_type: Set(goal_type),
        goal_count: Set(goal_count),
        created_at: Set(Utc::now().naive_utc()),
        archived: Set(false),
        ..Default::default()
    };

    let result = habit.insert(db).await?;
    Ok(result)
}

/// Finds a habit by its unique ID, returning None when no row exists.
pub async fn get_habit_by_id(
    db: &DatabaseConnection,
    habit_id: i64,
) -> Result<Option<habit::Model>> {
    Habit::find_by_id(habit_id).one(db).await.map_err(Into::into)
}

/// Retrieves habits ordered newest-created first.
///
/// Active views pass `include_archived = false`; management and name
/// uniqueness flows pass `true`.
pub async fn get_all_habits(
    db: &DatabaseConnection,
    include_archived: bool,
) -> Result<Vec<habit::Model>> {
    let mut query = Habit::find().order_by_desc(habit::Column::CreatedAt);
    if !include_archived {
        query = query.filter(habit::Column::Archived.eq(false));
    }
    query.all(db).await.map_err(Into::into)
}

/// Applies a partial update to a habit, re-validating every provided field
/// and re-checking name uniqueness when the name changes.
pub async fn update_habit(
    db: &DatabaseConnection,
    habit_id: i64,
    update: HabitUpdate,
) -> Result<habit::Model> {
    let habit = get_habit_by_id(db, habit_id)
        .await?
        .ok_or(Error::HabitNotFound { id: habit_id })?;

    let mut active: habit::ActiveModel = habit.into();

    if let Some(name) = update.name {
        let name = validate_name(&name)?;
        if !check_unique_name(db, &name, Some(habit_id)).await? {
            return Err(Error::DuplicateName { name });
        }
        active.name = Set(name);
    }
    if let Some(color) = update.color {
        validate_color(&color)?;
        active.color = Set(color);
    }
    if let Some(goal_type) = update.goal_type {
        active.goal_type = Set(goal_type);
    }
    if let Some(goal_count) = update.goal_count {
        validate_goal_count(goal_count)?;
        active.goal_count = Set(goal_count);
    }
    if let Some(archived) = update.archived {
        active.archived = Set(archived);
    }

    active.update(db).await.map_err(Into::into)
}

/// Archives a habit (soft delete): hidden from active views, rejects new
/// completions, keeps history.
pub async fn archive_habit(db: &DatabaseConnection, habit_id: i64) -> Result<habit::Model> {
    update_habit(
        db,
        habit_id,
        HabitUpdate {
            archived: Some(true),
            ..Default::default()
        },
    )
    .await
}

/// Restores an archived habit.
pub async fn unarchive_habit(db: &DatabaseConnection, habit_id: i64) -> Result<habit::Model> {
    update_habit(
        db,
        habit_id,
        HabitUpdate {
            archived: Some(false),
            ..Default::default()
        },
    )
    .await
}

/// Permanently deletes a habit and all of its completions.
///
/// Runs inside a database transaction so a half-deleted habit can never be
/// observed. For a soft delete, use [`archive_habit`] instead.
pub async fn delete_habit(db: &DatabaseConnection, habit_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let habit = Habit::find_by_id(habit_id)
        .one(&txn)
        .await?
        .ok_or(Error::HabitNotFound { id: habit_id })?;

    Completion::delete_many()
        .filter(completion::Column::HabitId.eq(habit_id))
        .exec(&txn)
        .await?;

    habit.delete(&txn).await?;
    txn.commit().await?;
    Ok(())
}
