//! Shared test utilities for `HabitForge`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use sea_orm::DatabaseConnection;

use crate::{
    core::habit,
    entities::{self, GoalType},
    errors::Result,
};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test habit with sensible defaults.
///
/// # Defaults
/// * `color`: `"#E57373"`
/// * `goal_type`: daily
/// * `goal_count`: 1
pub async fn create_test_habit(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::habit::Model> {
    habit::create_habit(
        db,
        name.to_string(),
        "#E57373".to_string(),
        GoalType::Daily,
        1,
    )
    .await
}

/// Creates a test habit with custom parameters.
/// Use this when you need to test specific goal configurations.
pub async fn create_custom_habit(
    db: &DatabaseConnection,
    name: &str,
    color: &str,
    goal_type: GoalType,
    goal_count: i32,
) -> Result<entities::habit::Model> {
    habit::create_habit(
        db,
        name.to_string(),
        color.to_string(),
        goal_type,
        goal_count,
    )
    .await
}

/// Sets up a complete test environment with a daily habit.
/// Returns (db, habit) for common test scenarios.
pub async fn setup_with_habit() -> Result<(DatabaseConnection, entities::habit::Model)> {
    let db = setup_test_db().await?;
    let habit = create_test_habit(&db, "Test Habit").await?;
    Ok((db, habit))
}
