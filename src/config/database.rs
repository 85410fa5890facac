//! Database configuration module for `HabitForge`.
//!
//! This module handles `SQLite` database connection and table creation using
//! `SeaORM`. Tables are generated from the entity definitions via
//! `Schema::create_table_from_entity`, so the database schema always matches
//! the Rust struct definitions without manual SQL. On top of the generated
//! tables, a unique index on (`habit_id`, `date`) enforces the one-row-per-day
//! invariant that the completion upsert logic relies on.

use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

use crate::entities::{Completion, Habit, Setting, completion};
use crate::errors::Result;

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a default local `SQLite` file if not found.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/habitforge.sqlite?mode=rwc".to_string())
}

/// Establishes a connection to the `SQLite` database using the `DATABASE_URL`
/// environment variable, falling back to a default local file.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all necessary database tables from the entity definitions.
///
/// Safe to call on every startup: table and index creation both use
/// IF NOT EXISTS semantics.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let habit_table = schema
        .create_table_from_entity(Habit)
        .if_not_exists()
        .to_owned();
    let completion_table = schema
        .create_table_from_entity(Completion)
        .if_not_exists()
        .to_owned();
    let setting_table = schema
        .create_table_from_entity(Setting)
        .if_not_exists()
        .to_owned();

    db.execute(builder.build(&habit_table)).await?;
    db.execute(builder.build(&completion_table)).await?;
    db.execute(builder.build(&setting_table)).await?;

    // One completion row per habit per date; the upsert path depends on it.
    let habit_date_index = Index::create()
        .name("idx_completions_habit_date")
        .table(Completion)
        .col(completion::Column::HabitId)
        .col(completion::Column::Date)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&habit_date_index)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        completion::Model as CompletionModel, habit::Model as HabitModel,
        setting::Model as SettingModel,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<HabitModel> = Habit::find().limit(1).all(&db).await?;
        let _: Vec<CompletionModel> = Completion::find().limit(1).all(&db).await?;
        let _: Vec<SettingModel> = Setting::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;

        let _: Vec<HabitModel> = Habit::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[test]
    fn test_default_database_url() {
        // Only assert the fallback shape; DATABASE_URL may be set in the
        // environment of whoever runs the suite.
        if std::env::var("DATABASE_URL").is_err() {
            assert!(get_database_url().starts_with("sqlite://"));
        }
    }
}
