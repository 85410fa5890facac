//! Completion entity - Records how many times a habit was done on one date.
//!
//! At most one row exists per (habit, date); repeat logging increments the
//! row's count instead of inserting a second row. The unique index enforcing
//! this lives in [`crate::config::database::create_tables`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Completion database model - one row per habit per calendar date
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "completions")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Habit this completion belongs to
    pub habit_id: i64,
    /// Calendar date the completions were performed on
    pub date: Date,
    /// Number of completions recorded for this date (never negative)
    pub count: i32,
    /// When this row was last written (UTC)
    pub completed_at: DateTime,
}

/// Defines relationships between Completion and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each completion row belongs to exactly one habit
    #[sea_orm(
        belongs_to = "super::habit::Entity",
        from = "Column::HabitId",
        to = "super::habit::Column::Id"
    )]
    Habit,
}

impl Related<super::habit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Habit.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
