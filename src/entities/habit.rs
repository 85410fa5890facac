//! Habit entity - Represents a tracked habit and its recurrence goal.
//!
//! Each habit has a name, display color, goal type (daily/weekly/monthly) and
//! a per-period goal count. Habits can be archived (soft-hidden) while keeping
//! their completion history.

use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Recurrence granularity for a habit's goal.
///
/// Persisted as TEXT (`"daily"` / `"weekly"` / `"monthly"`). Parsing an
/// unknown string fails with [`Error::InvalidGoalType`] rather than silently
/// defaulting; past the parse boundary an invalid goal type is
/// unrepresentable.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    /// One period per calendar day
    #[sea_orm(string_value = "daily")]
    Daily,
    /// One period per Monday-Sunday calendar week
    #[sea_orm(string_value = "weekly")]
    Weekly,
    /// One period per calendar month
    #[sea_orm(string_value = "monthly")]
    Monthly,
}

impl GoalType {
    /// The canonical lowercase string form, as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(Error::InvalidGoalType {
                value: other.to_string(),
            }),
        }
    }
}

/// Habit database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "habits")]
pub struct Model {
    /// Unique identifier for the habit
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable name (1-50 chars, unique case-insensitively)
    pub name: String,
    /// Display color as a `#RRGGBB` hex code
    pub color: String,
    /// Recurrence granularity of the goal
    pub goal_type: GoalType,
    /// Target completion count per period (1-100)
    pub goal_count: i32,
    /// When the habit was created (UTC)
    pub created_at: DateTime,
    /// Archived habits are hidden from active views and reject new
    /// completions, but keep their history
    pub archived: bool,
}

/// Defines relationships between Habit and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One habit has many per-day completion rows
    #[sea_orm(has_many = "super::completion::Entity")]
    Completions,
}

impl Related<super::completion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Completions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
