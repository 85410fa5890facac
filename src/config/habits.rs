//! Seed habit loading from config.toml
//!
//! This module provides functionality to load initial habit definitions from a
//! TOML configuration file. The habits defined in config.toml are used to seed
//! the database on first run or when a named habit is missing.

use std::path::Path;

use sea_orm::DatabaseConnection;
use serde::Deserialize;
use tracing::info;

use crate::entities::GoalType;
use crate::errors::{Error, Result};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// List of habit definitions to seed
    #[serde(default)]
    pub habits: Vec<HabitConfig>,
}

/// Configuration for a single seed habit
#[derive(Debug, Deserialize, Clone)]
pub struct HabitConfig {
    /// Name of the habit
    pub name: String,
    /// Display color as `#RRGGBB`
    pub color: String,
    /// Goal recurrence ("daily", "weekly", "monthly")
    pub goal_type: GoalType,
    /// Target count per period
    pub goal_count: i32,
}

/// Loads habit configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads habit configuration from the default location (./config.toml)
pub fn load_default_config() -> Result<Config> {
    load_config("config.toml")
}

/// Inserts any configured habits that do not exist yet (matched by name,
/// case-insensitively). Existing habits are left untouched, so user edits to
/// color or goal survive restarts.
pub async fn seed_initial_habits(db: &DatabaseConnection, config: &Config) -> Result<usize> {
    let mut created = 0;

    for seed in &config.habits {
        if crate::core::habit::check_unique_name(db, &seed.name, None).await? {
            crate::core::habit::create_habit(
                db,
                seed.name.clone(),
                seed.color.clone(),
                seed.goal_type,
                seed.goal_count,
            )
            .await?;
            created += 1;
        }
    }

    if created > 0 {
        info!("Seeded {created} habit(s) from configuration");
    }
    Ok(created)
}
