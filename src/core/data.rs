//! Bulk data management - backup export/import and full wipe.
//!
//! A backup is a single JSON file holding all three tables. Import validates
//! the file completely before touching the database, then replaces everything
//! inside one transaction; the heatmap cache is cleared after any bulk write
//! so no pre-import analytics survive.

use std::path::{Path, PathBuf};

use chrono::Utc;
use sea_orm::{PaginatorTrait, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    core::heatmap::HeatmapCache,
    core::setting::{DEFAULT_LANGUAGE, LANGUAGE_KEY},
    entities::{Completion, Habit, Setting, completion, habit, setting},
    errors::{Error, Result},
};

/// Full dump of the database, as written to a backup file.
#[derive(Debug, Serialize, Deserialize)]
pub struct Backup {
    /// All habit rows, archived included
    pub habits: Vec<habit::Model>,
    /// All completion rows
    pub completions: Vec<completion::Model>,
    /// All setting rows
    pub settings: Vec<setting::Model>,
}

/// Row counts shown in confirmation dialogs before destructive operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataCounts {
    /// Active (non-archived) habits
    pub habit_count: u64,
    /// All completion rows
    pub completion_count: u64,
}

/// Counts active habits and completions for confirmation dialogs.
pub async fn get_data_counts(db: &DatabaseConnection) -> Result<DataCounts> {
    let habit_count = Habit::find()
        .filter(habit::Column::Archived.eq(false))
        .count(db)
        .await?;
    let completion_count = Completion::find().count(db).await?;
    Ok(DataCounts {
        habit_count,
        completion_count,
    })
}

/// Exports all data to a timestamped JSON file inside `dir`.
///
/// Filename format: `habitforge_backup_YYYYMMDD_HHMMSS.json`. Returns the
/// path of the written file.
pub async fn export_backup(db: &DatabaseConnection, dir: &Path) -> Result<PathBuf> {
    let backup = Backup {
        habits: Habit::find().all(db).await?,
        completions: Completion::find().all(db).await?,
        settings: Setting::find().all(db).await?,
    };

    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("habitforge_backup_{timestamp}.json"));
    std::fs::write(&path, serde_json::to_string_pretty(&backup)?)?;

    info!(
        "Exported {} habit(s), {} completion(s), {} setting(s) to {}",
        backup.habits.len(),
        backup.completions.len(),
        backup.settings.len(),
        path.display()
    );
    Ok(path)
}

/// Reads and validates a backup file without touching the database.
///
/// Fails with [`Error::InvalidBackup`] when the file is missing, not JSON, or
/// lacks any of the required sections.
pub fn validate_backup_file(path: &Path) -> Result<Backup> {
    let contents = std::fs::read_to_string(path).map_err(|e| Error::InvalidBackup {
        message: format!("cannot read {}: {e}", path.display()),
    })?;
    serde_json::from_str(&contents).map_err(|e| Error::InvalidBackup {
        message: e.to_string(),
    })
}

/// Replaces all data with the contents of a backup file.
///
/// The file is validated before anything is wiped, so a corrupt backup can
/// never destroy existing data. Rows are restored with their original IDs.
/// The language is reset to English and the heatmap cache cleared.
pub async fn import_backup(
    db: &DatabaseConnection,
    cache: &HeatmapCache,
    path: &Path,
) -> Result<DataCounts> {
    let backup = validate_backup_file(path)?;

    let txn = db.begin().await?;

    Completion::delete_many().exec(&txn).await?;
    Habit::delete_many().exec(&txn).await?;
    Setting::delete_many().exec(&txn).await?;

    for h in &backup.habits {
        habit::ActiveModel {
            id: Set(h.id),
            name: Set(h.name.clone()),
            color: Set(h.color.clone()),
            goal_type: Set(h.goal_type),
            goal_count: Set(h.goal_count),
            created_at: Set(h.created_at),
            archived: Set(h.archived),
        }
        .insert(&txn)
        .await?;
    }
    for c in &backup.completions {
        completion::ActiveModel {
            id: Set(c.id),
            habit_id: Set(c.habit_id),
            date: Set(c.date),
            count: Set(c.count),
            completed_at: Set(c.completed_at),
        }
        .insert(&txn)
        .await?;
    }
    for s in &backup.settings {
        if s.key == LANGUAGE_KEY {
            continue;
        }
        setting::ActiveModel {
            key: Set(s.key.clone()),
            value: Set(s.value.clone()),
            updated_at: Set(s.updated_at),
        }
        .insert(&txn)
        .await?;
    }

    // Imported backups may come from another install; start from the
    // default language rather than trusting theirs.
    setting::ActiveModel {
        key: Set(LANGUAGE_KEY.to_string()),
        value: Set(DEFAULT_LANGUAGE.to_string()),
        updated_at: Set(Utc::now().naive_utc()),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    cache.clear().await;

    info!(
        "Imported {} habit(s) and {} completion(s) from {}",
        backup.habits.len(),
        backup.completions.len(),
        path.display()
    );
    Ok(DataCounts {
        habit_count: backup.habits.len() as u64,
        completion_count: backup.completions.len() as u64,
    })
}

/// Deletes all habits, completions and settings, resets the language to
/// English, and clears the heatmap cache.
pub async fn delete_all_data(db: &DatabaseConnection, cache: &HeatmapCache) -> Result<()> {
    let txn = db.begin().await?;

    Completion::delete_many().exec(&txn).await?;
    Habit::delete_many().exec(&txn).await?;
    Setting::delete_many().exec(&txn).await?;

    setting::ActiveModel {
        key: Set(LANGUAGE_KEY.to_string()),
        value: Set(DEFAULT_LANGUAGE.to_string()),
        updated_at: Set(Utc::now().naive_utc()),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    cache.clear().await;

    info!("All data deleted");
    Ok(())
}
