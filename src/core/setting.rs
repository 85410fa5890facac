//! Key-value settings stored in the database.
//!
//! Small per-install settings such as the UI language live in the `settings`
//! table as string pairs. Writes are upserts keyed by the setting name.

use chrono::Utc;
use sea_orm::{Set, prelude::*};

use crate::{
    entities::{Setting, setting},
    errors::Result,
};

/// Setting key holding the UI language code.
pub const LANGUAGE_KEY: &str = "language";

/// Language used when no setting row exists.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Reads a setting value, `None` when the key has never been written.
pub async fn get_setting(db: &DatabaseConnection, key: &str) -> Result<Option<String>> {
    let row = Setting::find()
        .filter(setting::Column::Key.eq(key))
        .one(db)
        .await?;
    Ok(row.map(|s| s.value))
}

/// Writes a setting value, inserting or updating as needed.
pub async fn set_setting(db: &DatabaseConnection, key: &str, value: &str) -> Result<()> {
    let now = Utc::now().naive_utc();

    let existing = Setting::find()
        .filter(setting::Column::Key.eq(key))
        .one(db)
        .await?;

    if let Some(row) = existing {
        let mut active: setting::ActiveModel = row.into();
        active.value = Set(value.to_string());
        active.updated_at = Set(now);
        active.update(db).await?;
    } else {
        let row = setting::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            updated_at: Set(now),
        };
        row.insert(db).await?;
    }

    Ok(())
}

/// The configured UI language, defaulting to English.
pub async fn get_language(db: &DatabaseConnection) -> Result<String> {
    Ok(get_setting(db, LANGUAGE_KEY)
        .await?
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()))
}

/// Stores the UI language.
pub async fn set_language(db: &DatabaseConnection, language: &str) -> Result<()> {
    set_setting(db, LANGUAGE_KEY, language).await
}
