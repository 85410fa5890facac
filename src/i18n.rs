//! Translation string tables loaded from JSON files.
//!
//! Each language is one JSON file of (possibly nested) strings. A
//! [`StringTable`] is constructed explicitly at startup for the configured
//! language and passed by reference to whatever needs it - there is no
//! lazily-initialized global. Lookups use dot paths into the nested
//! structure and support `{name}` placeholder substitution; a missing key
//! falls back to the key itself so the UI never renders an empty string.

use std::path::Path;

use serde_json::Value;
use tracing::warn;

use crate::errors::{Error, Result};

/// A loaded translation table for one language.
#[derive(Debug, Clone)]
pub struct StringTable {
    language: String,
    strings: Value,
}

impl StringTable {
    /// Loads `<dir>/<language>.json`.
    pub fn load(dir: &Path, language: &str) -> Result<Self> {
        let path = dir.join(format!("{language}.json"));
        let contents = std::fs::read_to_string(&path).map_err(|e| Error::Config {
            message: format!("Translation file not found: {}: {e}", path.display()),
        })?;
        let strings: Value = serde_json::from_str(&contents).map_err(|e| Error::Config {
            message: format!("Invalid JSON in {language}.json: {e}"),
        })?;
        Ok(Self {
            language: language.to_string(),
            strings,
        })
    }

    /// Builds a table from an already-parsed JSON value. Used by tests and
    /// by embedders that bundle translations.
    #[must_use]
    pub fn from_value(language: &str, strings: Value) -> Self {
        Self {
            language: language.to_string(),
            strings,
        }
    }

    /// The language code this table was loaded for.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Looks up a translated string by dot path, e.g. `"tabs.habits"` or
    /// `"dialogs.import_warning"`. Returns the key itself when the path does
    /// not resolve to a string.
    #[must_use]
    pub fn get(&self, key_path: &str) -> String {
        let mut value = &self.strings;
        for key in key_path.split('.') {
            match value.get(key) {
                Some(next) => value = next,
                None => {
                    warn!("Translation key '{key_path}' not found in '{}'", self.language);
                    return key_path.to_string();
                }
            }
        }

        value.as_str().map_or_else(
            || {
                warn!("Translation key '{key_path}' is not a string in '{}'", self.language);
                key_path.to_string()
            },
            ToString::to_string,
        )
    }

    /// Like [`get`](Self::get), substituting `{name}` placeholders with the
    /// provided values.
    #[must_use]
    pub fn get_with(&self, key_path: &str, args: &[(&str, &str)]) -> String {
        let mut result = self.get(key_path);
        for (name, value) in args {
            result = result.replace(&format!("{{{name}}}"), value);
        }
        result
    }
}
