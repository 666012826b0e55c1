//! Letter text loaded from a data file.
//!
//! A string table is a flat map from text key to template, for example in
//! TOML:
//!
//! ```toml
//! "shortcircuit.letter_label" = "Kurzschluss"
//! "shortcircuit.full_surge" = "Ein Kurzschluss in {0} hat {1} Wd freigesetzt."
//! ```
//!
//! Keys the table lacks fall back to a second translator when one is given
//! with [`StringTable::with_fallback`].

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use gridsurge_core::report::Translator;

use crate::loader::{DataLoadError, deserialize_file};

/// Key to template map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StringTable {
    entries: BTreeMap<String, String>,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.entries.insert(key.into(), template.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Layer this table over `fallback`.
    pub fn with_fallback<F: Translator>(self, fallback: F) -> Layered<F> {
        Layered {
            table: self,
            fallback,
        }
    }
}

impl Translator for StringTable {
    fn template(&self, key: &str) -> Option<&str> {
        self.get(key)
    }
}

/// A [`StringTable`] that defers to another translator for missing keys.
#[derive(Debug, Clone)]
pub struct Layered<F> {
    table: StringTable,
    fallback: F,
}

impl<F: Translator> Translator for Layered<F> {
    fn template(&self, key: &str) -> Option<&str> {
        self.table.get(key).or_else(|| self.fallback.template(key))
    }
}

/// Load a string table from a `.ron`, `.toml` or `.json` file.
pub fn load_string_table(path: &Path) -> Result<StringTable, DataLoadError> {
    let table: StringTable = deserialize_file(path)?;
    tracing::debug!(
        target: "gridsurge::data",
        file = %path.display(),
        entries = table.len(),
        "loaded string table"
    );
    Ok(table)
}
