//! Per-language substitution tables.

use crate::constants::{run_keys, DEFAULT_LANGUAGE, RUN_DATE_FORMAT, RUN_TIME_FORMAT};
use chrono::NaiveDateTime;
use indexmap::IndexMap;

/// Flat key → text mapping for one language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizationTable {
    values: IndexMap<String, String>,
}

impl LocalizationTable {
    pub fn new(values: IndexMap<String, String>) -> Self {
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.values.insert(key.into(), value.into());
    }

    /// Overlays `other` on this table; `other` wins on conflicting keys.
    pub fn merge(&mut self, other: &LocalizationTable) {
        self.values.extend(other.values.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The table as a template data context.
    pub fn to_json(&self) -> serde_json::Map<String, serde_json::Value> {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect()
    }
}

impl From<IndexMap<String, String>> for LocalizationTable {
    fn from(values: IndexMap<String, String>) -> Self {
        Self::new(values)
    }
}

/// Returns `de` for a country-specific key like `de-de`.
pub fn base_language(key: &str) -> Option<&str> {
    let bytes = key.as_bytes();
    (bytes.len() == 5 && bytes[2] == b'-').then(|| &key[..2])
}

/// One directory's tables, keyed by language.
#[derive(Debug, Clone, Default)]
pub struct Localizations {
    tables: IndexMap<String, LocalizationTable>,
}

impl Localizations {
    pub fn insert<K: Into<String>>(&mut self, language: K, table: LocalizationTable) {
        self.tables.insert(language.into(), table);
    }

    /// Looks up a table, falling back from `xx-yy` to `xx`.
    pub fn get(&self, language: &str) -> Option<&LocalizationTable> {
        self.tables
            .get(language)
            .or_else(|| base_language(language).and_then(|base| self.tables.get(base)))
    }

    pub fn contains(&self, language: &str) -> bool {
        self.tables.contains_key(language)
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Builds the complete table for `language`: default values, overlaid by
    /// the language's own values, plus the run-derived keys.
    pub fn merged(&self, language: &str, generation_time: NaiveDateTime) -> LocalizationTable {
        let mut merged = LocalizationTable::default();
        if let Some(defaults) = self.tables.get(DEFAULT_LANGUAGE) {
            merged.merge(defaults);
        }
        if let Some(values) = self.get(language) {
            merged.merge(values);
        }
        merged.insert(run_keys::LANGUAGE_KEY, language);
        merged.insert(run_keys::RUN_DATE, generation_time.format(RUN_DATE_FORMAT).to_string());
        merged.insert(run_keys::RUN_TIME, generation_time.format(RUN_TIME_FORMAT).to_string());
        merged
    }
}
