//! Run statistics aggregated over the whole tree walk.

use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    files: usize,
    languages: BTreeSet<String>,
}

impl RunStats {
    /// Counts one generated file in `language`.
    pub fn record<S: Into<String>>(&mut self, language: S) {
        self.files += 1;
        self.languages.insert(language.into());
    }

    /// Folds the statistics of a sub-tree into this one.
    pub fn merge(&mut self, other: RunStats) {
        self.files += other.files;
        self.languages.extend(other.languages);
    }

    pub fn files(&self) -> usize {
        self.files
    }

    /// Languages actually used, de-duplicated and sorted.
    pub fn languages(&self) -> &BTreeSet<String> {
        &self.languages
    }

    pub fn language_count(&self) -> usize {
        self.languages.len()
    }
}

impl std::fmt::Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let languages: Vec<&str> = self.languages.iter().map(String::as_str).collect();
        write!(f, "{} file(s) in {} language(s): {}", self.files, languages.len(), languages.join(", "))
    }
}
