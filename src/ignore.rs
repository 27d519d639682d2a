//! Files excluded from template, localization and content input.
//! Combines an explicit set of ignored paths, which only grows down the
//! tree, with glob patterns for hidden files and editor backups.

use crate::constants::ARTIFACT_PATTERNS;
use crate::error::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct IgnoreRules {
    files: HashSet<PathBuf>,
    patterns: Arc<GlobSet>,
}

impl IgnoreRules {
    /// Creates rules with the default artifact patterns.
    ///
    /// # Errors
    /// * `Error::ConfigError` if a pattern does not compile
    pub fn new() -> Result<Self> {
        Self::with_patterns(&ARTIFACT_PATTERNS)
    }

    pub fn with_patterns(patterns: &[&str]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(Glob::new(pattern).map_err(|e| Error::config("ignore patterns", e.to_string()))?);
        }
        let patterns =
            builder.build().map_err(|e| Error::config("ignore patterns", e.to_string()))?;
        Ok(Self { files: HashSet::new(), patterns: Arc::new(patterns) })
    }

    /// Marks a file as ignored for this level and everything below it.
    pub fn ignore_file<P: Into<PathBuf>>(&mut self, path: P) {
        self.files.insert(path.into());
    }

    pub fn is_ignored(&self, path: &Path) -> bool {
        self.files.contains(path)
    }

    /// True for files usable as input: not ignored, hidden, or a backup/swap artifact.
    pub fn is_valid_file(&self, path: &Path) -> bool {
        if self.is_ignored(path) {
            return false;
        }
        match path.file_name() {
            Some(name) => !self.patterns.is_match(Path::new(name)),
            None => false,
        }
    }
}
