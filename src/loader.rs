//! Template lookup for the rendering engine.
//! Resolves a template name against the registry shadow chain first and
//! then against a literal file in the directory being generated.

use crate::encoding::TextEncoding;
use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Template overrides of one directory, shadowing its parent's.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    local: IndexMap<String, String>,
    parent: Option<Arc<TemplateRegistry>>,
}

impl TemplateRegistry {
    pub fn new(local: IndexMap<String, String>, parent: Option<Arc<TemplateRegistry>>) -> Self {
        Self { local, parent }
    }

    /// Returns the deepest definition of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        match self.local.get(name) {
            Some(body) => Some(body.as_str()),
            None => self.parent.as_deref().and_then(|parent| parent.get(name)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Names defined at this level only.
    pub fn local_names(&self) -> impl Iterator<Item = &str> {
        self.local.keys().map(String::as_str)
    }
}

/// Represents where a template body comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Named override from a templates folder
    Registry(String),
    /// A file read directly from the directory being generated
    FileSystem(PathBuf),
}

impl std::fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateSource::Registry(name) => write!(f, "registered template: '{name}'"),
            TemplateSource::FileSystem(path) => write!(f, "local path: '{}'", path.display()),
        }
    }
}

/// Trait the rendering engine uses to obtain template sources.
pub trait TemplateLoader: Send + Sync {
    /// Resolves a template name, or `None` when it is unknown.
    fn find_source(&self, name: &str) -> Option<TemplateSource>;

    /// Reads the text of a resolved source.
    fn read(&self, source: &TemplateSource) -> Result<String>;

    /// Modification stamp reported for every source.
    fn last_modified(&self) -> NaiveDateTime;

    /// Resolves and reads `name` in one step.
    fn load(&self, name: &str) -> Result<Option<String>> {
        match self.find_source(name) {
            Some(source) => self.read(&source).map(Some),
            None => Ok(None),
        }
    }
}

/// Loader bound to one directory context.
#[derive(Debug, Clone)]
pub struct ContextLoader {
    registry: Arc<TemplateRegistry>,
    dir: PathBuf,
    encoding: TextEncoding,
    generation_time: NaiveDateTime,
}

impl ContextLoader {
    pub fn new<P: Into<PathBuf>>(
        registry: Arc<TemplateRegistry>,
        dir: P,
        encoding: TextEncoding,
        generation_time: NaiveDateTime,
    ) -> Self {
        Self { registry, dir: dir.into(), encoding, generation_time }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl TemplateLoader for ContextLoader {
    fn find_source(&self, name: &str) -> Option<TemplateSource> {
        if self.registry.contains(name) {
            return Some(TemplateSource::Registry(name.to_string()));
        }
        let path = self.dir.join(name);
        if path.is_file() {
            return Some(TemplateSource::FileSystem(path));
        }
        debug!("Cannot find template {} ({})", name, path.display());
        None
    }

    fn read(&self, source: &TemplateSource) -> Result<String> {
        match source {
            TemplateSource::Registry(name) => {
                self.registry
                    .get(name)
                    .map(str::to_string)
                    .ok_or_else(|| Error::TemplateNotFound { name: name.clone() })
            }
            TemplateSource::FileSystem(path) => self.encoding.read(path),
        }
    }

    /// Fixed for the whole run, so templates never turn stale mid-run.
    fn last_modified(&self) -> NaiveDateTime {
        self.generation_time
    }
}
