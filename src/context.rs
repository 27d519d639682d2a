//! Directory contexts.
//!
//! A [`Context`] holds everything resolved for one source directory: its
//! configuration, template overrides, localization tables and language set.
//! Contexts are built top-down while walking the source tree. A child keeps a
//! borrowed reference to its parent and never mutates it, so whatever a
//! directory resolves depends only on its ancestors and its own files.

use crate::config::{resolve_local_config, Config};
use crate::constants::{keys, DEFAULT_LANGUAGE, LOCALIZATION_EXTENSION};
use crate::encoding::TextEncoding;
use crate::error::{Error, Result};
use crate::ignore::IgnoreRules;
use crate::loader::{ContextLoader, TemplateRegistry};
use crate::localization::{LocalizationTable, Localizations};
use crate::properties::load_properties;
use chrono::{Local, NaiveDateTime};
use indexmap::{IndexMap, IndexSet};
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use walkdir::WalkDir;

/// Inputs for the root context of a run.
#[derive(Debug, Clone)]
pub struct ContextOptions {
    source_root: PathBuf,
    output_root: PathBuf,
    scope: Option<PathBuf>,
    config: Config,
    read_encoding: TextEncoding,
    write_encoding: TextEncoding,
    generation_time: NaiveDateTime,
    ignored_files: Vec<PathBuf>,
}

impl ContextOptions {
    pub fn new<S: Into<PathBuf>, O: Into<PathBuf>>(source_root: S, output_root: O) -> Self {
        Self {
            source_root: source_root.into(),
            output_root: output_root.into(),
            scope: None,
            config: Config::default(),
            read_encoding: TextEncoding::default(),
            write_encoding: TextEncoding::default(),
            generation_time: Local::now().naive_local(),
            ignored_files: Vec::new(),
        }
    }

    /// Restricts output to this directory and its descendants.
    pub fn scope<P: Into<PathBuf>>(mut self, scope: P) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn read_encoding(mut self, encoding: TextEncoding) -> Self {
        self.read_encoding = encoding;
        self
    }

    pub fn write_encoding(mut self, encoding: TextEncoding) -> Self {
        self.write_encoding = encoding;
        self
    }

    pub fn generation_time(mut self, generation_time: NaiveDateTime) -> Self {
        self.generation_time = generation_time;
        self
    }

    pub fn ignore_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.ignored_files.push(path.into());
        self
    }
}

/// Settings shared unchanged by every context of a run.
#[derive(Debug)]
struct RunSettings {
    source_root: PathBuf,
    canonical_root: PathBuf,
    output_root: PathBuf,
    scope: Option<PathBuf>,
    read_encoding: TextEncoding,
    write_encoding: TextEncoding,
    generation_time: NaiveDateTime,
}

/// Resolved state of one source directory.
#[derive(Debug)]
pub struct Context<'p> {
    parent: Option<&'p Context<'p>>,
    run: Rc<RunSettings>,
    source_dir: PathBuf,
    output_dir: PathBuf,
    relative_dir: PathBuf,
    config: Config,
    ignore: IgnoreRules,
    templates: Arc<TemplateRegistry>,
    localizations: Localizations,
    languages: IndexSet<String>,
    merged: RefCell<HashMap<String, Rc<LocalizationTable>>>,
}

impl Context<'static> {
    /// Builds the root context of a run.
    ///
    /// # Errors
    /// * `Error::ConfigError` if the source root or the scope is not a directory,
    ///   or if local overrides of the root cannot be loaded
    pub fn root(options: ContextOptions) -> Result<Self> {
        if !options.source_root.is_dir() {
            return Err(Error::config(
                options.source_root.display(),
                "source directory does not exist",
            ));
        }
        let canonical_root = canonicalize(&options.source_root)?;
        let scope = match &options.scope {
            Some(scope) if !scope.is_dir() => {
                return Err(Error::config(scope.display(), "generation scope is not a directory"));
            }
            Some(scope) => Some(canonicalize(scope)?),
            None => None,
        };

        let mut ignore = IgnoreRules::new()?;
        for path in options.ignored_files {
            ignore.ignore_file(tree_path(&options.source_root, &canonical_root, path));
        }

        let run = Rc::new(RunSettings {
            source_root: options.source_root.clone(),
            canonical_root,
            output_root: options.output_root.clone(),
            scope,
            read_encoding: options.read_encoding,
            write_encoding: options.write_encoding,
            generation_time: options.generation_time,
        });

        Self::build(
            None,
            run,
            options.source_root,
            options.output_root,
            PathBuf::new(),
            &options.config,
            ignore,
            None,
        )
    }
}

impl<'p> Context<'p> {
    /// Builds the context of `source_dir`, a direct sub-directory of `parent`.
    pub fn child<P: AsRef<Path>>(parent: &'p Context<'p>, source_dir: P) -> Result<Context<'p>> {
        let source_dir = source_dir.as_ref();
        let name = source_dir.file_name().ok_or_else(|| {
            Error::config(source_dir.display(), "not a named sub-directory")
        })?;
        Self::build(
            Some(parent),
            Rc::clone(&parent.run),
            source_dir.to_path_buf(),
            parent.output_dir.join(name),
            parent.relative_dir.join(name),
            &parent.config,
            parent.ignore.clone(),
            Some(Arc::clone(&parent.templates)),
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        parent: Option<&'p Context<'p>>,
        run: Rc<RunSettings>,
        source_dir: PathBuf,
        output_dir: PathBuf,
        relative_dir: PathBuf,
        inherited: &Config,
        mut ignore: IgnoreRules,
        parent_templates: Option<Arc<TemplateRegistry>>,
    ) -> Result<Self> {
        debug!("Resolving context of {}", source_dir.display());
        let (config, local_config) = resolve_local_config(&source_dir, inherited, run.read_encoding)?;
        if let Some(path) = local_config {
            ignore.ignore_file(path);
        }

        let mut context = Context {
            parent,
            run,
            source_dir,
            output_dir,
            relative_dir,
            config,
            ignore,
            templates: Arc::new(TemplateRegistry::default()),
            localizations: Localizations::default(),
            languages: IndexSet::new(),
            merged: RefCell::new(HashMap::new()),
        };
        context.load_localizations()?;
        context.templates = Arc::new(context.load_templates(parent_templates)?);
        Ok(context)
    }

    /// Resolves the language set from the `languages` configuration value.
    fn load_localizations(&mut self) -> Result<()> {
        let files = self.localization_files()?;
        let definitions = self.config.get_or_default(keys::LANGUAGES).to_string();
        let tokens: Vec<&str> =
            definitions.split(',').map(str::trim).filter(|t| !t.is_empty()).collect();

        self.load_language(DEFAULT_LANGUAGE, DEFAULT_LANGUAGE, &files)?;

        if let [single] = tokens.as_slice() {
            if single.eq_ignore_ascii_case("auto") {
                return self.load_auto_languages(&files, &IndexSet::new());
            }
        }

        let mut other = false;
        let mut named = IndexSet::new();
        for token in tokens {
            if token == "other" {
                other = true;
                continue;
            }
            let (key, source) = parse_language_token(token)
                .map_err(|reason| Error::config(self.source_dir.display(), reason))?;
            self.load_language(key, source, &files)?;
            named.insert(source.to_string());
            if key != DEFAULT_LANGUAGE {
                self.languages.insert(key.to_string());
            }
        }

        if other {
            self.load_auto_languages(&files, &named)?;
        }
        Ok(())
    }

    /// Adds the parent's languages, then every local localization file.
    ///
    /// Languages already visible, or consumed as the source of a remap, are skipped.
    fn load_auto_languages(
        &mut self,
        files: &IndexMap<String, PathBuf>,
        named: &IndexSet<String>,
    ) -> Result<()> {
        let inherited: Vec<String> =
            self.parent.map(|p| p.languages.iter().cloned().collect()).unwrap_or_default();
        let candidates = inherited
            .into_iter()
            .chain(files.keys().filter(|k| k.as_str() != DEFAULT_LANGUAGE).cloned());

        for language in candidates {
            if self.languages.contains(&language) || named.contains(&language) {
                continue;
            }
            self.load_language(&language, &language, files)?;
            self.languages.insert(language);
        }
        Ok(())
    }

    /// Loads `key` from the parent's tables under `key` and `source`, then
    /// from the local file named after `source`. Later values win.
    fn load_language(
        &mut self,
        key: &str,
        source: &str,
        files: &IndexMap<String, PathBuf>,
    ) -> Result<()> {
        let mut table = LocalizationTable::default();
        if let Some(parent) = self.parent {
            if let Some(values) = parent.localizations.get(key) {
                table.merge(values);
            }
            if source != key {
                if let Some(values) = parent.localizations.get(source) {
                    table.merge(values);
                }
            }
        }

        if let Some(path) = files.get(source) {
            debug!("Loading language '{}' from {}", key, path.display());
            let values = load_properties(path, self.run.read_encoding).map_err(|e| {
                Error::config(
                    self.source_dir.display(),
                    format!("cannot load language '{key}' from '{source}': {e}"),
                )
            })?;
            table.merge(&LocalizationTable::new(values));
        }

        self.localizations.insert(key, table);
        Ok(())
    }

    /// Eligible files of the localization folder keyed by base name.
    fn localization_files(&self) -> Result<IndexMap<String, PathBuf>> {
        let dir = self.source_dir.join(self.config.get_or_default(keys::LOCALIZATION_DIR));
        let mut files = IndexMap::new();
        if !dir.is_dir() {
            return Ok(files);
        }
        for path in list_dir(&dir)? {
            if !path.is_file() || !self.ignore.is_valid_file(&path) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let stem = stem.to_string();
            let preferred = path.extension().is_some_and(|ext| ext == LOCALIZATION_EXTENSION);
            if preferred || !files.contains_key(&stem) {
                files.insert(stem, path);
            }
        }
        Ok(files)
    }

    /// Reads the template folder recursively into a registry shadowing `parent`.
    fn load_templates(&self, parent: Option<Arc<TemplateRegistry>>) -> Result<TemplateRegistry> {
        let dir = self.source_dir.join(self.config.get_or_default(keys::TEMPLATE_DIR));
        let mut local = IndexMap::new();
        if dir.is_dir() {
            let entries = WalkDir::new(&dir)
                .min_depth(1)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|e| self.ignore.is_valid_file(e.path()));
            for entry in entries {
                let entry = entry?;
                let path = entry.path();
                if !path.is_file() {
                    continue;
                }
                let name = template_name(&dir, path);
                let body = self.run.read_encoding.read(path).map_err(|e| {
                    Error::config(self.source_dir.display(), format!("cannot load template '{name}': {e}"))
                })?;
                debug!("Registering template '{}'", name);
                local.insert(name, body);
            }
        }
        Ok(TemplateRegistry::new(local, parent))
    }

    pub fn parent(&self) -> Option<&'p Context<'p>> {
        self.parent
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of this directory relative to the source root.
    pub fn relative_dir(&self) -> &Path {
        &self.relative_dir
    }

    pub fn source_root(&self) -> &Path {
        &self.run.source_root
    }

    pub fn output_root(&self) -> &Path {
        &self.run.output_root
    }

    pub fn read_encoding(&self) -> TextEncoding {
        self.run.read_encoding
    }

    pub fn write_encoding(&self) -> TextEncoding {
        self.run.write_encoding
    }

    pub fn generation_time(&self) -> NaiveDateTime {
        self.run.generation_time
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shorthand for `config().get(key)`.
    pub fn config_value(&self, key: &str) -> Option<&str> {
        self.config.get(key)
    }

    /// Externally visible languages; never contains `default`.
    pub fn languages(&self) -> &IndexSet<String> {
        &self.languages
    }

    pub fn has_language(&self, language: &str) -> bool {
        language != DEFAULT_LANGUAGE && self.languages.contains(language)
    }

    /// The table of `language` at this level, with `xx-yy` → `xx` fallback.
    pub fn localization(&self, language: &str) -> Option<&LocalizationTable> {
        self.localizations.get(language)
    }

    /// Default values overlaid by `language`, plus run-derived keys.
    ///
    /// Computed once per language and memoized for the rest of the run.
    pub fn merged_localization(&self, language: &str) -> Rc<LocalizationTable> {
        if let Some(table) = self.merged.borrow().get(language) {
            return Rc::clone(table);
        }
        let table = Rc::new(self.localizations.merged(language, self.run.generation_time));
        self.merged.borrow_mut().insert(language.to_string(), Rc::clone(&table));
        table
    }

    pub fn template(&self, name: &str) -> Option<&str> {
        self.templates.get(name)
    }

    /// Loader resolving names in this context for the rendering engine.
    pub fn template_loader(&self) -> ContextLoader {
        ContextLoader::new(
            Arc::clone(&self.templates),
            &self.source_dir,
            self.run.read_encoding,
            self.run.generation_time,
        )
    }

    /// Whether output may be generated here: no scope, or inside the scope.
    ///
    /// Both sides are compared in canonical form.
    pub fn in_generation_scope(&self) -> bool {
        match &self.run.scope {
            Some(scope) => self.run.canonical_root.join(&self.relative_dir).starts_with(scope),
            None => true,
        }
    }

    /// Template folder, localization folder, or an explicitly ignored file.
    pub fn is_special_file(&self, path: &Path) -> bool {
        let is_named = |key: &str| {
            path.file_name().is_some_and(|name| name == self.config.get_or_default(key))
        };
        is_named(keys::TEMPLATE_DIR) || is_named(keys::LOCALIZATION_DIR) || self.ignore.is_ignored(path)
    }

    pub fn is_valid_file(&self, path: &Path) -> bool {
        self.ignore.is_valid_file(path)
    }

    /// Root-relative path of a file in this directory, `/`-separated.
    pub fn relative_path(&self, file_name: &str) -> String {
        let mut segments: Vec<String> = self
            .relative_dir
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        segments.push(file_name.to_string());
        segments.join("/")
    }

    /// Entries of the source directory, sorted by name.
    pub fn entries(&self) -> Result<Vec<PathBuf>> {
        list_dir(&self.source_dir)
    }
}

/// Lists the direct entries of `dir` in file name order.
pub(crate) fn list_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        entries.push(entry?.into_path());
    }
    Ok(entries)
}

fn canonicalize(path: &Path) -> Result<PathBuf> {
    path.canonicalize().map_err(|e| Error::config(path.display(), e.to_string()))
}

/// Spells `path` the way the walker reaches it from `source_root`, so that
/// `proj/../proj/x` and `./proj/x` both match the listed `proj/x`.
/// Paths outside the tree, or that do not exist, are kept as given.
fn tree_path(source_root: &Path, canonical_root: &Path, path: PathBuf) -> PathBuf {
    let relative = path
        .canonicalize()
        .ok()
        .and_then(|canonical| canonical.strip_prefix(canonical_root).ok().map(Path::to_path_buf));
    match relative {
        Some(relative) => source_root.join(relative),
        None => path,
    }
}

fn template_name(dir: &Path, path: &Path) -> String {
    path.strip_prefix(dir)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Splits `key=source`; a plain token is its own source.
fn parse_language_token(token: &str) -> std::result::Result<(&str, &str), String> {
    let parts: Vec<&str> = token.split('=').map(str::trim).collect();
    match parts.as_slice() {
        [key] => Ok((key, key)),
        [key, source] if !key.is_empty() && !source.is_empty() => Ok((key, source)),
        _ => Err(format!("cannot process language definition '{token}'")),
    }
}
