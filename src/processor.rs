//! Generation of the files of one directory.
//!
//! For every content file and every language of the directory's context the
//! processor decides whether output is produced and where, then hands the
//! merged localization table to the rendering engine and writes the result.

use log::{debug, error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::{
    constants::{run_keys, DEFAULT_LANGUAGE},
    context::Context,
    encoding::TextEncoding,
    error::{Error, Result},
    loader::TemplateLoader,
    renderer::TemplateRenderer,
    stats::RunStats,
};

/// One output planned for a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTarget {
    pub language: String,
    pub target: PathBuf,
}

pub struct Processor<'a, 'p> {
    renderer: &'a dyn TemplateRenderer,
    context: &'a Context<'p>,
}

impl<'a, 'p> Processor<'a, 'p> {
    pub fn new(renderer: &'a dyn TemplateRenderer, context: &'a Context<'p>) -> Self {
        Self { renderer, context }
    }

    /// Generates every content file of the directory in every applicable language.
    ///
    /// Directories outside the generation scope produce nothing.
    pub fn process(&self) -> Result<RunStats> {
        let mut stats = RunStats::default();
        if !self.context.in_generation_scope() {
            debug!("Skipping {} outside of generation scope", self.context.source_dir().display());
            return Ok(stats);
        }

        let loader: Arc<dyn TemplateLoader> = Arc::new(self.context.template_loader());
        for path in self.context.entries()? {
            if !self.is_content_file(&path) {
                continue;
            }
            for target in self.targets(&path)? {
                stats.record(target.language.as_str());
                self.generate(&path, &target, &loader)?;
            }
        }
        Ok(stats)
    }

    /// Regular files that are neither special, ignored nor artifacts.
    pub fn is_content_file(&self, path: &Path) -> bool {
        path.is_file() && !self.context.is_special_file(path) && self.context.is_valid_file(path)
    }

    /// Output locations of `file` per language, with shadowed pairs removed.
    ///
    /// # Errors
    /// * `Error::ConfigError` if the file sits in nested language folders
    pub fn targets(&self, file: &Path) -> Result<Vec<GenerationTarget>> {
        let context = self.context;
        let Some(file_name) = file.file_name() else {
            return Ok(Vec::new());
        };

        let languages = context.languages();
        if languages.is_empty() {
            return Ok(vec![GenerationTarget {
                language: DEFAULT_LANGUAGE.to_string(),
                target: context.output_dir().join(file_name),
            }]);
        }

        let folder = self.language_folder()?;
        // Files of a language folder land next to their siblings one level up.
        let base = match (folder, context.parent()) {
            (Some(_), Some(parent)) => parent.output_dir(),
            _ => context.output_dir(),
        };

        let mut targets = Vec::new();
        for language in languages {
            match folder {
                Some(folder) if folder != language => {
                    debug!("{} is reserved for '{}', skipping '{}'", file.display(), folder, language);
                    continue;
                }
                Some(_) => {}
                None => {
                    let variant = context.source_dir().join(language).join(file_name);
                    if variant.is_file() {
                        debug!("{} shadows {} for '{}'", variant.display(), file.display(), language);
                        continue;
                    }
                }
            }

            let target = if languages.len() > 1 {
                base.join(language).join(file_name)
            } else {
                base.join(file_name)
            };
            targets.push(GenerationTarget { language: language.clone(), target });
        }
        Ok(targets)
    }

    /// Name of this directory when it is a language-specific folder.
    fn language_folder(&self) -> Result<Option<&'a str>> {
        let context = self.context;
        let Some(parent) = context.parent() else {
            return Ok(None);
        };
        let Some(name) = context.source_dir().file_name().and_then(|n| n.to_str()) else {
            return Ok(None);
        };
        if !context.has_language(name) {
            return Ok(None);
        }

        let parent_name = parent.source_dir().file_name().and_then(|n| n.to_str());
        if parent.parent().is_some() && parent_name.is_some_and(|n| context.has_language(n)) {
            return Err(Error::config(
                context.source_dir().display(),
                "language folders cannot be nested inside other language folders",
            ));
        }
        Ok(Some(name))
    }

    fn generate(
        &self,
        file: &Path,
        target: &GenerationTarget,
        loader: &Arc<dyn TemplateLoader>,
    ) -> Result<()> {
        let name = file.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        if loader.find_source(&name).is_none() {
            error!("Cannot find template {} ({})", name, file.display());
            return Ok(());
        }

        info!("Generating {}...", target.target.display());
        let data = self.render_data(file, &name, &target.language)?;
        let content = match self.renderer.render(&name, Arc::clone(loader), &data) {
            Ok(content) => content,
            Err(Error::TemplateNotFound { name }) => {
                warn!("Template '{}' disappeared, skipping {}", name, target.target.display());
                return Ok(());
            }
            Err(e) => {
                return Err(Error::RenderError { target: target.target.clone(), source: Box::new(e) })
            }
        };
        write_file(&target.target, &content, self.context.write_encoding())
    }

    /// Merged localization of `language` plus the paths of the file being rendered.
    fn render_data(&self, file: &Path, name: &str, language: &str) -> Result<serde_json::Value> {
        let mut values = self.context.merged_localization(language).to_json();
        let absolute = std::path::absolute(file)
            .map_err(|source| Error::ReadError { path: file.to_path_buf(), source })?;
        values.insert(run_keys::TEMPLATE_PATH.to_string(), absolute.display().to_string().into());
        values.insert(
            run_keys::TEMPLATE_RELATIVE_PATH.to_string(),
            self.context.relative_path(name).into(),
        );
        Ok(serde_json::Value::Object(values))
    }
}

fn write_file(path: &Path, content: &str, encoding: TextEncoding) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|source| Error::WriteError { path: parent.to_path_buf(), source })?;
    }
    encoding.write(path, content)
}
