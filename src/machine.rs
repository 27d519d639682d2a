//! Recursive generation of a whole source tree.

use log::{debug, info};

use crate::context::Context;
use crate::error::Result;
use crate::processor::Processor;
use crate::renderer::TemplateRenderer;
use crate::stats::RunStats;

/// Walks the source tree depth-first, one directory context at a time.
pub struct TemplateMachine<'r> {
    renderer: &'r dyn TemplateRenderer,
}

impl<'r> TemplateMachine<'r> {
    pub fn new(renderer: &'r dyn TemplateRenderer) -> Self {
        Self { renderer }
    }

    /// Generates the project rooted at `root` and returns the run statistics.
    ///
    /// The first error aborts the run.
    pub fn generate(&self, root: &Context<'_>) -> Result<RunStats> {
        info!("Generating project {}...", root.source_root().display());
        let stats = self.generate_recursively(root)?;
        info!("You will find your generated files in {}", root.output_root().display());
        Ok(stats)
    }

    /// Generates `context`'s own files, then descends into its sub-directories.
    ///
    /// Directories outside the generation scope are still descended into, a
    /// descendant may be inside it.
    fn generate_recursively(&self, context: &Context<'_>) -> Result<RunStats> {
        let mut stats = Processor::new(self.renderer, context).process()?;

        for path in context.entries()? {
            if !path.is_dir() || context.is_special_file(&path) || !context.is_valid_file(&path) {
                continue;
            }
            debug!("Descending into {}", path.display());
            let child = Context::child(context, &path)?;
            stats.merge(self.generate_recursively(&child)?);
        }
        Ok(stats)
    }
}
