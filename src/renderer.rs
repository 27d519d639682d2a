//! Template rendering for the template machine.
//! The engine only fills placeholders; template lookup is delegated back to
//! the directory context through a [`TemplateLoader`].
use crate::error::{Error, Result};
use crate::helpers::Helpers;
use crate::loader::TemplateLoader;
use minijinja::{AutoEscape, Environment, ErrorKind, UndefinedBehavior};
use std::sync::Arc;

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders the template `name` with the given data context.
    ///
    /// # Arguments
    /// * `name` - Template name, resolved through `loader`
    /// * `loader` - Source resolution for `name` and anything it includes
    /// * `context` - Flat key/value data for placeholders
    ///
    /// # Errors
    /// * `Error::TemplateNotFound` if `name` cannot be resolved
    /// * `Error::MinijinjaError` for syntax or rendering failures
    fn render(
        &self,
        name: &str,
        loader: Arc<dyn TemplateLoader>,
        context: &serde_json::Value,
    ) -> Result<String>;
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    /// Environment with helpers registered; cloned for every render
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates an engine with the default helpers.
    pub fn new() -> Self {
        Self::with_helpers(&Helpers::default())
    }

    /// Creates an engine exposing each helper as a filter of the same name.
    pub fn with_helpers(helpers: &Helpers) -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        for (name, helper) in helpers.iter() {
            env.add_filter(name, move |value: String| helper(&value));
        }
        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(
        &self,
        name: &str,
        loader: Arc<dyn TemplateLoader>,
        context: &serde_json::Value,
    ) -> Result<String> {
        let mut env = self.env.clone();
        env.set_loader(move |name| {
            loader
                .load(name)
                .map_err(|e| minijinja::Error::new(ErrorKind::InvalidOperation, e.to_string()))
        });

        let tmpl = env.get_template(name).map_err(|e| match e.kind() {
            ErrorKind::TemplateNotFound => Error::TemplateNotFound { name: name.to_string() },
            _ => Error::MinijinjaError(e),
        })?;

        tmpl.render(context).map_err(Error::MinijinjaError)
    }
}
