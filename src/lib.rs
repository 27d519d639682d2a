//! template-machine turns a directory tree of templates into a tree of
//! generated files, once per language. Every directory may override the
//! configuration, templates and localizations it inherits from its parent.

/// Command-line interface module for the template-machine binary
pub mod cli;

/// Configuration handling: `.config` overrides, parent values, static defaults
pub mod config;

/// Common constants: file names, configuration keys and defaults
pub mod constants;

/// Directory contexts and their construction from the parent context
pub mod context;

/// Reading and writing text at a configured encoding
pub mod encoding;

/// Error types and handling
pub mod error;

/// Named helpers exposed to templates (e.g. `rfc1342`)
pub mod helpers;

/// Ignored files and backup/hidden artifact patterns
pub mod ignore;

/// Template registries and source lookup for the engine
pub mod loader;

/// Per-language localization tables
pub mod localization;

/// Logger setup for the binary
pub mod logger;

/// Recursive generation over the whole source tree
pub mod machine;

/// Output directory housekeeping
pub mod output;

/// Per-directory generation orchestration
/// Decides, per file and language, whether and where output is written
pub mod processor;

/// Parser for `key=value` configuration and localization files
pub mod properties;

/// Template rendering functionality
pub mod renderer;

/// Generated file and language counts
pub mod stats;
