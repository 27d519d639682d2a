//! Error handling for the template machine.
//! Defines the error type and result alias used throughout the crate.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving contexts or generating output.
///
/// Every variant except [`Error::TemplateNotFound`] aborts the run.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or unreadable configuration
    #[error("Configuration error in '{location}': {reason}.")]
    ConfigError { location: String, reason: String },

    /// A source file could not be read
    #[error("Cannot read '{}': {source}.", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An output file or directory could not be written
    #[error("Cannot write '{}': {source}.", path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    #[error("Directory listing failed: {0}.")]
    WalkError(#[from] walkdir::Error),

    #[error("Unknown encoding: '{0}'.")]
    EncodingError(String),

    /// Malformed line in a properties file
    #[error("Invalid properties file '{}' at line {line}: {reason}.", path.display())]
    PropertiesError { path: PathBuf, line: usize, reason: String },

    #[error("Template engine error: {0}")]
    MinijinjaError(#[from] minijinja::Error),

    /// Template name neither registered nor present as a file
    #[error("Template '{name}' not found.")]
    TemplateNotFound { name: String },

    /// Rendering failed while producing the given destination file
    #[error("Cannot generate '{}': {source}", target.display())]
    RenderError {
        target: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("Output directory '{output_dir}' already exists. Use --force to move it aside.")]
    OutputDirectoryExistsError { output_dir: String },
}

impl Error {
    /// Shorthand for a configuration error located at `location`.
    pub fn config<L: std::fmt::Display, R: Into<String>>(location: L, reason: R) -> Self {
        Error::ConfigError { location: location.to_string(), reason: reason.into() }
    }
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
