//! Error handling for create-astro-exe.
//! Defines the error type and result alias used throughout the application.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while scaffolding a project.
#[derive(Error, Debug)]
pub enum Error {
    /// The template root is missing or is not a directory.
    #[error("Template directory does not exist: {template_dir}.")]
    TemplateNotFound { template_dir: String },

    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// A filesystem operation failed on a specific path while materializing the template.
    #[error("Failed to materialize '{}': {source}.", path.display())]
    MaterializeError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The template tree could not be traversed.
    #[error("Template walk error: {0}.")]
    WalkError(#[from] walkdir::Error),

    /// Errors in the template rule file (scaffold.json / scaffold.yml / scaffold.yaml).
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// Invalid ignore glob in the template rule file.
    #[error("Ignore pattern error: {0}.")]
    IgnoreError(String),

    /// Represents validation failures in user input
    #[error("Validation error: {0}.")]
    ValidationError(String),

    /// Interactive prompt failed (closed terminal, interrupted input).
    #[error("Prompt error: {0}.")]
    PromptError(String),

    /// An external command could not be started or exited with a nonzero status.
    #[error("Command failed: {command}\n{message}")]
    CommandError { command: String, message: String },
}

impl Error {
    pub(crate) fn materialize<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Error::MaterializeError { path: path.into(), source }
    }
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::PromptError(err.to_string())
    }
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{}", console::style(format!("Error: {err}")).red());
    std::process::exit(1);
}
