//! Error handling for the Kiln site builder.
//! Defines the error kinds a build can fail with and the result alias used
//! throughout the crate.

use std::error::Error as StdError;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while configuring or running a build.
///
/// Every variant that is tied to a file carries the path that triggered it.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or missing input, reported before the filesystem is touched.
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    #[error("Failed to parse config file '{path}'. Original error: {e}")]
    ConfigParseError { path: String, e: String },

    #[error("Failed to parse templated file patterns. Original error: {0}")]
    GlobSetParseError(#[from] globset::Error),

    /// An `include`/`includeTemplate` target does not exist.
    #[error("Cannot include '{path}' from '{included_from}': file not found.")]
    NotFound { path: String, included_from: String },

    /// An expression failed or referenced an unbound name.
    #[error("Failed to evaluate '{path}'. Original error: {source}")]
    EvaluationError {
        path: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("IO error: failed to {operation} '{path}': {source}.")]
    IoError {
        operation: &'static str,
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to walk the source tree. Original error: {0}")]
    WalkError(#[from] walkdir::Error),
}

impl Error {
    /// Wraps an [`io::Error`] with the operation and path it happened on.
    pub fn io<P: AsRef<Path>>(operation: &'static str, path: P, source: io::Error) -> Self {
        Error::IoError { operation, path: path.as_ref().display().to_string(), source }
    }

    /// Classifies an evaluation failure of the templated file at `path`.
    ///
    /// A missing include target anywhere in the nested evaluation surfaces as
    /// [`Error::NotFound`], an unreadable one as [`Error::IoError`]. Everything
    /// else is an [`Error::EvaluationError`].
    pub fn evaluation<P: AsRef<Path>>(path: P, source: minijinja::Error) -> Self {
        let path = path.as_ref().display().to_string();
        if let Some(include) = find_include_error(&source) {
            let target = include.path.display().to_string();
            return match include.source.kind() {
                io::ErrorKind::NotFound => Error::NotFound { path: target, included_from: path },
                kind => Error::IoError {
                    operation: "include",
                    path: target,
                    source: io::Error::new(kind, include.source.to_string()),
                },
            };
        }
        Error::EvaluationError { path, source }
    }
}

/// Failure of an inclusion helper to read its target.
///
/// Attached as the source of the `minijinja::Error` returned from the helper so
/// the build can recover the requested path once evaluation unwinds.
#[derive(Error, Debug)]
#[error("cannot read '{}': {source}", path.display())]
pub struct IncludeError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

fn find_include_error(err: &minijinja::Error) -> Option<&IncludeError> {
    let mut current: Option<&(dyn StdError + 'static)> = err.source();
    while let Some(err) = current {
        if let Some(include) = err.downcast_ref::<IncludeError>() {
            return Some(include);
        }
        current = err.source();
    }
    None
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{}", err);
    std::process::exit(1);
}
