//! Error kinds raised while forcing a renderable.
//!
//! Combinators never catch or recover any of these: the first failure hit
//! during evaluation reaches the caller unchanged, wrapped in [`RenderError`].

use std::path::PathBuf;
use thiserror::Error;

/// Source file missing or unreadable as a page
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("Page not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// URL derivation failed
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Cannot resolve URL, file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("No URL mapping for {path}: {reason}")]
    InvalidPathMapping { path: PathBuf, reason: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Template missing or a required key absent from the context
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    TemplateNotFound(PathBuf),

    #[error("Template {template} requires key `{key}` which the context lacks")]
    MissingKey { template: PathBuf, key: String },

    #[error("Failed to read template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure of a computed field
#[derive(Error, Debug)]
pub enum EvaluationError {
    #[error("Rendered context has no field `{0}`")]
    MissingField(String),

    #[error("{0}")]
    Failed(String),
}

/// Any failure surfaced by forcing a renderable's URL or context
#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

impl RenderError {
    /// Shorthand for a generic computed-field failure
    pub fn evaluation(message: impl Into<String>) -> Self {
        RenderError::Evaluation(EvaluationError::Failed(message.into()))
    }
}
