//! Collaborators the algebra delegates I/O to.
//!
//! Each trait is object-safe and is held as `Arc<dyn Trait>` inside
//! [`Services`], so renderables can capture them in deferred computations.
//!
//! # Laws
//!
//! - **Read-only**: implementations never write to the files they read.
//! - **Idempotency**: with unchanged files, the same input yields an equal
//!   result on every call.

use crate::error::{ReadError, ResolveError, TemplateError};
use async_trait::async_trait;
use quire_types::{Context, Url};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Produces the initial context of a source file
#[async_trait]
pub trait PageReader: Send + Sync {
    async fn read_page(&self, path: &Path) -> Result<Context, ReadError>;
}

/// Computes the public URL of a source file
#[async_trait]
pub trait UrlResolver: Send + Sync {
    async fn to_url(&self, path: &Path) -> Result<Url, ResolveError>;
}

/// Renders a template file against a context
#[async_trait]
pub trait TemplateEngine: Send + Sync {
    async fn apply_template(&self, template: &Path, context: &Context)
        -> Result<String, TemplateError>;
}

/// The set of collaborators a site is built with
#[derive(Clone)]
pub struct Services {
    reader: Arc<dyn PageReader>,
    resolver: Arc<dyn UrlResolver>,
    templates: Arc<dyn TemplateEngine>,
}

impl Services {
    pub fn new(
        reader: Arc<dyn PageReader>,
        resolver: Arc<dyn UrlResolver>,
        templates: Arc<dyn TemplateEngine>,
    ) -> Self {
        Self {
            reader,
            resolver,
            templates,
        }
    }

    pub fn reader(&self) -> &Arc<dyn PageReader> {
        &self.reader
    }

    pub fn resolver(&self) -> &Arc<dyn UrlResolver> {
        &self.resolver
    }

    pub fn templates(&self) -> &Arc<dyn TemplateEngine> {
        &self.templates
    }
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}
