//! Template engine backed by template files on disk.

use crate::template::Template;
use async_trait::async_trait;
use quire_core::{Context, TemplateEngine, TemplateError};
use std::io::ErrorKind;
use std::path::Path;

/// Reads and parses a template file on every application, so edits to
/// templates are always picked up.
#[derive(Debug, Clone, Default)]
pub struct FileTemplateEngine;

impl FileTemplateEngine {
    pub fn new() -> Self {
        Self
    }

    pub async fn load(&self, path: &Path) -> Result<Template, TemplateError> {
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| match source.kind() {
                ErrorKind::NotFound => TemplateError::TemplateNotFound(path.to_path_buf()),
                _ => TemplateError::Io {
                    path: path.to_path_buf(),
                    source,
                },
            })?;
        Ok(Template::parse(&source))
    }
}

#[async_trait]
impl TemplateEngine for FileTemplateEngine {
    async fn apply_template(
        &self,
        template: &Path,
        context: &Context,
    ) -> Result<String, TemplateError> {
        tracing::debug!("Applying template {:?}", template);
        let parsed = self.load(template).await?;
        parsed
            .render(context)
            .map_err(|unbound| TemplateError::MissingKey {
                template: template.to_path_buf(),
                key: unbound.0,
            })
    }
}
