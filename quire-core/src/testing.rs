//! In-memory collaborators for unit tests.

use crate::action::Action;
use crate::error::{ReadError, ResolveError, TemplateError};
use crate::renderable::Renderable;
use crate::services::{PageReader, Services, TemplateEngine, UrlResolver};
use async_trait::async_trait;
use quire_types::{Context, Url};
use regex::Regex;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

pub struct MemoryPages(HashMap<PathBuf, Context>);

#[async_trait]
impl PageReader for MemoryPages {
    async fn read_page(&self, path: &Path) -> Result<Context, ReadError> {
        self.0
            .get(path)
            .cloned()
            .ok_or_else(|| ReadError::FileNotFound(path.to_path_buf()))
    }
}

/// `a/b.md` -> `/a/b.html`; parent components have no mapping
pub struct ExtensionUrls;

#[async_trait]
impl UrlResolver for ExtensionUrls {
    async fn to_url(&self, path: &Path) -> Result<Url, ResolveError> {
        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(ResolveError::InvalidPathMapping {
                path: path.to_path_buf(),
                reason: "outside content root".into(),
            });
        }
        let html = path.with_extension("html");
        Ok(Url::new(format!("/{}", html.display())))
    }
}

/// `$key$` substitution over templates held in memory
pub struct MemoryTemplates(HashMap<PathBuf, String>);

impl MemoryTemplates {
    pub fn new(templates: &[(&str, &str)]) -> Self {
        Self(
            templates
                .iter()
                .map(|(path, text)| (PathBuf::from(path), text.to_string()))
                .collect(),
        )
    }
}

#[async_trait]
impl TemplateEngine for MemoryTemplates {
    async fn apply_template(
        &self,
        template: &Path,
        context: &Context,
    ) -> Result<String, TemplateError> {
        let text = self
            .0
            .get(template)
            .ok_or_else(|| TemplateError::TemplateNotFound(template.to_path_buf()))?;

        let key = Regex::new(r"\$([A-Za-z0-9_.-]+)\$").unwrap();
        let mut output = String::new();
        let mut last = 0;
        for captures in key.captures_iter(text) {
            let whole = captures.get(0).unwrap();
            let name = &captures[1];
            let value = context.get(name).ok_or_else(|| TemplateError::MissingKey {
                template: template.to_path_buf(),
                key: name.to_string(),
            })?;
            output.push_str(&text[last..whole.start()]);
            output.push_str(value);
            last = whole.end();
        }
        output.push_str(&text[last..]);
        Ok(output)
    }
}

pub fn fixture_services(pages: &[(&str, Context)]) -> Services {
    fixture_services_with_templates(pages, &[])
}

pub fn fixture_services_with_templates(
    pages: &[(&str, Context)],
    templates: &[(&str, &str)],
) -> Services {
    let pages = pages
        .iter()
        .map(|(path, context)| (PathBuf::from(path), context.clone()))
        .collect();
    Services::new(
        Arc::new(MemoryPages(pages)),
        Arc::new(ExtensionUrls),
        Arc::new(MemoryTemplates::new(templates)),
    )
}

/// A renderable with explicit dependencies, URL and context
pub fn page_with_url(dependencies: &[&str], url: Option<&str>, context: Context) -> Renderable {
    let dependencies = dependencies.iter().map(PathBuf::from).collect();
    let render = Action::new(dependencies, move || {
        let context = context.clone();
        async move { Ok(context) }
    });
    Renderable::assemble(url.map(|u| Action::pure(Url::new(u))), render)
}
