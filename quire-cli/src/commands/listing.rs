//! Listing command implementation.

use super::site::{emit, OutputArgs, Site};
use anyhow::{bail, Result};
use quire_core::{combine, create_listing, create_page_path, Field, Renderable};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Inputs of the listing command
#[derive(Debug, Default)]
pub struct ListingOptions {
    pub url: String,
    pub item_templates: Vec<PathBuf>,
    pub dir: Option<PathBuf>,
    pub fields: Vec<(String, String)>,
    pub paths: Vec<PathBuf>,
}

/// Parse a `KEY=VALUE` field argument
pub fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got `{}`", raw)),
    }
}

/// Render every item through the item templates into one listing page
pub async fn render_listing(
    config_path: &Path,
    opts: ListingOptions,
    args: &OutputArgs,
) -> Result<()> {
    let site = Site::load(config_path)?;

    let mut sources = opts.paths;
    if let Some(dir) = &opts.dir {
        if !dir.is_dir() {
            bail!("Listing directory {:?} does not exist", dir);
        }
        sources.extend(discover_markdown_files(dir));
    }
    tracing::info!("Listing {} item(s) at {}", sources.len(), opts.url);

    let items: Vec<Renderable> = sources
        .iter()
        .map(|path| create_page_path(&site.services, path))
        .collect();

    let fields = opts
        .fields
        .into_iter()
        .map(|(key, value)| (key, Field::Literal(value)))
        .collect();

    let listing = create_listing(
        &site.services,
        opts.url,
        site.template_paths(&opts.item_templates),
        items,
        fields,
    );

    let page = combine(&listing, &site.fragment());
    emit(&site, &page, args).await
}

/// Markdown files under `dir`, sorted by path
fn discover_markdown_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}
