//! Page command implementation.

use super::site::{emit, OutputArgs, Site};
use anyhow::Result;
use quire_core::{combine, combine_with_url, create_page_path, Renderable};
use std::path::{Path, PathBuf};

/// Combine `paths` into one page (earlier files win on shared keys) and emit it
pub async fn render_page(
    config_path: &Path,
    paths: &[PathBuf],
    url: Option<&str>,
    args: &OutputArgs,
) -> Result<()> {
    let site = Site::load(config_path)?;

    let sources = paths
        .iter()
        .map(|path| create_page_path(&site.services, path))
        .fold(Renderable::empty(), |acc, page| combine(&acc, &page));

    // Site fields come last so page fields override them
    let page = match url {
        Some(url) => combine_with_url(url, &sources, &site.fragment()),
        None => combine(&sources, &site.fragment()),
    };

    tracing::debug!("Page built from {} source file(s)", paths.len());
    emit(&site, &page, args).await
}
