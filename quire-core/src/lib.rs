//! # quire-core
//!
//! Core library for the quire static site generator.
//!
//! This crate provides the renderable composition algebra: leaf pages read
//! from disk or assembled from fields, listings that concatenate rendered
//! items through templates, and combinators that merge renderables while
//! threading their file dependencies. Rendering is deferred; building a
//! renderable performs no I/O.

pub mod action;
pub mod chain;
pub mod config;
pub mod error;
pub mod frontmatter;
pub mod listing;
pub mod page;
pub mod reader;
pub mod renderable;
pub mod services;
pub mod url;

#[cfg(test)]
mod testing;

pub use action::Action;
pub use chain::{apply_template_chain, chain_context, render_chain};
pub use config::Config;
pub use error::{EvaluationError, ReadError, RenderError, ResolveError, TemplateError};
pub use listing::{create_listing, create_listing_with};
pub use page::{create_custom_page, create_page_path, Field};
pub use quire_types::{Context, Url};
pub use reader::FsPageReader;
pub use renderable::{combine, combine_with_url, Renderable};
pub use services::{PageReader, Services, TemplateEngine, UrlResolver};
pub use url::SiteUrlResolver;
