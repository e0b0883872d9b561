//! # quire-render
//!
//! Template rendering library for quire.
//!
//! Templates are plain text with `$key$` placeholders filled from a page
//! context; `$$` writes a literal dollar sign.

pub mod engine;
pub mod template;

pub use engine::FileTemplateEngine;
pub use template::{Template, UnboundKey};
