//! Filesystem URL resolver.

use crate::config::normalize_base_url;
use crate::error::ResolveError;
use crate::frontmatter::parse_frontmatter;
use crate::services::UrlResolver;
use async_trait::async_trait;
use quire_types::Url;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Maps `content_root/a/b.md` to `<base_url>a/b.html`.
///
/// A `permalink` front matter field takes precedence over the path mapping,
/// which is why resolving a URL reads the source file.
#[derive(Debug, Clone)]
pub struct SiteUrlResolver {
    content_root: PathBuf,
    base_url: String,
}

impl SiteUrlResolver {
    pub fn new(content_root: impl Into<PathBuf>, base_url: &str) -> Self {
        Self {
            content_root: content_root.into(),
            base_url: normalize_base_url(base_url),
        }
    }

    /// Output path of `path` relative to the site root, without a leading slash
    fn output_rel_path(&self, path: &Path) -> Result<String, ResolveError> {
        let invalid = |reason: &str| ResolveError::InvalidPathMapping {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };

        let root = anchored(&self.content_root).ok_or_else(|| invalid("content root escapes"))?;
        let source = anchored(path).ok_or_else(|| invalid("path contains `..`"))?;
        let relative = source
            .strip_prefix(&root)
            .map_err(|_| invalid("path is outside the content root"))?;

        let mut segments = Vec::new();
        for component in relative.with_extension("html").components() {
            match component {
                Component::Normal(part) => segments.push(
                    part.to_str()
                        .ok_or_else(|| invalid("path is not valid UTF-8"))?
                        .to_string(),
                ),
                _ => return Err(invalid("path is not relative to the content root")),
            }
        }
        if segments.is_empty() {
            return Err(invalid("path names the content root itself"));
        }

        Ok(segments.join("/"))
    }
}

#[async_trait]
impl UrlResolver for SiteUrlResolver {
    async fn to_url(&self, path: &Path) -> Result<Url, ResolveError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| match source.kind() {
                ErrorKind::NotFound => ResolveError::FileNotFound(path.to_path_buf()),
                _ => ResolveError::Io {
                    path: path.to_path_buf(),
                    source,
                },
            })?;

        let permalink = match parse_frontmatter(&content) {
            Ok((fields, _)) => fields.get("permalink").map(normalize_permalink),
            Err(e) => {
                // The reader reports malformed front matter; fall back to the path
                tracing::debug!("Ignoring front matter of {:?} for URL: {}", path, e);
                None
            }
        };

        let rel = match permalink {
            Some(p) if !p.is_empty() => p,
            _ => self.output_rel_path(path)?,
        };

        Ok(Url::new(format!("{}{}", self.base_url, rel)))
    }
}

/// Absolute against the working directory, then [`lexical`], so relative
/// page paths compare against an absolute content root
fn anchored(path: &Path) -> Option<PathBuf> {
    lexical(&std::path::absolute(path).ok()?)
}

/// Drop `.` components; `None` when the path climbs with `..`
fn lexical(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => return None,
            other => out.push(other.as_os_str()),
        }
    }
    Some(out)
}

/// `/a/b` -> `a/b.html`, `/a/` -> `a/index.html`
pub fn normalize_permalink(permalink: &str) -> String {
    let p = permalink.trim().trim_start_matches('/');

    if p.is_empty() {
        String::new()
    } else if let Some(dir) = p.strip_suffix('/') {
        format!("{}/index.html", dir.trim_end_matches('/'))
    } else if p.ends_with(".html") {
        p.to_string()
    } else {
        format!("{}.html", p)
    }
}
