//! Filesystem page reader.

use crate::error::ReadError;
use crate::frontmatter::parse_frontmatter;
use crate::services::PageReader;
use async_trait::async_trait;
use pulldown_cmark::{html, Options, Parser};
use quire_types::{Context, BODY_KEY};
use std::io::ErrorKind;
use std::path::Path;

/// Key holding the source path a page was read from
pub const PATH_KEY: &str = "path";

/// Reads pages from disk: front matter fields, `"body"` and `"path"`.
///
/// Markdown sources (`.md`, `.markdown`) have their body converted to HTML
/// unless markdown rendering is switched off.
#[derive(Debug, Clone)]
pub struct FsPageReader {
    render_markdown: bool,
    options: Options,
}

impl FsPageReader {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        Self {
            render_markdown: true,
            options,
        }
    }

    pub fn with_markdown(mut self, enabled: bool) -> Self {
        self.render_markdown = enabled;
        self
    }

    fn render_body(&self, path: &Path, body: &str) -> String {
        if self.render_markdown && is_markdown(path) {
            let mut html_output = String::new();
            html::push_html(&mut html_output, Parser::new_ext(body, self.options));
            html_output
        } else {
            body.to_string()
        }
    }
}

impl Default for FsPageReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageReader for FsPageReader {
    async fn read_page(&self, path: &Path) -> Result<Context, ReadError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| match source.kind() {
                ErrorKind::NotFound => ReadError::FileNotFound(path.to_path_buf()),
                _ => ReadError::Io {
                    path: path.to_path_buf(),
                    source,
                },
            })?;

        let (mut context, body) = parse_frontmatter(&content).map_err(|e| ReadError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        context.insert(BODY_KEY, self.render_body(path, body));
        context.insert(PATH_KEY, path.display().to_string());
        Ok(context)
    }
}

fn is_markdown(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("md" | "markdown")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_reads_markdown_page() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("post.md");
        fs::write(&path, "---\ntitle: Hello\n---\n# Heading\n\nSome *text*.\n").unwrap();

        let context = FsPageReader::new().read_page(&path).await.unwrap();
        assert_eq!(context.get("title"), Some("Hello"));
        assert_eq!(
            context.get("body"),
            Some("<h1>Heading</h1>\n<p>Some <em>text</em>.</p>\n")
        );
        assert_eq!(context.get("path"), Some(path.display().to_string().as_str()));
    }

    #[tokio::test]
    async fn test_plain_files_keep_raw_body() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snippet.html");
        fs::write(&path, "<b>raw</b>").unwrap();

        let context = FsPageReader::new().read_page(&path).await.unwrap();
        assert_eq!(context.get("body"), Some("<b>raw</b>"));
    }

    #[tokio::test]
    async fn test_markdown_can_be_disabled() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("post.md");
        fs::write(&path, "# Heading").unwrap();

        let context = FsPageReader::new()
            .with_markdown(false)
            .read_page(&path)
            .await
            .unwrap();
        assert_eq!(context.get("body"), Some("# Heading"));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = FsPageReader::new()
            .read_page(&dir.path().join("missing.md"))
            .await
            .unwrap_err();
        assert!(matches!(err, ReadError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_bad_frontmatter_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.md");
        fs::write(&path, "---\ntitle: [unclosed\n---\nBody").unwrap();

        let err = FsPageReader::new().read_page(&path).await.unwrap_err();
        assert!(matches!(err, ReadError::Parse { .. }));
    }
}
