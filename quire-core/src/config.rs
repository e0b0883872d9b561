//! Configuration parsing and management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// Main configuration struct matching the quire.yml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Convert markdown page bodies to HTML
    #[serde(default = "default_true")]
    pub markdown: bool,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

fn default_base_url() -> String {
    String::from("/")
}

fn default_true() -> bool {
    true
}

/// Site-wide values made available to every rendered page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub author: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub url: Option<String>,
}

impl SiteConfig {
    /// Present values as `site_<name>` context fields
    pub fn fields(&self) -> Vec<(String, String)> {
        [
            ("site_title", &self.title),
            ("site_author", &self.author),
            ("site_description", &self.description),
            ("site_url", &self.url),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| (key.to_string(), v.clone())))
        .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_dir")]
    pub content: PathBuf,

    #[serde(default = "default_dir")]
    pub templates: PathBuf,

    #[serde(default = "default_output")]
    pub output: PathBuf,
}

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_output() -> PathBuf {
    PathBuf::from("_site")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            content: default_dir(),
            templates: default_dir(),
            output: default_output(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            paths: PathsConfig::default(),
            base_url: default_base_url(),
            markdown: true,
            config_path: None,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;

        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// The file this configuration was loaded from, if any
    pub fn path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Root the URL resolver maps source paths against
    pub fn content_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.content)
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.templates)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.output)
    }

    /// Resolve a template name against the templates directory
    pub fn template_path(&self, name: &Path) -> PathBuf {
        if name.is_absolute() {
            name.to_path_buf()
        } else {
            self.templates_dir().join(name)
        }
    }

    /// Normalized base URL with leading and trailing slash ("/foo/" or "/")
    pub fn normalized_base_url(&self) -> String {
        normalize_base_url(&self.base_url)
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        match self.config_path.as_deref().and_then(Path::parent) {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Ensure base URLs have a leading and trailing slash
pub fn normalize_base_url(raw: &str) -> String {
    let segments: Vec<&str> = raw.trim().split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", segments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url(""), "/");
        assert_eq!(normalize_base_url("/"), "/");
        assert_eq!(normalize_base_url("blog"), "/blog/");
        assert_eq!(normalize_base_url("//blog//posts/"), "/blog/posts/");
    }

    #[test]
    fn test_defaults_when_missing() {
        let dir = tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("quire.yml")).unwrap();

        assert_eq!(config.base_url, "/");
        assert!(config.markdown);
        assert_eq!(config.output_dir(), PathBuf::from("_site"));
        assert!(config.site.fields().is_empty());
        assert_eq!(config.path(), None);
    }

    #[test]
    fn test_paths_resolve_relative_to_config() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("quire.yml");
        fs::write(
            &config_path,
            r#"
site:
  title: "My Site"
  author: "Me"
paths:
  content: "content"
  templates: "templates"
base_url: "/docs"
markdown: false
"#,
        )
        .unwrap();

        let config = Config::from_file(&config_path).unwrap();
        assert_eq!(config.path(), Some(config_path.as_path()));
        assert_eq!(config.content_dir(), dir.path().join("content"));
        assert_eq!(
            config.template_path(Path::new("post.html")),
            dir.path().join("templates/post.html")
        );
        assert_eq!(config.output_dir(), dir.path().join("_site"));
        assert_eq!(config.normalized_base_url(), "/docs/");
        assert!(!config.markdown);
        assert_eq!(
            config.site.fields(),
            vec![
                ("site_title".to_string(), "My Site".to_string()),
                ("site_author".to_string(), "Me".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_yaml() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("quire.yml");
        fs::write(&config_path, "site: [unclosed").unwrap();

        assert!(matches!(
            Config::from_file(&config_path),
            Err(ConfigError::ParseError(_))
        ));
    }
}
