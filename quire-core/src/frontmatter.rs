//! Front matter parsing for source pages.
//!
//! A page may open with a YAML block fenced by `---` lines. Its top-level
//! entries become context fields; everything after the closing fence is the
//! page body.

use quire_types::Context;
use regex::Regex;
use serde_yaml::Value;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Front matter must be a mapping")]
    NotAMapping,

    #[error("Unsupported value for key `{0}`: nested mappings cannot be flattened")]
    UnsupportedValue(String),
}

static FRONTMATTER_REGEX: OnceLock<Regex> = OnceLock::new();

fn frontmatter_regex() -> &'static Regex {
    FRONTMATTER_REGEX.get_or_init(|| {
        Regex::new(r"(?s)^---[ \t]*\r?\n(?:(.*?)\r?\n)??---[ \t]*(?:\r?\n(.*))?$").unwrap()
    })
}

/// Split `content` into flattened front matter fields and the body.
///
/// Scalars become their string form, `null` becomes `""`, and sequences
/// are joined with `", "`. Without a front matter block the context is
/// empty and the body is the whole input.
///
/// # Example
///
/// ```
/// use quire_core::frontmatter::parse_frontmatter;
///
/// let content = "---\ntitle: My Post\ntags: [rust, ssg]\n---\n# Hello\n";
///
/// let (fields, body) = parse_frontmatter(content).unwrap();
/// assert_eq!(fields.get("title"), Some("My Post"));
/// assert_eq!(fields.get("tags"), Some("rust, ssg"));
/// assert_eq!(body, "# Hello\n");
/// ```
pub fn parse_frontmatter(content: &str) -> Result<(Context, &str), FrontmatterError> {
    let Some(captures) = frontmatter_regex().captures(content) else {
        return Ok((Context::new(), content));
    };

    let yaml = captures.get(1).map_or("", |m| m.as_str());
    let body = captures.get(2).map_or("", |m| m.as_str());
    if yaml.trim().is_empty() {
        return Ok((Context::new(), body));
    }

    let mapping = match serde_yaml::from_str::<Value>(yaml)? {
        Value::Mapping(mapping) => mapping,
        Value::Null => return Ok((Context::new(), body)),
        _ => return Err(FrontmatterError::NotAMapping),
    };

    let mut fields = Context::new();
    for (key, value) in mapping {
        let key = scalar_to_string(&key).ok_or(FrontmatterError::NotAMapping)?;
        let value = flatten(&value).ok_or_else(|| FrontmatterError::UnsupportedValue(key.clone()))?;
        fields.insert(key, value);
    }

    Ok((fields, body))
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null => Some(String::new()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn flatten(value: &Value) -> Option<String> {
    match value {
        Value::Sequence(items) => {
            let parts: Option<Vec<String>> = items.iter().map(scalar_to_string).collect();
            parts.map(|p| p.join(", "))
        }
        other => scalar_to_string(other),
    }
}
