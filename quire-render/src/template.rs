//! Template parsing and substitution.

use quire_core::Context;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// A placeholder named a key the context does not have
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unbound key `{0}`")]
pub struct UnboundKey(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Chunk {
    Text(String),
    Key(String),
}

/// A parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    chunks: Vec<Chunk>,
}

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\$\$|\$([A-Za-z0-9_.\-]+)\$").unwrap())
}

impl Template {
    /// Parse template text. Parsing never fails: a `$` that starts neither
    /// `$$` nor a `$key$` placeholder is kept as text.
    pub fn parse(source: &str) -> Self {
        let mut chunks = Vec::new();
        let mut text = String::new();
        let mut last = 0;

        for captures in placeholder_regex().captures_iter(source) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            text.push_str(&source[last..whole.start()]);
            last = whole.end();

            match captures.get(1) {
                Some(key) => {
                    if !text.is_empty() {
                        chunks.push(Chunk::Text(std::mem::take(&mut text)));
                    }
                    chunks.push(Chunk::Key(key.as_str().to_string()));
                }
                None => text.push('$'),
            }
        }

        text.push_str(&source[last..]);
        if !text.is_empty() {
            chunks.push(Chunk::Text(text));
        }

        Self { chunks }
    }

    /// Substitute every placeholder from `context`
    pub fn render(&self, context: &Context) -> Result<String, UnboundKey> {
        let mut output = String::new();
        for chunk in &self.chunks {
            match chunk {
                Chunk::Text(text) => output.push_str(text),
                Chunk::Key(key) => {
                    let value = context.get(key).ok_or_else(|| UnboundKey(key.clone()))?;
                    output.push_str(value);
                }
            }
        }
        Ok(output)
    }
}
