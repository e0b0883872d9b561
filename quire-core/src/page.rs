//! Leaf constructors: pages read from disk and custom pages built from fields.

use crate::action::Action;
use crate::error::RenderError;
use crate::renderable::Renderable;
use crate::services::{PageReader, Services, UrlResolver};
use quire_types::{Context, Url, URL_KEY};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Value of a custom page field
#[derive(Clone, Debug)]
pub enum Field {
    /// Passed through unchanged, contributes no dependencies
    Literal(String),
    /// Forced when the page renders, contributes its dependencies
    Computed(Action<String>),
}

impl Field {
    pub fn literal(value: impl Into<String>) -> Self {
        Field::Literal(value.into())
    }

    pub fn computed(action: Action<String>) -> Self {
        Field::Computed(action)
    }

    pub fn dependencies(&self) -> &[PathBuf] {
        match self {
            Field::Literal(_) => &[],
            Field::Computed(action) => action.dependencies(),
        }
    }

    async fn resolve(&self) -> Result<String, RenderError> {
        match self {
            Field::Literal(value) => Ok(value.clone()),
            Field::Computed(action) => action.run().await,
        }
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Field::Literal(value.to_string())
    }
}

impl From<String> for Field {
    fn from(value: String) -> Self {
        Field::Literal(value)
    }
}

impl From<Action<String>> for Field {
    fn from(action: Action<String>) -> Self {
        Field::Computed(action)
    }
}

/// A page backed by a source file.
///
/// Depends on `path` alone. The URL comes from the resolver; the context
/// comes from the reader, with `"url"` set to the resolver's answer so the
/// two always agree.
pub fn create_page_path(services: &Services, path: impl Into<PathBuf>) -> Renderable {
    let path = path.into();

    let url = {
        let resolver = Arc::clone(services.resolver());
        let path = path.clone();
        Action::new(Vec::new(), move || {
            let resolver = Arc::clone(&resolver);
            let path = path.clone();
            async move { resolver.to_url(&path).await.map_err(RenderError::from) }
        })
    };

    let reader = Arc::clone(services.reader());
    let resolver = Arc::clone(services.resolver());
    let source = path.clone();
    let render = Action::new(vec![path], move || {
        let reader = Arc::clone(&reader);
        let resolver = Arc::clone(&resolver);
        let path = source.clone();
        async move { read_with_url(reader.as_ref(), resolver.as_ref(), &path).await }
    });

    Renderable::assemble(Some(url), render)
}

async fn read_with_url(
    reader: &dyn PageReader,
    resolver: &dyn UrlResolver,
    path: &Path,
) -> Result<Context, RenderError> {
    tracing::debug!(path = %path.display(), "Reading page");
    let (mut context, url) = futures::try_join!(
        async { reader.read_page(path).await.map_err(RenderError::from) },
        async { resolver.to_url(path).await.map_err(RenderError::from) },
    )?;
    context.insert(URL_KEY, url.0);
    Ok(context)
}

/// A page at a fixed `url` whose context is assembled from `fields`.
///
/// The entry `("url", url)` is placed before the user fields and the context
/// is built last-write-wins, so a `"url"` entry in `fields` replaces it in the
/// rendered context. The renderable's own URL stays `url` either way.
/// Fields are forced in order; the first failure fails the whole page.
pub fn create_custom_page(url: impl Into<Url>, fields: Vec<(String, Field)>) -> Renderable {
    let url = url.into();

    if fields.iter().any(|(key, _)| key == URL_KEY) {
        tracing::warn!(
            url = %url,
            "custom page field `url` shadows the page URL in its rendered context"
        );
    }

    let mut entries = Vec::with_capacity(fields.len() + 1);
    entries.push((URL_KEY.to_string(), Field::Literal(url.0.clone())));
    entries.extend(fields);

    let dependencies: Vec<PathBuf> = entries
        .iter()
        .flat_map(|(_, field)| field.dependencies().iter().cloned())
        .collect();

    let entries = Arc::new(entries);
    let render = Action::new(dependencies, move || {
        let entries = Arc::clone(&entries);
        async move {
            let mut pairs = Vec::with_capacity(entries.len());
            for (key, field) in entries.iter() {
                pairs.push((key.clone(), field.resolve().await?));
            }
            Ok::<_, RenderError>(pairs.into_iter().collect::<Context>())
        }
    });

    Renderable::assemble(Some(Action::pure(url)), render)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EvaluationError, ReadError, ResolveError};
    use crate::testing::fixture_services;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fields(pairs: Vec<(&str, Field)>) -> Vec<(String, Field)> {
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[tokio::test]
    async fn test_page_path_dependencies_and_url() {
        let services = fixture_services(&[("posts/a.md", Context::new().with("title", "A"))]);
        let page = create_page_path(&services, "posts/a.md");

        assert_eq!(page.dependencies(), &[PathBuf::from("posts/a.md")]);
        assert_eq!(
            page.resolve_url().await.unwrap(),
            Some(Url::new("/posts/a.html"))
        );

        let context = page.render().await.unwrap();
        assert_eq!(context.get("title"), Some("A"));
        assert_eq!(context.get("url"), Some("/posts/a.html"));
    }

    #[tokio::test]
    async fn test_page_path_url_overrides_reader_url() {
        let services = fixture_services(&[(
            "a.md",
            Context::new().with("url", "/stale.html").with("title", "A"),
        )]);
        let context = create_page_path(&services, "a.md").render().await.unwrap();
        assert_eq!(context.get("url"), Some("/a.html"));
    }

    #[tokio::test]
    async fn test_page_path_missing_file() {
        let services = fixture_services(&[]);
        let page = create_page_path(&services, "nope.md");

        let err = page.render().await.unwrap_err();
        assert!(matches!(err, RenderError::Read(ReadError::FileNotFound(_))));
    }

    #[tokio::test]
    async fn test_page_path_resolve_failure() {
        let services = fixture_services(&[("../outside.md", Context::new())]);
        let page = create_page_path(&services, "../outside.md");

        let err = page.resolve_url().await.unwrap_err();
        assert!(matches!(
            err,
            RenderError::Resolve(ResolveError::InvalidPathMapping { .. })
        ));
        assert!(page.render().await.is_err());
    }

    #[tokio::test]
    async fn test_custom_page_url_field() {
        let page = create_custom_page("/about.html", fields(vec![("title", "About".into())]));

        assert!(page.dependencies().is_empty());
        assert_eq!(
            page.resolve_url().await.unwrap(),
            Some(Url::new("/about.html"))
        );

        let context = page.render().await.unwrap();
        assert_eq!(context.get("url"), Some("/about.html"));
        assert_eq!(context.get("title"), Some("About"));
    }

    #[tokio::test]
    async fn test_custom_page_user_url_field_wins_in_context() {
        let page = create_custom_page(
            "/about.html",
            fields(vec![("url", "/elsewhere.html".into())]),
        );

        let context = page.render().await.unwrap();
        assert_eq!(context.get("url"), Some("/elsewhere.html"));
        // The renderable's URL is not re-derived from the fields
        assert_eq!(
            page.resolve_url().await.unwrap(),
            Some(Url::new("/about.html"))
        );
    }

    #[tokio::test]
    async fn test_custom_page_computed_url_field_wins_in_context() {
        let computed = Action::pure("/computed.html".to_string());
        let page = create_custom_page("/about.html", fields(vec![("url", computed.into())]));

        let context = page.render().await.unwrap();
        assert_eq!(context.get("url"), Some("/computed.html"));
    }

    #[tokio::test]
    async fn test_custom_page_dependencies_in_field_order() {
        let services = fixture_services(&[
            ("a.md", Context::new().with("title", "A")),
            ("b.md", Context::new().with("title", "B")),
        ]);
        let a = create_page_path(&services, "a.md");
        let b = create_page_path(&services, "b.md");

        let page = create_custom_page(
            "/both.html",
            fields(vec![
                ("second", b.field("title").into()),
                ("literal", "x".into()),
                ("first", a.field("title").into()),
            ]),
        );

        assert_eq!(
            page.dependencies(),
            &[PathBuf::from("b.md"), PathBuf::from("a.md")]
        );

        let context = page.render().await.unwrap();
        assert_eq!(context.get("first"), Some("A"));
        assert_eq!(context.get("second"), Some("B"));
        assert_eq!(context.get("literal"), Some("x"));
    }

    #[tokio::test]
    async fn test_custom_page_is_all_or_nothing() {
        let forced = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&forced);
        let after = Action::new(Vec::new(), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok("late".to_string()) }
        });
        let failing = Action::<String>::new(vec![PathBuf::from("f")], || async {
            Err(RenderError::evaluation("field failed"))
        });

        let page = create_custom_page(
            "/x.html",
            fields(vec![("bad", failing.into()), ("after", after.into())]),
        );

        let err = page.render().await.unwrap_err();
        assert!(matches!(err, RenderError::Evaluation(EvaluationError::Failed(_))));
        assert_eq!(forced.load(Ordering::SeqCst), 0);
    }
}
