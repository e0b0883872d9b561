//! The renderable type and its binary combinators.
//!
//! A [`Renderable`] is an immutable value: its dependency list is fixed at
//! construction, while its URL and context are deferred computations forced
//! by whoever writes the output. Every combinator returns a new renderable.

use crate::action::Action;
use crate::error::{EvaluationError, RenderError};
use quire_types::{Context, Url, URL_KEY};
use std::path::PathBuf;

/// A composable unit of page content
#[derive(Clone, Debug)]
pub struct Renderable {
    url: Option<Action<Url>>,
    render: Action<Context>,
}

impl Renderable {
    pub(crate) fn assemble(url: Option<Action<Url>>, render: Action<Context>) -> Self {
        Self { url, render }
    }

    /// No dependencies, no URL, renders to an empty context.
    ///
    /// Identity element for [`combine`] on either side.
    pub fn empty() -> Self {
        Self::from_context(Context::new())
    }

    /// A URL-less fragment whose context is fixed
    pub fn from_context(context: Context) -> Self {
        Self::from_action(Action::pure(context))
    }

    /// A URL-less fragment computed by `action`
    pub fn from_action(action: Action<Context>) -> Self {
        Self {
            url: None,
            render: action,
        }
    }

    /// Every file whose change invalidates this renderable's output
    pub fn dependencies(&self) -> &[PathBuf] {
        self.render.dependencies()
    }

    /// Force the deferred URL, if there is one
    pub async fn resolve_url(&self) -> Result<Option<Url>, RenderError> {
        match &self.url {
            Some(url) => url.run().await.map(Some),
            None => Ok(None),
        }
    }

    /// Force the deferred context
    pub async fn render(&self) -> Result<Context, RenderError> {
        tracing::debug!(
            dependencies = self.dependencies().len(),
            "Rendering renderable"
        );
        self.render.run().await
    }

    /// The render computation, carrying this renderable's dependencies
    pub fn as_action(&self) -> Action<Context> {
        self.render.clone()
    }

    /// A computed field that renders this renderable and extracts `key`
    pub fn field(&self, key: impl Into<String>) -> Action<String> {
        let key = key.into();
        self.as_action().try_map(move |mut context| {
            context
                .remove(&key)
                .ok_or_else(|| EvaluationError::MissingField(key.clone()).into())
        })
    }

    pub(crate) fn url_action(&self) -> Option<&Action<Url>> {
        self.url.as_ref()
    }

    /// Method form of [`combine`]
    pub fn combine(&self, other: &Renderable) -> Renderable {
        combine(self, other)
    }
}

/// Merge two renderables, `x` taking precedence.
///
/// Dependencies are `x`'s followed by `y`'s, duplicates kept. The URL is
/// `x`'s when present, else `y`'s. Both contexts are forced concurrently and
/// merged with `x`'s keys winning on collision; a failure in either side
/// fails the whole render.
pub fn combine(x: &Renderable, y: &Renderable) -> Renderable {
    let dependencies: Vec<PathBuf> = x
        .dependencies()
        .iter()
        .chain(y.dependencies())
        .cloned()
        .collect();
    let url = x.url.clone().or_else(|| y.url.clone());

    let left = x.render.clone();
    let right = y.render.clone();
    let render = Action::new(dependencies, move || {
        let left = left.clone();
        let right = right.clone();
        async move {
            let (left, right) = futures::try_join!(left.run(), right.run())?;
            Ok::<_, RenderError>(left.union(right))
        }
    });

    Renderable { url, render }
}

/// [`combine`], then force the URL to `url`.
///
/// The result's URL is `url` unconditionally, and its rendered context has
/// `"url"` overwritten with the same value.
pub fn combine_with_url(url: impl Into<Url>, x: &Renderable, y: &Renderable) -> Renderable {
    let url = url.into();
    let combined = combine(x, y);

    let inner = combined.render;
    let forced = url.clone();
    let render = Action::new(inner.dependencies().to_vec(), move || {
        let inner = inner.clone();
        let url = forced.clone();
        async move {
            let mut context = inner.run().await?;
            context.insert(URL_KEY, url.0);
            Ok::<_, RenderError>(context)
        }
    });

    Renderable {
        url: Some(Action::pure(url)),
        render,
    }
}
