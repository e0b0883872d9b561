//! Listing pages: many items rendered through templates into one body.

use crate::action::Action;
use crate::chain::apply_template_chain;
use crate::error::RenderError;
use crate::page::{create_custom_page, Field};
use crate::renderable::Renderable;
use crate::services::{Services, TemplateEngine};
use futures::future::try_join_all;
use quire_types::{Context, Url, BODY_KEY};
use std::path::PathBuf;
use std::sync::Arc;

/// [`create_listing_with`] without a context manipulation
pub fn create_listing(
    services: &Services,
    url: impl Into<Url>,
    templates: Vec<PathBuf>,
    items: Vec<Renderable>,
    fields: Vec<(String, Field)>,
) -> Renderable {
    create_listing_with(services, |context| context, url, templates, items, fields)
}

/// A custom page at `url` whose `"body"` is every item rendered through
/// `templates`, concatenated in item order with no separator.
///
/// `manipulation` rewrites each item's context before its templates run.
/// The body depends on every item's dependencies followed by the template
/// paths; `fields` behave as in [`create_custom_page`] and come after it.
/// An empty `items` gives an empty body.
pub fn create_listing_with<M>(
    services: &Services,
    manipulation: M,
    url: impl Into<Url>,
    templates: Vec<PathBuf>,
    items: Vec<Renderable>,
    fields: Vec<(String, Field)>,
) -> Renderable
where
    M: Fn(Context) -> Context + Send + Sync + 'static,
{
    let body = concatenation(
        Arc::clone(services.templates()),
        Arc::new(manipulation),
        templates,
        items,
    );

    let mut all_fields = Vec::with_capacity(fields.len() + 1);
    all_fields.push((BODY_KEY.to_string(), Field::Computed(body)));
    all_fields.extend(fields);

    create_custom_page(url, all_fields)
}

fn concatenation<M>(
    engine: Arc<dyn TemplateEngine>,
    manipulation: Arc<M>,
    templates: Vec<PathBuf>,
    items: Vec<Renderable>,
) -> Action<String>
where
    M: Fn(Context) -> Context + Send + Sync + 'static,
{
    let dependencies: Vec<PathBuf> = items
        .iter()
        .flat_map(|item| item.dependencies().iter().cloned())
        .chain(templates.iter().cloned())
        .collect();

    let items = Arc::new(items);
    let templates = Arc::new(templates);
    Action::new(dependencies, move || {
        let engine = Arc::clone(&engine);
        let manipulation = Arc::clone(&manipulation);
        let items = Arc::clone(&items);
        let templates = Arc::clone(&templates);
        async move {
            let engine = engine.as_ref();
            let manipulation = manipulation.as_ref();
            let templates = templates.as_slice();

            // Items are forced concurrently; try_join_all keeps their order
            let rendered = try_join_all(
                items
                    .iter()
                    .map(|item| render_item(engine, manipulation, templates, item)),
            )
            .await?;

            tracing::debug!(items = rendered.len(), "Rendered listing body");
            Ok::<_, RenderError>(rendered.concat())
        }
    })
}

async fn render_item<M>(
    engine: &dyn TemplateEngine,
    manipulation: &M,
    templates: &[PathBuf],
    item: &Renderable,
) -> Result<String, RenderError>
where
    M: Fn(Context) -> Context,
{
    let context = manipulation(item.render().await?);
    apply_template_chain(engine, templates, context).await
}
