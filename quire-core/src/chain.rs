//! Template chaining.
//!
//! Templates are applied in order. Each one sees the context with `"body"`
//! bound to the previous template's output, so a layout template can wrap
//! whatever an inner template produced.

use crate::action::Action;
use crate::error::RenderError;
use crate::renderable::Renderable;
use crate::services::{Services, TemplateEngine};
use quire_types::{Context, BODY_KEY};
use std::path::PathBuf;
use std::sync::Arc;

/// Run `templates` over `context`, rebinding `"body"` after each step
pub async fn chain_context(
    engine: &dyn TemplateEngine,
    templates: &[PathBuf],
    mut context: Context,
) -> Result<Context, RenderError> {
    for template in templates {
        tracing::debug!(template = %template.display(), "Applying template");
        let output = engine.apply_template(template, &context).await?;
        context.insert(BODY_KEY, output);
    }
    Ok(context)
}

/// Run `templates` over `context` and return the final text.
///
/// With no templates this is the context's own `"body"`, or `""`.
pub async fn apply_template_chain(
    engine: &dyn TemplateEngine,
    templates: &[PathBuf],
    context: Context,
) -> Result<String, RenderError> {
    let mut context = chain_context(engine, templates, context).await?;
    Ok(context.remove(BODY_KEY).unwrap_or_default())
}

/// Push a renderable through a sequence of templates.
///
/// The result keeps the renderable's URL, depends on its dependencies
/// followed by the template paths, and renders to the renderable's context
/// with `"body"` replaced by the chain's output.
pub fn render_chain(
    services: &Services,
    templates: Vec<PathBuf>,
    renderable: &Renderable,
) -> Renderable {
    let engine = Arc::clone(services.templates());
    let templates = Arc::new(templates);
    let inner = renderable.as_action();
    let dependencies: Vec<PathBuf> = inner
        .dependencies()
        .iter()
        .chain(templates.iter())
        .cloned()
        .collect();

    let render = Action::new(dependencies, move || {
        let engine = Arc::clone(&engine);
        let templates = Arc::clone(&templates);
        let inner = inner.clone();
        async move {
            let context = inner.run().await?;
            chain_context(engine.as_ref(), &templates, context).await
        }
    });

    Renderable::assemble(renderable.url_action().cloned(), render)
}
