//! Loading the site and writing a rendered page.

use anyhow::{Context as _, Result};
use clap::Args;
use quire_core::{
    render_chain, Action, Config, Context, FsPageReader, Renderable, Services, SiteUrlResolver,
};
use quire_render::FileTemplateEngine;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Options shared by every rendering command
#[derive(Args, Debug, Default)]
pub struct OutputArgs {
    /// Page templates applied to the final page, in order
    #[arg(short = 't', long = "template")]
    pub templates: Vec<PathBuf>,

    /// Write to this file, relative to the output directory, instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Emit the whole rendered context as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the dependency list instead of rendering
    #[arg(long)]
    pub deps: bool,
}

/// Configuration plus the collaborators it selects
pub struct Site {
    pub config: Config,
    pub services: Services,
}

impl Site {
    pub fn load(config_path: &Path) -> Result<Self> {
        tracing::debug!("Loading config from {:?}", config_path);
        let config =
            Config::load_or_default(config_path).context("Failed to load configuration")?;

        let services = Services::new(
            Arc::new(FsPageReader::new().with_markdown(config.markdown)),
            Arc::new(SiteUrlResolver::new(config.content_dir(), &config.base_url)),
            Arc::new(FileTemplateEngine::new()),
        );

        Ok(Self { config, services })
    }

    pub fn template_paths(&self, names: &[PathBuf]) -> Vec<PathBuf> {
        names
            .iter()
            .map(|name| self.config.template_path(name))
            .collect()
    }

    /// Site-wide fields as a URL-less fragment.
    ///
    /// Depends on the config file when one was loaded, since it also decides
    /// page URLs.
    pub fn fragment(&self) -> Renderable {
        let fields: Context = self.config.site.fields().into_iter().collect();
        let config_file = self.config.path().map(Path::to_path_buf);
        Renderable::from_action(Action::pure(fields).depends_on(config_file))
    }
}

/// Wrap `renderable` in the page templates, then print or write it
pub async fn emit(site: &Site, renderable: &Renderable, args: &OutputArgs) -> Result<()> {
    let output = args.output.as_ref().map(|path| site.config.output_dir().join(path));
    let page = render_chain(
        &site.services,
        site.template_paths(&args.templates),
        renderable,
    );

    if args.deps {
        let text = if args.json {
            serde_json::to_string_pretty(page.dependencies())?
        } else {
            page.dependencies()
                .iter()
                .map(|path| path.display().to_string())
                .collect::<Vec<_>>()
                .join("\n")
        };
        return write_output(output.as_deref(), &text);
    }

    let url = page
        .resolve_url()
        .await
        .context("Failed to resolve page URL")?;
    let context = page.render().await.context("Failed to render page")?;

    let text = if args.json {
        serde_json::to_string_pretty(&context)?
    } else {
        context.get("body").unwrap_or_default().to_string()
    };

    match &url {
        Some(url) => tracing::info!(
            "Rendered {} ({} dependencies)",
            url,
            page.dependencies().len()
        ),
        None => tracing::info!("Rendered page without a URL"),
    }

    write_output(output.as_deref(), &text)
}

fn write_output(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {:?}", parent))?;
            }
            fs::write(path, text).with_context(|| format!("Failed to write {:?}", path))?;
            tracing::info!("Wrote {:?}", path);
        }
        None => println!("{}", text),
    }
    Ok(())
}
