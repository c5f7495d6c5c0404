//! `page-extract [URL]`: extract from one page and print the result.

use crate::cli::{output, Cli};
use crate::extraction::extractor::{parse_target, ExtractionResult, PageExtractor};
use crate::renderer::chromium::ChromiumRenderer;
use crate::renderer::snapshot::SnapshotRenderer;
use crate::renderer::Renderer;
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Run the extract command.
pub async fn run(cli: &Cli) -> Result<()> {
    let result = execute(cli).await?;
    output::print_json(&result)
}

/// Extract from `cli.url`, releasing the browser before returning.
pub async fn execute(cli: &Cli) -> Result<ExtractionResult> {
    parse_target(&cli.url)?;

    let mut renderer: Box<dyn Renderer> = match &cli.snapshot {
        Some(path) => {
            info!("reading {} instead of launching a browser", path.display());
            Box::new(SnapshotRenderer::from_file(path).await?)
        }
        None => Box::new(
            ChromiumRenderer::launch(&cli.browser_options())
                .await
                .context("launching browser")?,
        ),
    };

    let extracted = PageExtractor::new(cli.concurrency)
        .run(renderer.as_mut(), &cli.url)
        .await;

    if let Err(e) = renderer.close().await {
        warn!("closing browser: {e}");
    }

    extracted.with_context(|| format!("extracting from {}", cli.url))
}
