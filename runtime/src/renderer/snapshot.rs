//! Offline backend that evaluates selectors against a saved HTML document.
//!
//! Nothing is fetched: `navigate` only records the URL, so relative image
//! sources still resolve against the URL given on the command line.

use super::{ElementHandle, NavigationResult, RenderContext, Renderer};
use crate::error::{ExtractError, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Renderer serving one fixed HTML document to every page it opens.
pub struct SnapshotRenderer {
    html: Arc<str>,
}

impl SnapshotRenderer {
    /// Serve `html` directly.
    pub fn from_html(html: impl Into<String>) -> Self {
        Self {
            html: Arc::from(html.into()),
        }
    }

    /// Read the document from disk.
    pub async fn from_file(path: &Path) -> Result<Self> {
        let html = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ExtractError::Snapshot {
                path: path.to_path_buf(),
                source,
            })?;
        debug!("loaded snapshot {} ({} bytes)", path.display(), html.len());
        Ok(Self::from_html(html))
    }
}

#[async_trait]
impl Renderer for SnapshotRenderer {
    async fn new_context(&mut self) -> Result<Box<dyn RenderContext>> {
        Ok(Box::new(SnapshotContext {
            html: Arc::clone(&self.html),
        }))
    }

    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

struct SnapshotContext {
    html: Arc<str>,
}

#[async_trait]
impl RenderContext for SnapshotContext {
    async fn navigate(&mut self, url: &str) -> Result<NavigationResult> {
        Ok(NavigationResult {
            final_url: url.to_string(),
            load_time_ms: 0,
        })
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<Box<dyn ElementHandle>>> {
        let elements = select(&self.html, selector)?;
        Ok(elements
            .into_iter()
            .map(|e| Box::new(e) as Box<dyn ElementHandle>)
            .collect())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

/// Owned copy of a matched element. `scraper` trees are not `Send`, so
/// everything the extractor may ask for is captured up front.
#[derive(Debug, Clone)]
struct SnapshotElement {
    attributes: HashMap<String, String>,
    text: String,
}

#[async_trait]
impl ElementHandle for SnapshotElement {
    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(self.attributes.get(name).cloned())
    }

    async fn text_content(&self) -> Result<String> {
        Ok(self.text.clone())
    }
}

fn select(html: &str, selector: &str) -> Result<Vec<SnapshotElement>> {
    let parsed = Selector::parse(selector).map_err(|e| ExtractError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })?;

    let document = Html::parse_document(html);
    Ok(document
        .select(&parsed)
        .map(|element| SnapshotElement {
            attributes: element
                .value()
                .attrs()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            text: element.text().collect(),
        })
        .collect())
}
