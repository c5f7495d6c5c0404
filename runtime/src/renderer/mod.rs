//! Browser-automation capability consumed by the extractor.
//!
//! The extractor only needs four primitives: launch/close a browser, open
//! and navigate a page, locate elements by CSS selector, and read attributes
//! or text from them. Each backend implements these three traits.

pub mod chromium;
pub mod snapshot;

use crate::error::Result;
use async_trait::async_trait;

/// Outcome of loading a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationResult {
    /// URL after redirects.
    pub final_url: String,
    /// Wall-clock time spent loading, in milliseconds.
    pub load_time_ms: u64,
}

/// A browser instance that can hand out pages.
#[async_trait]
pub trait Renderer: Send {
    /// Open a fresh page.
    async fn new_context(&mut self) -> Result<Box<dyn RenderContext>>;

    /// Shut the browser down. Called exactly once, on every exit path.
    async fn close(&mut self) -> Result<()>;
}

/// One open page.
#[async_trait]
pub trait RenderContext: Send + Sync {
    /// Load `url` and wait for the page to finish loading.
    async fn navigate(&mut self, url: &str) -> Result<NavigationResult>;

    /// All elements matching `selector`, in document order. No match is an
    /// empty vector, not an error.
    async fn query_all(&self, selector: &str) -> Result<Vec<Box<dyn ElementHandle>>>;

    /// Release the page.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// A located DOM element.
#[async_trait]
pub trait ElementHandle: Send + Sync {
    /// Attribute value, or `None` when the attribute is absent.
    async fn attribute(&self, name: &str) -> Result<Option<String>>;

    /// The element's `textContent`; empty when it has none.
    async fn text_content(&self) -> Result<String>;
}
