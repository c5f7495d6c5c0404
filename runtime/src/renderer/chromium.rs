//! Headless Chromium backend over the Chrome DevTools Protocol.

use super::{ElementHandle, NavigationResult, RenderContext, Renderer};
use crate::error::{ExtractError, Result};
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Element, Page};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Default navigation and CDP request timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// How to launch the browser.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Explicit Chromium/Chrome executable. Discovered when `None`.
    pub chromium_path: Option<PathBuf>,
    /// Pass `--no-sandbox` to Chromium.
    pub no_sandbox: bool,
    /// Upper bound on page load.
    pub navigation_timeout: Duration,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            chromium_path: None,
            no_sandbox: false,
            navigation_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

/// A running headless Chromium plus the task driving its CDP connection.
pub struct ChromiumRenderer {
    browser: Browser,
    handler: JoinHandle<()>,
    navigation_timeout: Duration,
}

impl ChromiumRenderer {
    /// Launch headless Chromium.
    pub async fn launch(options: &BrowserOptions) -> Result<Self> {
        let mut builder = BrowserConfig::builder().request_timeout(options.navigation_timeout);

        // 1. Executable: explicit path, else discovery, else chromiumoxide's own lookup
        match options.chromium_path.clone().or_else(find_chromium) {
            Some(path) => {
                debug!("using chromium at {}", path.display());
                builder = builder.chrome_executable(path);
            }
            None => debug!("no chromium found, falling back to chromiumoxide detection"),
        }

        // 2. Sandbox off when asked or inside a container
        if options.no_sandbox || is_docker() {
            builder = builder.no_sandbox();
        }

        // 3. Launch and keep the CDP connection pumping
        let config = builder.build().map_err(ExtractError::Launch)?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ExtractError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("cdp handler: {e}");
                }
            }
        });

        info!("launched headless chromium");

        Ok(Self {
            browser,
            handler,
            navigation_timeout: options.navigation_timeout,
        })
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn new_context(&mut self) -> Result<Box<dyn RenderContext>> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| ExtractError::Browser(format!("opening page: {e}")))?;

        Ok(Box::new(ChromiumContext {
            page,
            navigation_timeout: self.navigation_timeout,
        }))
    }

    async fn close(&mut self) -> Result<()> {
        let closed = self
            .browser
            .close()
            .await
            .map_err(|e| ExtractError::Browser(format!("closing browser: {e}")));

        if let Err(e) = self.browser.wait().await {
            warn!("waiting for chromium to exit: {e}");
        }
        self.handler.abort();

        closed.map(|_| ())
    }
}

/// One Chromium tab.
struct ChromiumContext {
    page: Page,
    navigation_timeout: Duration,
}

#[async_trait]
impl RenderContext for ChromiumContext {
    async fn navigate(&mut self, url: &str) -> Result<NavigationResult> {
        let start = Instant::now();
        let navigation_error = |reason: String| ExtractError::Navigation {
            url: url.to_string(),
            reason,
        };

        tokio::time::timeout(self.navigation_timeout, self.page.goto(url))
            .await
            .map_err(|_| {
                navigation_error(format!(
                    "timed out after {}ms",
                    self.navigation_timeout.as_millis()
                ))
            })?
            .map_err(|e| navigation_error(e.to_string()))?;

        let final_url = self
            .page
            .url()
            .await
            .map_err(|e| navigation_error(e.to_string()))?
            .unwrap_or_else(|| url.to_string());

        Ok(NavigationResult {
            final_url,
            load_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<Box<dyn ElementHandle>>> {
        let elements = self
            .page
            .find_elements(selector)
            .await
            .map_err(|e| ExtractError::query(selector, e))?;

        Ok(elements
            .into_iter()
            .map(|element| {
                Box::new(ChromiumElement {
                    element,
                    selector: selector.to_string(),
                }) as Box<dyn ElementHandle>
            })
            .collect())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.page
            .close()
            .await
            .map_err(|e| ExtractError::Browser(format!("closing page: {e}")))
    }
}

struct ChromiumElement {
    element: Element,
    selector: String,
}

#[async_trait]
impl ElementHandle for ChromiumElement {
    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        self.element
            .attribute(name)
            .await
            .map_err(|e| ExtractError::query(&self.selector, e))
    }

    async fn text_content(&self) -> Result<String> {
        let text = self
            .element
            .string_property("textContent")
            .await
            .map_err(|e| ExtractError::query(&self.selector, e))?;
        Ok(text.unwrap_or_default())
    }
}

/// Locate a Chromium executable on this machine.
pub fn find_chromium() -> Option<PathBuf> {
    // 1. Per-user install under ~/.page-extract/chromium/
    if let Some(home) = dirs::home_dir() {
        let candidates = [
            home.join(".page-extract/chromium/chrome"),
            home.join(".page-extract/chromium/chrome-linux64/chrome"),
        ];
        if let Some(found) = candidates.into_iter().find(|c| c.exists()) {
            return Some(found);
        }
    }

    // 2. System PATH
    for name in ["google-chrome", "chromium", "chromium-browser", "chrome"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    // 3. Common macOS location
    if cfg!(target_os = "macos") {
        let common = Path::new("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common.to_path_buf());
        }
    }

    None
}

/// Chromium's sandbox does not start inside most containers.
fn is_docker() -> bool {
    Path::new("/.dockerenv").exists()
        || std::fs::read_to_string("/proc/1/cgroup")
            .map(|s| s.contains("docker") || s.contains("containerd"))
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = BrowserOptions::default();
        assert!(options.chromium_path.is_none());
        assert!(!options.no_sandbox);
        assert_eq!(options.navigation_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_find_chromium_returns_existing_path() {
        if let Some(path) = find_chromium() {
            assert!(path.exists());
        }
    }

    const DATA_PAGE: &str = "data:text/html,<h1 id='t'>Hello</h1><a href='tel:0298524000'>call</a>";

    #[tokio::test]
    #[ignore = "needs a local Chromium"]
    async fn test_live_launch_navigate_and_close() {
        let mut renderer = ChromiumRenderer::launch(&BrowserOptions::default())
            .await
            .unwrap();
        let mut context = renderer.new_context().await.unwrap();

        context.navigate(DATA_PAGE).await.unwrap();

        let headings = context.query_all("h1").await.unwrap();
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].text_content().await.unwrap(), "Hello");
        assert_eq!(headings[0].attribute("id").await.unwrap().as_deref(), Some("t"));
        assert_eq!(headings[0].attribute("class").await.unwrap(), None);
        assert!(context.query_all("footer").await.unwrap().is_empty());

        context.close().await.unwrap();
        renderer.close().await.unwrap();
    }

    #[tokio::test]
    #[ignore = "needs a local Chromium"]
    async fn test_live_navigation_timeout_is_navigation_error() {
        let mut renderer = ChromiumRenderer::launch(&BrowserOptions::default())
            .await
            .unwrap();
        renderer.navigation_timeout = Duration::ZERO;
        let mut context = renderer.new_context().await.unwrap();

        let err = context.navigate(DATA_PAGE).await.err().unwrap();
        assert!(
            matches!(&err, ExtractError::Navigation { reason, .. } if reason.starts_with("timed out")),
            "unexpected error: {err}"
        );

        context.close().await.unwrap();
        renderer.close().await.unwrap();
    }
}
