//! Single-page extraction: banner images, headings, phone numbers,
//! addresses and footer copyright notices.

use super::bounded::map_ordered;
use super::normalize;
use crate::error::{ExtractError, Result};
use crate::renderer::{RenderContext, Renderer};
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

/// Page used when no URL is given.
pub const DEFAULT_URL: &str = "https://westernsydney.edu.au";

/// Default number of in-flight element reads per category.
pub const DEFAULT_CONCURRENCY: usize = 16;

const BANNER_IMAGE_SELECTOR: &str = "div.image.slide_img img";
const HEADING_SELECTOR: &str = "h1";
const PHONE_LINK_SELECTOR: &str = r#"a[href^="tel:"]"#;
const ADDRESS_SELECTOR: &str = "address";
const FOOTER_SELECTOR: &str = "footer";

/// Everything extracted from one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// The URL as requested.
    pub url: String,
    /// Absolute carousel image URLs, in document order.
    pub banner_images: Vec<String>,
    /// Non-empty `h1` texts.
    pub h1_headers: Vec<String>,
    pub contact_info: ContactInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactInfo {
    /// Digits-only phone numbers from `tel:` links.
    pub contact: Vec<String>,
    /// Whitespace-collapsed postal addresses.
    pub address: Vec<String>,
    /// Copyright notices found in the footer, verbatim.
    pub footer: Vec<String>,
}

/// Parse the target URL. Also the base for relative image sources.
pub fn parse_target(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|source| ExtractError::InvalidUrl {
        url: url.to_string(),
        source,
    })
}

/// Runs the five extraction queries against one page.
#[derive(Debug, Clone)]
pub struct PageExtractor {
    concurrency: usize,
}

impl Default for PageExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_CONCURRENCY)
    }
}

impl PageExtractor {
    /// `concurrency` bounds the element reads in flight; zero is treated as one.
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    /// Open a page on `renderer`, extract from `url`, and close the page
    /// whether or not extraction succeeded.
    pub async fn run(&self, renderer: &mut dyn Renderer, url: &str) -> Result<ExtractionResult> {
        let mut context = renderer.new_context().await?;
        let extracted = self.extract(context.as_mut(), url).await;
        let closed = context.close().await;

        match (extracted, closed) {
            (Ok(result), Ok(())) => Ok(result),
            (Ok(result), Err(e)) => {
                warn!("closing page after extraction: {e}");
                Ok(result)
            }
            (Err(e), closed) => {
                if let Err(close_err) = closed {
                    warn!("closing page after failure: {close_err}");
                }
                Err(e)
            }
        }
    }

    /// Navigate `context` to `url` and extract from the loaded page.
    pub async fn extract(
        &self,
        context: &mut dyn RenderContext,
        url: &str,
    ) -> Result<ExtractionResult> {
        let base = parse_target(url)?;

        let nav = context.navigate(url).await?;
        info!(
            final_url = %nav.final_url,
            load_time_ms = nav.load_time_ms,
            "page loaded"
        );

        let context: &dyn RenderContext = context;

        let banner_images = self.banner_images(context, &base).await?;
        let h1_headers = self
            .text_contents(context, HEADING_SELECTOR)
            .await?
            .iter()
            .filter_map(|text| normalize::heading(text))
            .collect::<Vec<_>>();
        let contact = self.phone_numbers(context).await?;
        let address = self
            .text_contents(context, ADDRESS_SELECTOR)
            .await?
            .iter()
            .filter_map(|text| normalize::address(text))
            .collect::<Vec<_>>();
        let footer_text = normalize::footer_text(&self.text_contents(context, FOOTER_SELECTOR).await?);
        let footer = normalize::copyright_notices(&footer_text);

        debug!(
            banner_images = banner_images.len(),
            h1_headers = h1_headers.len(),
            contact = contact.len(),
            address = address.len(),
            footer = footer.len(),
            "extraction complete"
        );

        Ok(ExtractionResult {
            url: url.to_string(),
            banner_images,
            h1_headers,
            contact_info: ContactInfo {
                contact,
                address,
                footer,
            },
        })
    }

    async fn banner_images(&self, context: &dyn RenderContext, base: &Url) -> Result<Vec<String>> {
        let images = context.query_all(BANNER_IMAGE_SELECTOR).await?;
        let sources = map_ordered(images, self.concurrency, |img| async move {
            let src = img.attribute("src").await?.filter(|s| !s.is_empty());
            let data_src = match src {
                Some(_) => None,
                None => img.attribute("data-src").await?,
            };
            Ok::<_, ExtractError>(normalize::image_source(src, data_src))
        })
        .await?;

        sources
            .into_iter()
            .flatten()
            .map(|src| {
                normalize::resolve_image_url(base, &src)
                    .map_err(|source| ExtractError::InvalidUrl { url: src, source })
            })
            .collect()
    }

    async fn phone_numbers(&self, context: &dyn RenderContext) -> Result<Vec<String>> {
        let links = context.query_all(PHONE_LINK_SELECTOR).await?;
        let hrefs = map_ordered(links, self.concurrency, |link| async move {
            link.attribute("href").await
        })
        .await?;

        Ok(hrefs
            .into_iter()
            .flatten()
            .filter_map(|href| normalize::phone_digits(&href))
            .collect())
    }

    async fn text_contents(&self, context: &dyn RenderContext, selector: &str) -> Result<Vec<String>> {
        let elements = context.query_all(selector).await?;
        map_ordered(elements, self.concurrency, |element| async move {
            element.text_content().await
        })
        .await
    }
}
