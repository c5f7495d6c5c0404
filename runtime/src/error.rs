//! Error type shared by the renderer and extraction layers.

use std::path::PathBuf;
use thiserror::Error;

/// Anything that can abort a single extraction run.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The target URL, or an image source joined onto it, is not a valid URL.
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The browser process could not be started.
    #[error("failed to launch browser: {0}")]
    Launch(String),

    /// Loading the page failed or timed out.
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// A CSS selector could not be parsed.
    #[error("invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },

    /// A selector or element read failed after the page loaded.
    #[error("query '{selector}' failed: {reason}")]
    Query { selector: String, reason: String },

    /// Opening or closing a page or the browser itself failed.
    #[error("browser error: {0}")]
    Browser(String),

    /// The offline HTML document could not be read.
    #[error("failed to read snapshot {}: {source}", path.display())]
    Snapshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExtractError {
    pub(crate) fn query(selector: &str, reason: impl ToString) -> Self {
        Self::Query {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
