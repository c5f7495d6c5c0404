//! Command-line surface for the `page-extract` binary.

pub mod extract_cmd;
pub mod output;

use crate::extraction::extractor::{DEFAULT_CONCURRENCY, DEFAULT_URL};
use crate::renderer::chromium::{BrowserOptions, DEFAULT_TIMEOUT_MS};
use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;

/// Extract banner images, headings, phone numbers, addresses and copyright
/// notices from a single page and print them as JSON.
#[derive(Debug, Clone, Parser)]
#[command(name = "page-extract", version, about)]
pub struct Cli {
    /// Page to extract from.
    #[arg(default_value = DEFAULT_URL)]
    pub url: String,

    /// Chromium or Chrome executable to launch.
    #[arg(long, env = "PAGE_EXTRACT_CHROMIUM_PATH", value_name = "PATH")]
    pub chromium_path: Option<PathBuf>,

    /// Launch Chromium without its sandbox (needed in most containers).
    #[arg(
        long,
        env = "PAGE_EXTRACT_NO_SANDBOX",
        value_parser = FalseyValueParser::new()
    )]
    pub no_sandbox: bool,

    /// Give up on page load after this many milliseconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS, value_name = "MS")]
    pub timeout_ms: u64,

    /// Maximum element reads in flight per category.
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY, value_name = "N")]
    pub concurrency: usize,

    /// Read the page from a saved HTML file instead of launching a browser.
    #[arg(long, value_name = "FILE")]
    pub snapshot: Option<PathBuf>,

    /// Log more to stderr (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Browser launch settings from the parsed flags.
    pub fn browser_options(&self) -> BrowserOptions {
        BrowserOptions {
            chromium_path: self.chromium_path.clone(),
            no_sandbox: self.no_sandbox,
            navigation_timeout: Duration::from_millis(self.timeout_ms),
        }
    }

    /// Default tracing directive for the chosen verbosity.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "page_extract=warn",
            1 => "page_extract=info",
            _ => "page_extract=debug",
        }
    }
}
