//! page-extract: pull banner images, headings, phone numbers, addresses and
//! copyright notices out of a single web page.
//!
//! The library splits into a browser capability ([`renderer`]), the
//! extraction logic built on it ([`extraction`]), and the command-line
//! surface ([`cli`]).

pub mod cli;
pub mod error;
pub mod extraction;
pub mod renderer;

pub use error::{ExtractError, Result};
pub use extraction::extractor::{ContactInfo, ExtractionResult, PageExtractor};
