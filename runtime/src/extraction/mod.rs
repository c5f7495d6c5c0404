//! Extraction queries and the normalization applied to their results.

pub mod bounded;
pub mod extractor;
pub mod normalize;
