//! Relevance classification and version-range normalization.
//!
//! Per record: classify, extract raw version tokens, deduplicate, then
//! canonicalize each token into an output row.

pub mod canonicalizer;
pub mod classifier;
pub mod emitter;
pub mod extractor;
pub mod normalizer;

pub use emitter::RecordEmitter;
