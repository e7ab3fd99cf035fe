//! Retrieval for Sourcer: text splitting, cosine similarity and the
//! per-query [`VectorIndex`].

pub mod index;
pub mod splitter;
pub mod vector;

pub use index::{RagEngine, ScoredChunk, VectorIndex};
pub use splitter::TextSplitter;
pub use vector::cosine_similarity;
