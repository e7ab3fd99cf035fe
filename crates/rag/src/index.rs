//! Ephemeral retrieval index.
//!
//! Built fresh for one query from that query's documents and dropped with
//! it. Nothing is persisted or shared between requests.

use std::sync::Arc;

use sourcer_config::AppConfig;
use sourcer_core::document::{Chunk, Document};
use sourcer_core::error::{Error, Result};
use sourcer_core::provider::{EmbeddingRequest, Provider};
use tracing::{debug, info};

use crate::splitter::TextSplitter;
use crate::vector::top_k;

/// Chunks plus their embeddings, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    chunks: Vec<Chunk>,
    embeddings: Vec<Vec<f32>>,
}

impl VectorIndex {
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }
}

/// A retrieved chunk and its similarity to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// Splits documents, embeds chunks and answers nearest-neighbour queries.
pub struct RagEngine {
    embedder: Arc<dyn Provider>,
    model: String,
    splitter: TextSplitter,
    batch_size: usize,
    default_k: usize,
}

impl RagEngine {
    pub fn new(embedder: Arc<dyn Provider>, model: impl Into<String>, splitter: TextSplitter) -> Self {
        Self {
            embedder,
            model: model.into(),
            splitter,
            batch_size: 32,
            default_k: 3,
        }
    }

    /// Engine configured from `[rag]` and the provider's embedding model.
    pub fn from_config(embedder: Arc<dyn Provider>, config: &AppConfig) -> Self {
        Self::new(
            embedder,
            config.provider.embedding_model.clone(),
            TextSplitter::new(config.rag.chunk_size, config.rag.chunk_overlap),
        )
        .with_batch_size(config.rag.embed_batch_size)
        .with_default_k(config.rag.results)
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_default_k(mut self, k: usize) -> Self {
        self.default_k = k;
        self
    }

    /// How many chunks a search returns when the caller has no preference.
    pub fn default_k(&self) -> usize {
        self.default_k
    }

    /// Split every usable document into chunks. Error placeholders are skipped.
    pub fn split(&self, documents: &[Document]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        for doc in documents.iter().filter(|d| !d.is_error) {
            let source: Arc<str> = Arc::from(doc.source.as_str());
            for (chunk_index, content) in self.splitter.split(&doc.content).into_iter().enumerate() {
                chunks.push(Chunk {
                    content,
                    source: Arc::clone(&source),
                    chunk_index,
                    ordinal: chunks.len(),
                });
            }
        }
        chunks
    }

    /// Chunk and embed `documents` into a fresh index.
    pub async fn build_index(&self, documents: &[Document]) -> Result<VectorIndex> {
        let chunks = self.split(documents);
        if chunks.is_empty() {
            debug!("No indexable text, skipping embedding");
            return Ok(VectorIndex::default());
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            let vectors = self
                .embed(batch.to_vec())
                .await
                .map_err(|e| Error::Index(e.to_string()))?;
            if vectors.len() != batch.len() {
                return Err(Error::Index(format!(
                    "embedder returned {} vectors for {} chunks",
                    vectors.len(),
                    batch.len()
                )));
            }
            embeddings.extend(vectors);
        }

        info!(
            documents = documents.len(),
            chunks = chunks.len(),
            "Built retrieval index"
        );
        Ok(VectorIndex { chunks, embeddings })
    }

    /// The `k` chunks nearest to `query`, best first, ties in insertion order.
    ///
    /// Returns at most `min(k, index.len())` chunks; never calls the
    /// embedder when that is zero.
    pub async fn search(&self, index: &VectorIndex, query: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        let k = k.min(index.len());
        if k == 0 {
            return Ok(Vec::new());
        }

        let query_vector = self
            .embed(vec![query.to_string()])
            .await
            .map_err(|e| Error::Retrieval(e.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Retrieval("embedder returned no query vector".into()))?;

        Ok(top_k(&index.embeddings, &query_vector, k)
            .into_iter()
            .map(|(i, score)| ScoredChunk {
                chunk: index.chunks[i].clone(),
                score,
            })
            .collect())
    }

    async fn embed(&self, inputs: Vec<String>) -> std::result::Result<Vec<Vec<f32>>, sourcer_core::ProviderError> {
        let response = self
            .embedder
            .embed(EmbeddingRequest {
                model: self.model.clone(),
                inputs,
            })
            .await?;
        Ok(response.embeddings)
    }
}
