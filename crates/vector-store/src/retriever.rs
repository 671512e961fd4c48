use crate::error::{Result, VectorStoreError};
use crate::similarity::RecencyWeighting;
use crate::store::EmbeddingStore;
use crate::types::{now_ms, RetrievedChunk};
use std::cmp::Ordering;
use std::sync::Arc;

/// Number of chunks handed to the prompt when the caller does not say
pub const DEFAULT_TOP_K: usize = 6;

/// Separator placed between annotated chunks in a prompt context block
pub const CONTEXT_SEPARATOR: &str = "\n---\n";

/// Brute-force top-K search over a read-only store snapshot
#[derive(Debug, Clone)]
pub struct Retriever {
    store: Arc<EmbeddingStore>,
    weighting: RecencyWeighting,
}

impl Retriever {
    #[must_use]
    pub fn new(store: Arc<EmbeddingStore>) -> Self {
        Self {
            store,
            weighting: RecencyWeighting::default(),
        }
    }

    #[must_use]
    pub const fn with_weighting(mut self, weighting: RecencyWeighting) -> Self {
        self.weighting = weighting;
        self
    }

    #[must_use]
    pub fn store(&self) -> &EmbeddingStore {
        &self.store
    }

    /// Top `k` chunks for `query`, best first
    pub fn retrieve(&self, query: &[f32], k: usize) -> Result<Vec<RetrievedChunk>> {
        self.retrieve_at(query, k, now_ms())
    }

    /// Like [`Retriever::retrieve`] with an explicit clock
    pub fn retrieve_at(&self, query: &[f32], k: usize, now_ms: u64) -> Result<Vec<RetrievedChunk>> {
        if k == 0 || self.store.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(expected) = self.store.dimension() {
            if query.len() != expected {
                return Err(VectorStoreError::DimensionMismatch {
                    expected,
                    actual: query.len(),
                });
            }
        }

        let mut scored = Vec::with_capacity(self.store.len());
        for (idx, record) in self.store.iter().enumerate() {
            scored.push((idx, self.weighting.score(query, record, now_ms)?));
        }

        // `sort_by` is stable: equal scores keep insertion order.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(k);

        let records = self.store.records();
        let results = scored
            .into_iter()
            .map(|(idx, score)| {
                let record = &records[idx];
                RetrievedChunk {
                    source_path: record.source_path.clone(),
                    text: record.text.clone(),
                    score,
                }
            })
            .collect::<Vec<_>>();

        log::debug!(
            "Retrieved {} of {} chunks (k = {k})",
            results.len(),
            self.store.len()
        );
        Ok(results)
    }

    /// Top `k` chunk texts, best first
    pub fn retrieve_texts(&self, query: &[f32], k: usize) -> Result<Vec<String>> {
        Ok(self
            .retrieve(query, k)?
            .into_iter()
            .map(|chunk| chunk.text)
            .collect())
    }
}

/// Render retrieved chunks as one context block for a prompt
#[must_use]
pub fn join_context(chunks: &[RetrievedChunk]) -> String {
    chunks
        .iter()
        .map(RetrievedChunk::annotated)
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}
