use crate::error::Result;
use analyst_vector_store::{
    join_context, snapshot_path_for_project_root, EmbeddingProvider, EmbeddingStore,
    RetrievedChunk, Retriever,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Read-only view of one project's snapshot for the lifetime of an editor
/// session.
///
/// Opening never fails: a missing or unreadable snapshot gives an empty
/// session, and every query then returns no context.
#[derive(Debug, Clone)]
pub struct RetrievalSession {
    snapshot_path: PathBuf,
    retriever: Retriever,
}

impl RetrievalSession {
    pub async fn open(root: impl AsRef<Path>) -> Self {
        Self::open_snapshot(snapshot_path_for_project_root(root.as_ref())).await
    }

    pub async fn open_snapshot(snapshot_path: impl Into<PathBuf>) -> Self {
        let snapshot_path = snapshot_path.into();
        let store = EmbeddingStore::load_or_empty(&snapshot_path).await;
        Self {
            retriever: Retriever::new(Arc::new(store)),
            snapshot_path,
        }
    }

    #[must_use]
    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    #[must_use]
    pub fn store(&self) -> &EmbeddingStore {
        self.retriever.store()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.store().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store().is_empty()
    }

    /// Pick up a snapshot written after the session was opened
    pub async fn reload(&mut self) {
        let store = EmbeddingStore::load_or_empty(&self.snapshot_path).await;
        self.retriever = Retriever::new(Arc::new(store));
    }

    /// Top `k` chunks for an already-embedded query
    pub fn retrieve(&self, query: &[f32], k: usize) -> Result<Vec<RetrievedChunk>> {
        Ok(self.retriever.retrieve(query, k)?)
    }

    /// Embed `text` and retrieve for it. A failed query embedding yields no
    /// context rather than an error.
    pub async fn retrieve_for_text(
        &self,
        provider: &dyn EmbeddingProvider,
        text: &str,
        k: usize,
    ) -> Result<Vec<RetrievedChunk>> {
        if k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }
        let query = match provider.embed(text).await {
            Ok(query) => query,
            Err(err) => {
                log::warn!("Query embedding failed, continuing without context: {err}");
                return Ok(Vec::new());
            }
        };
        self.retrieve(&query, k)
    }

    /// Annotated context block for `text`, empty when nothing matches
    pub async fn context_for_text(
        &self,
        provider: &dyn EmbeddingProvider,
        text: &str,
        k: usize,
    ) -> Result<String> {
        let chunks = self.retrieve_for_text(provider, text, k).await?;
        Ok(join_context(&chunks))
    }
}
