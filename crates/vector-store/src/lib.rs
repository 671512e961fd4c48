//! # Analyst Vector Store
//!
//! Embedded chunk storage and similarity retrieval for editor context.
//!
//! ## Architecture
//!
//! ```text
//! chunk text
//!     │
//!     ├──> EmbeddingProvider (Gemini / stub)
//!     │      └─> Vec<f32>
//!     │
//!     ├──> EmbeddingStore (ordered ChunkRecord[])
//!     │      └─> JSON snapshot (.analyst-cache/embeddings.json)
//!     │
//!     └──> Retriever
//!            └─> cosine × recency, stable top-K
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use analyst_vector_store::{EmbeddingProvider, EmbeddingStore, Retriever, StubEmbedder};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> analyst_vector_store::Result<()> {
//!     let store = EmbeddingStore::load_or_empty(".analyst-cache/embeddings.json").await;
//!     let query = StubEmbedder::default().embed("parse config").await?;
//!
//!     for chunk in Retriever::new(Arc::new(store)).retrieve(&query, 6)? {
//!         println!("{}: {:.3}", chunk.source_path, chunk.score);
//!     }
//!     Ok(())
//! }
//! ```

mod embeddings;
mod error;
mod gemini;
mod paths;
mod retriever;
mod similarity;
mod store;
mod types;

pub use embeddings::{EmbeddingMode, EmbeddingProvider, StubEmbedder, EMBEDDING_MODE_ENV};
pub use error::{Result, VectorStoreError};
pub use gemini::{GeminiConfig, GeminiEmbedder, DEFAULT_GEMINI_ENDPOINT, DEFAULT_GEMINI_MODEL};
pub use paths::{
    cache_dir_for_project_root, is_cache_dir_name, snapshot_path_for_project_root,
    CACHE_DIR_NAME, SNAPSHOT_FILE_NAME,
};
pub use retriever::{join_context, Retriever, CONTEXT_SEPARATOR, DEFAULT_TOP_K};
pub use similarity::{cosine_similarity, score, RecencyWeighting, ONE_DAY_MS};
pub use store::EmbeddingStore;
pub use types::{now_ms, ChunkRecord, RetrievedChunk};
