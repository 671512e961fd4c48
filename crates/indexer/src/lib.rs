//! # Analyst Indexer
//!
//! Builds and serves the project embedding index used as editor context.
//!
//! ## Pipeline
//!
//! ```text
//! Directory
//!     │
//!     ├──> File Scanner (.gitignore aware, extension allow-list)
//!     │      └─> Source files
//!     │
//!     ├──> Chunker (20-line windows, 10-line overlap)
//!     │      └─> Chunk text
//!     │
//!     ├──> EmbeddingProvider (one call at a time)
//!     │      └─> ChunkRecord[]
//!     │
//!     └──> EmbeddingStore::save
//!            └─> .analyst-cache/embeddings.json
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use analyst_indexer::{spawn_build, AnalystConfig, IndexBuilder, RetrievalSession};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> analyst_indexer::Result<()> {
//!     let root = std::path::Path::new("/path/to/project");
//!     let config = AnalystConfig::load(root)?;
//!     let provider = config.embedding.build_provider()?;
//!
//!     let builder = IndexBuilder::with_config(root, &config, provider.clone())?;
//!     let report = spawn_build(Arc::new(builder)).wait().await?;
//!     println!("{} chunks indexed", report.chunks);
//!
//!     let session = RetrievalSession::open(root).await;
//!     let context = session
//!         .context_for_text(provider.as_ref(), "selected code", config.retrieval.top_k)
//!         .await?;
//!     println!("{context}");
//!     Ok(())
//! }
//! ```

mod background;
mod builder;
mod config;
mod error;
mod index_lock;
mod scanner;
mod session;
mod stats;

pub use background::{spawn_build, BuildTask};
pub use builder::IndexBuilder;
pub use config::{
    AnalystConfig, EmbeddingSettings, RetrievalSettings, CONFIG_FILE_NAME, GEMINI_API_KEY_ENV,
    GEMINI_MODEL_ENV,
};
pub use error::{IndexerError, Result};
pub use scanner::{relative_source_path, FileScanner, ScanOptions};
pub use session::RetrievalSession;
pub use stats::BuildReport;
