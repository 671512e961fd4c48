//! # Analyst Code Chunker
//!
//! Line-window chunking of source files for embedding and retrieval.
//!
//! A file is split on `\n` and cut into windows of `window_lines` lines. Each
//! window starts `window_lines - overlap_lines` lines after the previous one,
//! so neighbouring chunks share `overlap_lines` lines of context. The last
//! window always reaches the end of the file.
//!
//! ```text
//! lines  0 ─────────── 19
//!                  10 ─────────── 24
//!        └ chunk 1 ┘   └ chunk 2 ┘      (window 20, overlap 10)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use analyst_code_chunker::{Chunker, ChunkerConfig};
//!
//! let chunker = Chunker::new(ChunkerConfig::default()).unwrap();
//! let code = (1..=25).map(|n| format!("line {n}")).collect::<Vec<_>>().join("\n");
//!
//! let chunks = chunker.chunk_spans(&code);
//! assert_eq!(chunks.len(), 2);
//! assert_eq!((chunks[1].start_line, chunks[1].end_line), (11, 25));
//! ```

mod chunker;
mod config;
mod error;
mod types;

pub use chunker::{chunk_lines, Chunker};
pub use config::ChunkerConfig;
pub use error::{ChunkerError, Result};
pub use types::LineChunk;
