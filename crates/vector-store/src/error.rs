use thiserror::Error;

pub type Result<T> = std::result::Result<T, VectorStoreError>;

#[derive(Error, Debug)]
pub enum VectorStoreError {
    #[error("Embedding provider error: {0}")]
    Embedding(String),

    #[error("Corrupt cache: {0}")]
    CorruptCache(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid vector: {0}")]
    InvalidVector(String),

    #[error("Empty chunk text from {path}")]
    EmptyChunk { path: String },
}

impl VectorStoreError {
    pub fn embedding(msg: impl Into<String>) -> Self {
        Self::Embedding(msg.into())
    }

    pub fn corrupt_cache(msg: impl Into<String>) -> Self {
        Self::CorruptCache(msg.into())
    }
}
