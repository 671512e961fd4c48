use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// One embedded chunk of a source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Originating file, relative to the project root
    pub source_path: String,
    /// Literal chunk text
    pub text: String,
    pub vector: Vec<f32>,
    /// When the embedding was computed (ms since the Unix epoch)
    pub created_at_ms: u64,
}

impl ChunkRecord {
    #[must_use]
    pub fn new(source_path: impl Into<String>, text: impl Into<String>, vector: Vec<f32>) -> Self {
        Self::with_timestamp(source_path, text, vector, now_ms())
    }

    #[must_use]
    pub fn with_timestamp(
        source_path: impl Into<String>,
        text: impl Into<String>,
        vector: Vec<f32>,
        created_at_ms: u64,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            text: text.into(),
            vector,
            created_at_ms,
        }
    }
}

/// A record selected by the retriever, with its final score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedChunk {
    pub source_path: String,
    pub text: String,
    pub score: f32,
}

impl RetrievedChunk {
    /// Chunk text prefixed with a `// <file>` marker line
    #[must_use]
    pub fn annotated(&self) -> String {
        format!("// {}\n{}", self.source_path, self.text)
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch
#[must_use]
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
