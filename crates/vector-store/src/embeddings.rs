use crate::error::{Result, VectorStoreError};
use async_trait::async_trait;
use std::env;
use std::fmt;
use std::str::FromStr;

pub const EMBEDDING_MODE_ENV: &str = "ANALYST_EMBEDDING_MODE";

/// Source of embedding vectors for chunk text and queries.
///
/// Every call may fail; callers decide whether a failure skips a chunk or
/// aborts the operation.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Stable identifier for logs and reports
    fn name(&self) -> &str;

    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EmbeddingMode {
    Gemini,
    Stub,
}

impl EmbeddingMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Stub => "stub",
        }
    }

    /// Mode from `ANALYST_EMBEDDING_MODE`, `None` when unset
    pub fn from_env() -> Result<Option<Self>> {
        match env::var(EMBEDDING_MODE_ENV) {
            Ok(raw) if !raw.trim().is_empty() => raw.parse().map(Some),
            _ => Ok(None),
        }
    }
}

impl FromStr for EmbeddingMode {
    type Err = VectorStoreError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "stub" => Ok(Self::Stub),
            other => Err(VectorStoreError::embedding(format!(
                "Unsupported embedding mode '{other}' (expected 'gemini' or 'stub')"
            ))),
        }
    }
}

impl fmt::Display for EmbeddingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Offline provider: hashes word tokens into a fixed number of buckets.
///
/// Texts sharing identifiers land near each other, which is enough for
/// tests and for running without network access.
#[derive(Clone, Debug)]
pub struct StubEmbedder {
    dimension: usize,
}

impl StubEmbedder {
    pub const DEFAULT_DIMENSION: usize = 64;

    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    #[must_use]
    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        stub_embed(text, self.dimension)
    }
}

impl Default for StubEmbedder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIMENSION)
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    fn name(&self) -> &str {
        "stub"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }
}

fn stub_embed(text: &str, dimension: usize) -> Vec<f32> {
    let mut vec = vec![0.0f32; dimension];
    let tokens = text
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|token| !token.is_empty());

    for token in tokens {
        let mut state = fnv1a_64(token.to_lowercase().as_bytes());
        let bits = splitmix64(&mut state);
        #[allow(clippy::cast_possible_truncation)]
        let bucket = (bits % dimension as u64) as usize;
        let sign = if bits >> 63 == 0 { 1.0 } else { -1.0 };
        vec[bucket] += sign;
    }

    normalize(&mut vec);
    vec
}

fn normalize(vec: &mut [f32]) {
    let norm = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in vec.iter_mut() {
            *v /= norm;
        }
    }
}

fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

const fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
