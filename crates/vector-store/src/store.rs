use crate::error::{Result, VectorStoreError};
use crate::types::ChunkRecord;
use std::path::Path;

/// Ordered, append-only corpus of embedded chunks.
///
/// Every record shares the vector dimension of the first one appended. The
/// store is written to disk as a single JSON snapshot and reloaded verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddingStore {
    records: Vec<ChunkRecord>,
}

impl EmbeddingStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from records, validating each one as if appended
    pub fn from_records(records: Vec<ChunkRecord>) -> Result<Self> {
        let mut store = Self {
            records: Vec::with_capacity(records.len()),
        };
        for record in records {
            store.append(record)?;
        }
        Ok(store)
    }

    /// Add one record. Duplicate paths and texts are allowed.
    pub fn append(&mut self, record: ChunkRecord) -> Result<()> {
        if record.text.is_empty() {
            return Err(VectorStoreError::EmptyChunk {
                path: record.source_path,
            });
        }
        if record.vector.is_empty() {
            return Err(VectorStoreError::InvalidVector(format!(
                "empty vector for {}",
                record.source_path
            )));
        }
        if record.vector.iter().any(|v| !v.is_finite()) {
            return Err(VectorStoreError::InvalidVector(format!(
                "non-finite component in vector for {}",
                record.source_path
            )));
        }
        if let Some(expected) = self.dimension() {
            if record.vector.len() != expected {
                return Err(VectorStoreError::DimensionMismatch {
                    expected,
                    actual: record.vector.len(),
                });
            }
        }

        self.records.push(record);
        Ok(())
    }

    /// Vector dimension shared by all records, `None` while empty
    #[must_use]
    pub fn dimension(&self) -> Option<usize> {
        self.records.first().map(|record| record.vector.len())
    }

    #[must_use]
    pub fn records(&self) -> &[ChunkRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChunkRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Encode the store as a snapshot payload
    pub fn to_snapshot_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.records)?)
    }

    /// Decode a snapshot payload. Nothing is kept from a payload that fails
    /// to parse or validate.
    pub fn from_snapshot_bytes(bytes: &[u8]) -> Result<Self> {
        let records: Vec<ChunkRecord> = serde_json::from_slice(bytes)
            .map_err(|err| VectorStoreError::corrupt_cache(format!("unreadable snapshot: {err}")))?;
        Self::from_records(records).map_err(|err| match err {
            VectorStoreError::CorruptCache(_) => err,
            other => VectorStoreError::corrupt_cache(format!("invalid snapshot record: {other}")),
        })
    }

    /// Whether a snapshot file is present at `path`
    #[must_use]
    pub fn exists(path: impl AsRef<Path>) -> bool {
        path.as_ref().is_file()
    }

    /// Write the snapshot to `path` (temp file + rename)
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        log::info!("Saving {} records to {}", self.records.len(), path.display());
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = self.to_snapshot_bytes()?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        if let Err(err) = tokio::fs::rename(&tmp, path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(err.into());
        }
        Ok(())
    }

    /// Load a snapshot from disk
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading snapshot from {}", path.display());
        let bytes = tokio::fs::read(path).await?;
        let store = Self::from_snapshot_bytes(&bytes)?;
        log::info!("Loaded {} records from {}", store.len(), path.display());
        Ok(store)
    }

    /// Load a snapshot, falling back to an empty store on any failure
    pub async fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !Self::exists(path) {
            return Self::new();
        }
        match Self::load(path).await {
            Ok(store) => store,
            Err(err) => {
                log::warn!("Ignoring snapshot {}: {err}", path.display());
                Self::new()
            }
        }
    }
}

impl<'a> IntoIterator for &'a EmbeddingStore {
    type Item = &'a ChunkRecord;
    type IntoIter = std::slice::Iter<'a, ChunkRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
