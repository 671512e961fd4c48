use serde::{Deserialize, Serialize};

/// Outcome of one index build (or of reusing an existing snapshot)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    /// Files read and chunked
    pub files: usize,

    /// Records in the resulting store
    pub chunks: usize,

    /// Files that could not be read
    pub skipped_files: usize,

    /// Files cut short by an embedding failure
    pub failed_files: usize,

    /// Time taken in milliseconds
    pub time_ms: u64,

    /// True when an existing snapshot was loaded instead of building
    pub reused_snapshot: bool,

    /// Errors encountered
    pub errors: Vec<String>,
}

impl BuildReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reused(chunks: usize) -> Self {
        Self {
            chunks,
            reused_snapshot: true,
            ..Self::default()
        }
    }

    pub fn add_file(&mut self, chunks: usize) {
        self.files += 1;
        self.chunks += chunks;
    }

    pub fn add_skipped_file(&mut self, error: String) {
        self.skipped_files += 1;
        self.errors.push(error);
    }

    pub fn add_failed_file(&mut self, error: String) {
        self.failed_files += 1;
        self.errors.push(error);
    }
}
