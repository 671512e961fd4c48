use crate::config::AnalystConfig;
use crate::error::{IndexerError, Result};
use crate::index_lock::acquire_build_lock;
use crate::scanner::{relative_source_path, FileScanner};
use crate::stats::BuildReport;
use analyst_code_chunker::Chunker;
use analyst_vector_store::{
    snapshot_path_for_project_root, ChunkRecord, EmbeddingProvider, EmbeddingStore,
    VectorStoreError,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Walks a project, chunks every source file, embeds each chunk and
/// persists the resulting store as one snapshot.
///
/// Embedding calls are issued one at a time, in file order then chunk order.
pub struct IndexBuilder {
    root: PathBuf,
    snapshot_path: PathBuf,
    scanner: FileScanner,
    chunker: Chunker,
    provider: Arc<dyn EmbeddingProvider>,
}

impl IndexBuilder {
    /// Builder with default chunking (20 lines, 10 overlap) and scan options
    pub fn new(root: impl AsRef<Path>, provider: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        Self::with_config(root, &AnalystConfig::default(), provider)
    }

    pub fn with_config(
        root: impl AsRef<Path>,
        config: &AnalystConfig,
        provider: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(IndexerError::InvalidPath(format!(
                "Not a directory: {}",
                root.display()
            )));
        }

        Ok(Self {
            snapshot_path: snapshot_path_for_project_root(&root),
            scanner: FileScanner::with_options(&root, config.scan.clone()),
            chunker: Chunker::new(config.chunking)?,
            provider,
            root,
        })
    }

    #[must_use]
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = path.into();
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    #[must_use]
    pub fn snapshot_exists(&self) -> bool {
        EmbeddingStore::exists(&self.snapshot_path)
    }

    /// Reuse the snapshot if one exists, otherwise build it.
    ///
    /// A snapshot that fails to parse is discarded and rebuilt. A readable
    /// snapshot is never checked against the current project files.
    pub async fn ensure_index(&self) -> Result<BuildReport> {
        let _lock = acquire_build_lock(&self.snapshot_path).await?;

        if self.snapshot_exists() {
            match EmbeddingStore::load(&self.snapshot_path).await {
                Ok(store) => {
                    log::info!(
                        "Reusing snapshot {} ({} chunks)",
                        self.snapshot_path.display(),
                        store.len()
                    );
                    return Ok(BuildReport::reused(store.len()));
                }
                Err(err @ VectorStoreError::CorruptCache(_)) => {
                    log::warn!("Rebuilding index: {err}");
                }
                Err(err) => {
                    log::warn!(
                        "Cannot read snapshot {}: {err}; rebuilding",
                        self.snapshot_path.display()
                    );
                }
            }
        }

        self.build_locked().await
    }

    /// Build and persist a fresh snapshot, replacing any existing one
    pub async fn build(&self) -> Result<BuildReport> {
        let _lock = acquire_build_lock(&self.snapshot_path).await?;
        self.build_locked().await
    }

    async fn build_locked(&self) -> Result<BuildReport> {
        let (store, report) = self.build_store().await?;
        store.save(&self.snapshot_path).await?;
        log::info!(
            "Indexed {} files into {} chunks in {}ms ({} skipped, {} failed)",
            report.files,
            report.chunks,
            report.time_ms,
            report.skipped_files,
            report.failed_files
        );
        Ok(report)
    }

    /// Scan, chunk and embed without touching the snapshot
    pub async fn build_store(&self) -> Result<(EmbeddingStore, BuildReport)> {
        let start = Instant::now();
        let scanner = self.scanner.clone();
        let files = tokio::task::spawn_blocking(move || scanner.scan())
            .await
            .map_err(|err| IndexerError::Other(format!("join scan task: {err}")))?;

        log::info!(
            "Indexing {} files under {} with {}",
            files.len(),
            self.root.display(),
            self.provider.name()
        );

        let mut store = EmbeddingStore::new();
        let mut report = BuildReport::new();
        for path in &files {
            self.index_file(path, &mut store, &mut report).await;
        }

        report.chunks = store.len();
        report.time_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        Ok((store, report))
    }

    async fn index_file(&self, path: &Path, store: &mut EmbeddingStore, report: &mut BuildReport) {
        let source_path = relative_source_path(&self.root, path);

        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(source) => {
                let err = IndexerError::FileRead {
                    path: source_path,
                    source,
                };
                log::warn!("Skipping file: {err}");
                report.add_skipped_file(err.to_string());
                return;
            }
        };

        let chunks = self.chunker.chunk(&content);
        let total = chunks.len();
        let mut produced = 0usize;

        for text in chunks {
            let record = match self.provider.embed(&text).await {
                Ok(vector) => ChunkRecord::new(source_path.as_str(), text, vector),
                Err(err) => {
                    self.fail_file(&source_path, produced, total, &err, report);
                    return;
                }
            };
            if let Err(err) = store.append(record) {
                self.fail_file(&source_path, produced, total, &err, report);
                return;
            }
            produced += 1;
        }

        log::debug!("{source_path}: {produced} chunks");
        report.add_file(produced);
    }

    fn fail_file(
        &self,
        source_path: &str,
        produced: usize,
        total: usize,
        err: &VectorStoreError,
        report: &mut BuildReport,
    ) {
        log::warn!(
            "Embedding failed for {source_path} at chunk {}/{total}, skipping rest of file: {err}",
            produced + 1
        );
        report.add_file(produced);
        report.add_failed_file(format!("{source_path}: {err}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analyst_vector_store::StubEmbedder;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn stub() -> Arc<dyn EmbeddingProvider> {
        Arc::new(StubEmbedder::new(16))
    }

    fn lines(count: usize, tag: &str) -> String {
        (0..count)
            .map(|n| format!("const {tag}{n} = {n};"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test]
    async fn builds_and_persists_in_file_order() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        std::fs::create_dir_all(root.join("src")).unwrap();
        std::fs::write(root.join("src/b.ts"), lines(25, "b")).unwrap();
        std::fs::write(root.join("a.js"), lines(5, "a")).unwrap();

        let builder = IndexBuilder::new(root, stub()).unwrap();
        let report = builder.build().await.unwrap();

        assert_eq!(report.files, 2);
        assert_eq!(report.chunks, 3);
        assert!(!report.reused_snapshot);
        assert!(builder.snapshot_exists());

        let store = EmbeddingStore::load(builder.snapshot_path()).await.unwrap();
        let paths: Vec<&str> = store.iter().map(|r| r.source_path.as_str()).collect();
        assert_eq!(paths, vec!["a.js", "src/b.ts", "src/b.ts"]);
        assert!(store.records()[1].text.starts_with("const b0 = 0;"));
        assert!(store.records()[2].text.starts_with("const b10 = 10;"));
        assert_eq!(store.dimension(), Some(16));
    }

    #[tokio::test]
    async fn ensure_index_reuses_existing_snapshot() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        std::fs::write(root.join("a.ts"), lines(3, "a")).unwrap();

        let builder = IndexBuilder::new(root, stub()).unwrap();
        let first = builder.ensure_index().await.unwrap();
        assert_eq!(first.chunks, 1);
        assert!(!first.reused_snapshot);

        // New files are not picked up while the snapshot exists.
        std::fs::write(root.join("b.ts"), lines(3, "b")).unwrap();
        let second = builder.ensure_index().await.unwrap();
        assert!(second.reused_snapshot);
        assert_eq!(second.chunks, 1);
    }

    #[tokio::test]
    async fn ensure_index_rebuilds_corrupt_snapshot() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        std::fs::write(root.join("a.ts"), lines(3, "a")).unwrap();

        let builder = IndexBuilder::new(root, stub()).unwrap();
        std::fs::create_dir_all(builder.snapshot_path().parent().unwrap()).unwrap();
        std::fs::write(builder.snapshot_path(), b"[{\"oops\"").unwrap();

        let report = builder.ensure_index().await.unwrap();
        assert!(!report.reused_snapshot);
        assert_eq!(report.chunks, 1);
        assert_eq!(
            EmbeddingStore::load(builder.snapshot_path()).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn empty_project_writes_empty_snapshot() {
        let temp = tempdir().unwrap();
        let builder = IndexBuilder::new(temp.path(), stub()).unwrap();
        let report = builder.build().await.unwrap();
        assert_eq!(report.chunks, 0);
        assert!(EmbeddingStore::load(builder.snapshot_path())
            .await
            .unwrap()
            .is_empty());
    }

    #[test]
    fn rejects_missing_root() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("nope");
        assert!(matches!(
            IndexBuilder::new(&missing, stub()),
            Err(IndexerError::InvalidPath(_))
        ));
    }

    #[test]
    fn rejects_invalid_chunking() {
        let temp = tempdir().unwrap();
        let mut config = AnalystConfig::default();
        config.chunking.overlap_lines = config.chunking.window_lines;
        assert!(matches!(
            IndexBuilder::with_config(temp.path(), &config, stub()),
            Err(IndexerError::ChunkerError(_))
        ));
    }
}
