use crate::builder::IndexBuilder;
use crate::error::{IndexerError, Result};
use crate::stats::BuildReport;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Handle to an index build running on the tokio runtime.
///
/// The caller either awaits [`BuildTask::wait`] for the single completion
/// result, polls [`BuildTask::is_finished`], or drops the handle and lets the
/// build finish on its own.
#[derive(Debug)]
pub struct BuildTask {
    handle: JoinHandle<Result<BuildReport>>,
}

/// Start `builder.ensure_index()` in the background
pub fn spawn_build(builder: Arc<IndexBuilder>) -> BuildTask {
    let handle = tokio::spawn(async move {
        let result = builder.ensure_index().await;
        if let Err(err) = &result {
            log::warn!("Background index build failed: {err}");
        }
        result
    });
    BuildTask { handle }
}

impl BuildTask {
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancel the build. No snapshot is written unless the build already
    /// reached its final save.
    pub fn abort(&self) {
        self.handle.abort();
    }

    pub async fn wait(self) -> Result<BuildReport> {
        match self.handle.await {
            Ok(result) => result,
            Err(err) if err.is_cancelled() => Err(IndexerError::Cancelled),
            Err(err) => Err(IndexerError::Other(format!("index build task panicked: {err}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analyst_vector_store::{EmbeddingProvider, StubEmbedder, VectorStoreError};
    use async_trait::async_trait;
    use std::time::Duration;
    use tempfile::tempdir;

    struct SlowEmbedder;

    #[async_trait]
    impl EmbeddingProvider for SlowEmbedder {
        fn name(&self) -> &str {
            "slow"
        }

        async fn embed(&self, _text: &str) -> std::result::Result<Vec<f32>, VectorStoreError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(vec![1.0])
        }
    }

    #[tokio::test]
    async fn completes_with_report() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("a.ts"), "export const a = 1;").unwrap();

        let builder = IndexBuilder::new(temp.path(), Arc::new(StubEmbedder::default())).unwrap();
        let task = spawn_build(Arc::new(builder));
        let report = task.wait().await.unwrap();
        assert_eq!(report.chunks, 1);
    }

    #[tokio::test]
    async fn abort_leaves_no_snapshot() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("a.ts"), "export const a = 1;").unwrap();

        let builder = Arc::new(IndexBuilder::new(temp.path(), Arc::new(SlowEmbedder)).unwrap());
        let task = spawn_build(builder.clone());
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!task.is_finished());

        task.abort();
        assert!(matches!(task.wait().await, Err(IndexerError::Cancelled)));
        assert!(!builder.snapshot_exists());
    }
}
