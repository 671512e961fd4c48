use crate::{IndexerError, Result};
use fs2::FileExt;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Exclusive lock held for the whole of a build; released on drop
pub(crate) struct BuildLock {
    file: std::fs::File,
}

impl Drop for BuildLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

pub(crate) fn lock_path_for_snapshot(snapshot_path: &Path) -> PathBuf {
    snapshot_path.with_extension("lock")
}

pub(crate) async fn acquire_build_lock(snapshot_path: &Path) -> Result<BuildLock> {
    let path = lock_path_for_snapshot(snapshot_path);
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    tokio::task::spawn_blocking(move || -> Result<BuildLock> {
        use std::fs::OpenOptions;

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|err| {
                IndexerError::Other(format!("open build lock {}: {err}", path.display()))
            })?;

        let start = Instant::now();
        file.lock_exclusive().map_err(|err| {
            IndexerError::Other(format!("acquire build lock {}: {err}", path.display()))
        })?;
        let waited = start.elapsed();
        if waited.as_millis() > 0 {
            log::debug!("Waited {}ms for build lock {}", waited.as_millis(), path.display());
        }

        Ok(BuildLock { file })
    })
    .await
    .map_err(|err| IndexerError::Other(format!("join build lock task: {err}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    #[tokio::test]
    async fn second_lock_waits_for_first() {
        let temp = tempdir().unwrap();
        let snapshot = temp.path().join("cache").join("embeddings.json");

        let first = acquire_build_lock(&snapshot).await.unwrap();
        assert!(lock_path_for_snapshot(&snapshot).exists());

        let snapshot_clone = snapshot.clone();
        let second = tokio::spawn(async move { acquire_build_lock(&snapshot_clone).await });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!second.is_finished());

        drop(first);
        let second = tokio::time::timeout(Duration::from_secs(5), second)
            .await
            .expect("lock released")
            .unwrap();
        assert!(second.is_ok());
    }
}
