use std::path::{Path, PathBuf};

pub const CACHE_DIR_NAME: &str = ".analyst-cache";
pub const SNAPSHOT_FILE_NAME: &str = "embeddings.json";

#[must_use]
pub fn cache_dir_for_project_root(root: &Path) -> PathBuf {
    root.join(CACHE_DIR_NAME)
}

#[must_use]
pub fn snapshot_path_for_project_root(root: &Path) -> PathBuf {
    cache_dir_for_project_root(root).join(SNAPSHOT_FILE_NAME)
}

#[must_use]
pub fn is_cache_dir_name(name: &str) -> bool {
    name == CACHE_DIR_NAME
}
