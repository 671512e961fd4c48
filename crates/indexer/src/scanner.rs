use analyst_vector_store::CACHE_DIR_NAME;
use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which files the scanner hands to the index builder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Allowed extensions, without the leading dot (case-insensitive)
    pub extensions: Vec<String>,

    /// Larger files are skipped
    pub max_file_bytes: u64,

    /// Walk into dot-files and dot-directories
    pub include_hidden: bool,

    /// Directory names skipped anywhere in the tree (case-insensitive).
    /// The cache directory is always skipped.
    pub ignored_dirs: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
            max_file_bytes: MAX_FILE_SIZE_BYTES,
            include_hidden: false,
            ignored_dirs: IGNORED_SCOPES.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Scanner for finding source files in a project
#[derive(Debug, Clone)]
pub struct FileScanner {
    root: PathBuf,
    options: ScanOptions,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self::with_options(root, ScanOptions::default())
    }

    pub fn with_options(root: impl AsRef<Path>, options: ScanOptions) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            options,
        }
    }

    /// Scan directory for source files (.gitignore aware), sorted by path
    pub fn scan(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let root = self.root.clone();
        let ignored: Vec<String> = self
            .options
            .ignored_dirs
            .iter()
            .map(|name| name.to_lowercase())
            .collect();
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(!self.options.include_hidden)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .require_git(false)
            .sort_by_file_name(|a, b| a.cmp(b));
        builder.filter_entry(move |entry| {
            !FileScanner::is_ignored_scope(entry.path(), &root, &ignored)
        });

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    let Some(file_type) = entry.file_type() else {
                        continue;
                    };
                    if !file_type.is_file() {
                        continue;
                    }

                    let path = entry.path();
                    if !self.is_source_file(path) {
                        continue;
                    }

                    if let Ok(meta) = entry.metadata() {
                        if meta.len() > self.options.max_file_bytes {
                            log::debug!(
                                "Skipping large file {} ({} bytes > {})",
                                path.display(),
                                meta.len(),
                                self.options.max_file_bytes
                            );
                            continue;
                        }
                    }

                    files.push(path.to_path_buf());
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        log::info!("Found {} source files", files.len());
        files
    }

    fn is_source_file(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
            return false;
        };
        self.options
            .extensions
            .iter()
            .any(|candidate| candidate.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }

    fn is_ignored_scope(path: &Path, root: &Path, ignored: &[String]) -> bool {
        if let Ok(relative) = path.strip_prefix(root) {
            for component in relative.components() {
                if let std::path::Component::Normal(name) = component {
                    let lowered = name.to_string_lossy().to_lowercase();
                    if lowered == CACHE_DIR_NAME || ignored.iter().any(|name| name == &lowered) {
                        return true;
                    }
                }
            }
        }
        false
    }
}

/// Project-relative path with `/` separators
#[must_use]
pub fn relative_source_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

const IGNORED_SCOPES: &[&str] = &[
    // VCS / tooling
    ".git",
    ".hg",
    ".svn",
    ".idea",
    ".vscode",
    ".vscode-test",
    // caches / builds
    ".cache",
    "node_modules",
    ".next",
    ".turbo",
    "build",
    "dist",
    "out",
    "coverage",
    "target",
    "__pycache__",
    // vendored code
    "vendor",
    "third_party",
];

const MAX_FILE_SIZE_BYTES: u64 = 1_048_576; // 1 MB

const DEFAULT_EXTENSIONS: &[&str] = &["js", "ts", "jsx", "tsx"];
