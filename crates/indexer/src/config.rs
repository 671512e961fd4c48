use crate::error::{IndexerError, Result};
use crate::scanner::ScanOptions;
use analyst_code_chunker::ChunkerConfig;
use analyst_vector_store::{
    EmbeddingMode, EmbeddingProvider, GeminiConfig, GeminiEmbedder, StubEmbedder,
    DEFAULT_GEMINI_ENDPOINT, DEFAULT_GEMINI_MODEL, DEFAULT_TOP_K, EMBEDDING_MODE_ENV,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = ".analyst.toml";
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const GEMINI_MODEL_ENV: &str = "GEMINI_EMBEDDING_MODEL";

/// Project configuration, read from `<root>/.analyst.toml`.
///
/// ```toml
/// [chunking]
/// window_lines = 20
/// overlap_lines = 10
///
/// [scan]
/// extensions = ["js", "ts"]
///
/// [embedding]
/// mode = "gemini"
/// model = "gemini-embedding-001"
///
/// [retrieval]
/// top_k = 6
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalystConfig {
    pub chunking: ChunkerConfig,
    pub scan: ScanOptions,
    pub embedding: EmbeddingSettings,
    pub retrieval: RetrievalSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// `gemini` or `stub`
    pub mode: String,
    pub model: String,
    pub endpoint: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: usize,
    pub stub_dimension: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            mode: EmbeddingMode::Gemini.as_str().to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            api_key: None,
            timeout_secs: 30,
            max_retries: 3,
            stub_dimension: StubEmbedder::DEFAULT_DIMENSION,
        }
    }
}

impl EmbeddingSettings {
    pub fn mode(&self) -> Result<EmbeddingMode> {
        self.mode
            .parse()
            .map_err(|err| IndexerError::Config(format!("embedding.mode: {err}")))
    }

    /// Construct the configured provider
    pub fn build_provider(&self) -> Result<Arc<dyn EmbeddingProvider>> {
        match self.mode()? {
            EmbeddingMode::Stub => Ok(Arc::new(StubEmbedder::new(self.stub_dimension))),
            EmbeddingMode::Gemini => {
                let api_key = self.api_key.clone().unwrap_or_default();
                if api_key.trim().is_empty() {
                    return Err(IndexerError::Config(format!(
                        "Gemini embeddings need an API key ({GEMINI_API_KEY_ENV} or embedding.api_key)"
                    )));
                }
                let config = GeminiConfig {
                    api_key,
                    model: self.model.clone(),
                    endpoint: self.endpoint.clone(),
                    timeout: Duration::from_secs(self.timeout_secs.max(1)),
                    max_retries: self.max_retries,
                };
                Ok(Arc::new(GeminiEmbedder::new(config)?))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub top_k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl AnalystConfig {
    #[must_use]
    pub fn path_for_project_root(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE_NAME)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)
            .map_err(|err| IndexerError::Config(format!("{CONFIG_FILE_NAME}: {err}")))?;
        Ok(config)
    }

    /// Read the project file (if any), apply environment overrides, validate
    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::path_for_project_root(root);
        let mut config = if path.is_file() {
            log::debug!("Reading configuration from {}", path.display());
            let raw = std::fs::read_to_string(&path)?;
            Self::from_toml_str(&raw)?
        } else {
            Self::default()
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`; blank values are ignored
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(mode) = get(EMBEDDING_MODE_ENV) {
            self.embedding.mode = mode;
        }
        if let Some(key) = get(GEMINI_API_KEY_ENV) {
            self.embedding.api_key = Some(key);
        }
        if let Some(model) = get(GEMINI_MODEL_ENV) {
            self.embedding.model = model;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;
        self.embedding.mode()?;
        if self.scan.extensions.is_empty() {
            return Err(IndexerError::Config(
                "scan.extensions must list at least one extension".to_string(),
            ));
        }
        if self.embedding.stub_dimension == 0 {
            return Err(IndexerError::Config(
                "embedding.stub_dimension must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
