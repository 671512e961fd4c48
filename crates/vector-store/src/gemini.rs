//! Gemini `embedContent` client.

use crate::embeddings::EmbeddingProvider;
use crate::error::{Result, VectorStoreError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-embedding-001";

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
    pub max_retries: usize,
}

impl GeminiConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
        }
    }
}

/// Remote provider backed by the Gemini embeddings API
#[derive(Clone)]
pub struct GeminiEmbedder {
    client: Client,
    url: String,
    model_name: String,
    max_retries: usize,
}

impl GeminiEmbedder {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = config.api_key.trim();
        if api_key.is_empty() {
            return Err(VectorStoreError::embedding("missing Gemini API key"));
        }
        if config.model.trim().is_empty() {
            return Err(VectorStoreError::embedding("missing Gemini model name"));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(api_key)
                .map_err(|_| VectorStoreError::embedding("invalid Gemini API key"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|err| {
                VectorStoreError::embedding(format!("failed to build HTTP client: {err}"))
            })?;

        let model = config.model.trim().trim_start_matches("models/");
        let url = format!(
            "{}/models/{model}:embedContent",
            config.endpoint.trim_end_matches('/')
        );

        Ok(Self {
            client,
            url,
            model_name: format!("models/{model}"),
            max_retries: config.max_retries.max(1),
        })
    }

    fn should_retry(status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
    }

    fn is_retryable_error(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect() || err.is_request()
    }

    fn retry_backoff(attempt: usize) -> Duration {
        let capped = u32::try_from(attempt.min(5)).unwrap_or(5);
        Duration::from_millis(500 * (1 << capped))
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbedder {
    fn name(&self) -> &str {
        &self.model_name
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbedContentRequest {
            model: &self.model_name,
            content: Content {
                parts: vec![Part { text }],
            },
        };

        let mut attempt = 0usize;
        loop {
            match self.client.post(&self.url).json(&request).send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        let parsed: EmbedContentResponse = resp.json().await.map_err(|err| {
                            VectorStoreError::embedding(format!(
                                "failed to parse Gemini embedding response: {err}"
                            ))
                        })?;
                        if parsed.embedding.values.is_empty() {
                            return Err(VectorStoreError::embedding(
                                "Gemini returned an empty embedding",
                            ));
                        }
                        return Ok(parsed.embedding.values);
                    }

                    let body = resp
                        .text()
                        .await
                        .unwrap_or_else(|_| "<body unavailable>".to_string());
                    if Self::should_retry(status) && attempt + 1 < self.max_retries {
                        attempt += 1;
                        log::debug!("Gemini returned {status}, retry {attempt}");
                        tokio::time::sleep(Self::retry_backoff(attempt)).await;
                        continue;
                    }
                    return Err(VectorStoreError::embedding(format!(
                        "Gemini embedding request failed ({status}): {body}"
                    )));
                }
                Err(err) => {
                    if Self::is_retryable_error(&err) && attempt + 1 < self.max_retries {
                        attempt += 1;
                        log::debug!("Gemini request error, retry {attempt}: {err}");
                        tokio::time::sleep(Self::retry_backoff(attempt)).await;
                        continue;
                    }
                    return Err(VectorStoreError::embedding(format!(
                        "Gemini embedding request failed: {err}"
                    )));
                }
            }
        }
    }
}

#[derive(Serialize)]
struct EmbedContentRequest<'a> {
    model: &'a str,
    content: Content<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct EmbedContentResponse {
    embedding: ContentEmbedding,
}

#[derive(Deserialize)]
struct ContentEmbedding {
    #[serde(default)]
    values: Vec<f32>,
}
