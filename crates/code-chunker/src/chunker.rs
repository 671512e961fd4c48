use crate::config::ChunkerConfig;
use crate::error::Result;
use crate::types::LineChunk;

/// Split `text` into overlapping windows of `window` lines.
///
/// Fails with [`ChunkerError::InvalidConfiguration`](crate::ChunkerError) when
/// `overlap >= window`.
pub fn chunk_lines(text: &str, window: usize, overlap: usize) -> Result<Vec<String>> {
    let chunker = Chunker::new(ChunkerConfig::new(window, overlap))?;
    Ok(chunker.chunk(text))
}

/// Main chunker interface for processing source text
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkerConfig,
}

impl Chunker {
    /// Create a new chunker, rejecting configurations that cannot advance
    pub fn new(config: ChunkerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub const fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Chunk text, returning only the window contents
    #[must_use]
    pub fn chunk(&self, text: &str) -> Vec<String> {
        self.chunk_spans(text)
            .into_iter()
            .map(|chunk| chunk.content)
            .collect()
    }

    /// Chunk text, keeping the line span of every window
    #[must_use]
    pub fn chunk_spans(&self, text: &str) -> Vec<LineChunk> {
        if text.is_empty() {
            return Vec::new();
        }

        let lines: Vec<&str> = text.split('\n').collect();
        let total = lines.len();
        let window = self.config.window_lines;
        let step = self.config.stride();

        let mut chunks = Vec::with_capacity(total / step + 1);
        let mut start = 0;

        loop {
            let end = (start + window).min(total);
            chunks.push(LineChunk::new(start + 1, end, lines[start..end].join("\n")));

            // The tail window is emitted even when the stride would overshoot.
            if start + window >= total {
                break;
            }
            start += step;
        }

        log::trace!("{total} lines -> {} windows", chunks.len());
        chunks
    }
}
