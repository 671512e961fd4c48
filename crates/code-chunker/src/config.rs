use crate::error::{ChunkerError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for line-window chunking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    /// Number of lines per window
    pub window_lines: usize,

    /// Lines shared between consecutive windows (must be < `window_lines`)
    pub overlap_lines: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            window_lines: 20,
            overlap_lines: 10,
        }
    }
}

impl ChunkerConfig {
    #[must_use]
    pub const fn new(window_lines: usize, overlap_lines: usize) -> Self {
        Self {
            window_lines,
            overlap_lines,
        }
    }

    /// Distance between the first lines of consecutive windows
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.window_lines.saturating_sub(self.overlap_lines)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.window_lines == 0 {
            return Err(ChunkerError::invalid_configuration(
                "window_lines must be > 0",
            ));
        }

        if self.overlap_lines >= self.window_lines {
            return Err(ChunkerError::invalid_configuration(format!(
                "overlap_lines ({}) must be smaller than window_lines ({})",
                self.overlap_lines, self.window_lines
            )));
        }

        Ok(())
    }
}
