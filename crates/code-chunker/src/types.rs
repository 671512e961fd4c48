use serde::{Deserialize, Serialize};

/// A contiguous window of lines cut from a file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineChunk {
    /// Start line (1-indexed)
    pub start_line: usize,

    /// End line (1-indexed, inclusive)
    pub end_line: usize,

    /// The window's lines joined with `\n`
    pub content: String,
}

impl LineChunk {
    #[must_use]
    pub const fn new(start_line: usize, end_line: usize, content: String) -> Self {
        Self {
            start_line,
            end_line,
            content,
        }
    }

    /// Get the number of lines in this chunk
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    /// Check if chunk contains a specific line
    #[must_use]
    pub const fn contains_line(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }
}
