use analyst_code_chunker::LineChunk;
use analyst_indexer::RetrievalSession;
use analyst_vector_store::{now_ms, EmbeddingStore, RetrievedChunk};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::Write as _;

/// `analyst status` output
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub snapshot_path: String,
    pub exists: bool,
    pub chunks: usize,
    pub files: usize,
    pub dimension: Option<usize>,
    /// Time of the most recent embedding in the snapshot
    pub newest_ms: Option<u64>,
    /// Seconds since `newest_ms`. The snapshot is never refreshed on its
    /// own, so a large value means edits since then are not indexed.
    pub age_secs: Option<u64>,
}

impl StatusReport {
    pub fn from_session(session: &RetrievalSession) -> Self {
        let store = session.store();
        let files: BTreeSet<&str> = store.iter().map(|r| r.source_path.as_str()).collect();
        let newest_ms = store.iter().map(|r| r.created_at_ms).max();
        Self {
            snapshot_path: session.snapshot_path().display().to_string(),
            exists: EmbeddingStore::exists(session.snapshot_path()),
            chunks: store.len(),
            files: files.len(),
            dimension: store.dimension(),
            newest_ms,
            age_secs: newest_ms.map(|ts| now_ms().saturating_sub(ts) / 1000),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "snapshot: {}", self.snapshot_path);
        if !self.exists {
            let _ = writeln!(out, "status:   not indexed");
            return out;
        }
        let _ = writeln!(out, "chunks:   {} ({} files)", self.chunks, self.files);
        if let Some(dimension) = self.dimension {
            let _ = writeln!(out, "vectors:  {dimension} dimensions");
        }
        if let Some(age) = self.age_secs {
            let _ = writeln!(out, "age:      {}", format_age(age));
        }
        out
    }
}

fn format_age(secs: u64) -> String {
    match secs {
        0..=59 => format!("{secs}s"),
        60..=3599 => format!("{}m", secs / 60),
        3600..=86_399 => format!("{}h {}m", secs / 3600, (secs % 3600) / 60),
        _ => format!("{}d {}h", secs / 86_400, (secs % 86_400) / 3600),
    }
}

/// `analyst query --json` output
#[derive(Debug, Serialize)]
pub struct QueryOutput {
    pub query: String,
    pub top_k: usize,
    pub results: Vec<QueryHit>,
}

#[derive(Debug, Serialize)]
pub struct QueryHit {
    pub source_path: String,
    pub score: f32,
    pub text: String,
}

impl QueryOutput {
    pub fn new(query: &str, top_k: usize, chunks: Vec<RetrievedChunk>) -> Self {
        Self {
            query: query.to_string(),
            top_k,
            results: chunks
                .into_iter()
                .map(|chunk| QueryHit {
                    source_path: chunk.source_path,
                    score: chunk.score,
                    text: chunk.text,
                })
                .collect(),
        }
    }
}

/// One window from `analyst chunk`
#[derive(Debug, Serialize)]
pub struct ChunkPreview {
    pub start_line: usize,
    pub end_line: usize,
    pub line_count: usize,
    pub content: String,
}

impl From<LineChunk> for ChunkPreview {
    fn from(chunk: LineChunk) -> Self {
        Self {
            start_line: chunk.start_line,
            end_line: chunk.end_line,
            line_count: chunk.line_count(),
            content: chunk.content,
        }
    }
}

impl ChunkPreview {
    pub fn render(&self) -> String {
        format!(
            "── lines {}-{} ──\n{}",
            self.start_line, self.end_line, self.content
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_formatting() {
        assert_eq!(format_age(5), "5s");
        assert_eq!(format_age(125), "2m");
        assert_eq!(format_age(3 * 3600 + 120), "3h 2m");
        assert_eq!(format_age(2 * 86_400 + 3600), "2d 1h");
    }

    #[test]
    fn preview_keeps_span() {
        let preview = ChunkPreview::from(LineChunk::new(11, 25, "a\nb".to_string()));
        assert_eq!(preview.line_count, 15);
        assert!(preview.render().starts_with("── lines 11-25 ──\n"));
    }
}
