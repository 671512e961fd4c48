use crate::error::{Result, VectorStoreError};
use crate::types::ChunkRecord;

pub const ONE_DAY_MS: u64 = 24 * 60 * 60 * 1000;

/// Cosine similarity of two equal-length vectors.
///
/// A zero-magnitude vector on either side scores `0.0`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(VectorStoreError::DimensionMismatch {
            expected: b.len(),
            actual: a.len(),
        });
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    let similarity = dot_product / (norm_a * norm_b);
    Ok(if similarity.is_finite() { similarity } else { 0.0 })
}

/// Bounded boost for recently embedded chunks.
///
/// `score = base * (floor + boost * age_factor)` where `age_factor` falls
/// linearly from 1 (just embedded) to 0 (`window_ms` or older).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecencyWeighting {
    pub window_ms: u64,
    pub floor: f32,
    pub boost: f32,
}

impl Default for RecencyWeighting {
    fn default() -> Self {
        Self {
            window_ms: ONE_DAY_MS,
            floor: 0.8,
            boost: 0.2,
        }
    }
}

impl RecencyWeighting {
    /// Freshness in `[0, 1]`; timestamps after `now_ms` count as fresh
    #[must_use]
    pub fn age_factor(&self, created_at_ms: u64, now_ms: u64) -> f32 {
        if self.window_ms == 0 {
            return 0.0;
        }
        let age = now_ms.saturating_sub(created_at_ms) as f64;
        let ratio = (age / self.window_ms as f64).min(1.0);
        (1.0 - ratio).clamp(0.0, 1.0) as f32
    }

    #[must_use]
    pub fn multiplier(&self, created_at_ms: u64, now_ms: u64) -> f32 {
        self.boost
            .mul_add(self.age_factor(created_at_ms, now_ms), self.floor)
    }

    /// Final score of `record` for `query` at time `now_ms`
    pub fn score(&self, query: &[f32], record: &ChunkRecord, now_ms: u64) -> Result<f32> {
        let base = cosine_similarity(query, &record.vector)?;
        Ok(base * self.multiplier(record.created_at_ms, now_ms))
    }
}

/// Score with the default one-day recency window
pub fn score(query: &[f32], record: &ChunkRecord, now_ms: u64) -> Result<f32> {
    RecencyWeighting::default().score(query, record, now_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_700_000_000_000;

    fn record(vector: Vec<f32>, created_at_ms: u64) -> ChunkRecord {
        ChunkRecord::with_timestamp("a.ts", "let x = 1;", vector, created_at_ms)
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        let sim = cosine_similarity(&a, &b).unwrap();
        assert!((sim - 1.0).abs() < 1e-6);

        let c = vec![1.0, 0.0];
        let d = vec![0.0, 1.0];
        let sim2 = cosine_similarity(&c, &d).unwrap();
        assert!(sim2.abs() < 1e-6);

        let e = vec![1.0, 2.0];
        let f = vec![-2.0, -4.0];
        assert!((cosine_similarity(&e, &f).unwrap() + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_ignores_magnitude() {
        let sim = cosine_similarity(&[3.0, 4.0], &[30.0, 40.0]).unwrap();
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        let zero = vec![0.0, 0.0, 0.0];
        let other = vec![0.3, 0.1, 0.9];
        assert_eq!(cosine_similarity(&zero, &other).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&other, &zero).unwrap(), 0.0);

        let scored = score(&zero, &record(other, NOW), NOW).unwrap();
        assert_eq!(scored, 0.0);
        assert!(!scored.is_nan());
    }

    #[test]
    fn test_dimension_mismatch() {
        let result = cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]);
        assert!(matches!(
            result,
            Err(VectorStoreError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_self_score_is_one_when_fresh() {
        let query = vec![0.2, -0.7, 0.4, 0.1];
        let scored = score(&query, &record(query.clone(), NOW), NOW).unwrap();
        assert!((scored - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_recency_multiplier_bounds() {
        let weighting = RecencyWeighting::default();
        assert!((weighting.multiplier(NOW, NOW) - 1.0).abs() < 1e-6);
        assert!((weighting.multiplier(NOW - ONE_DAY_MS / 2, NOW) - 0.9).abs() < 1e-6);
        assert!((weighting.multiplier(NOW - ONE_DAY_MS, NOW) - 0.8).abs() < 1e-6);
        assert!((weighting.multiplier(NOW - 10 * ONE_DAY_MS, NOW) - 0.8).abs() < 1e-6);
        // Clock skew: a record "from the future" is treated as brand new.
        assert!((weighting.multiplier(NOW + 5_000, NOW) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_old_record_keeps_relevance_dominant() {
        let query = vec![1.0, 0.0];
        let stale_match = record(vec![1.0, 0.0], NOW - 30 * ONE_DAY_MS);
        let fresh_weak = record(vec![0.5, 0.866], NOW);
        let stale = score(&query, &stale_match, NOW).unwrap();
        let fresh = score(&query, &fresh_weak, NOW).unwrap();
        assert!(stale > fresh, "{stale} <= {fresh}");
    }
}
