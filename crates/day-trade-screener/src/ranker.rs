//! Ranking Module
//!
//! Orders scored symbols for display and persistence.

use analysis_core::ScoreResult;

pub const DEFAULT_TOP_N: usize = 10;

/// Ranks scored symbols by score
#[derive(Debug, Clone)]
pub struct ScoreRanker {
    top_n: usize,
}

impl Default for ScoreRanker {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreRanker {
    /// Create a ranker with the default top-N of 10
    pub fn new() -> Self {
        Self { top_n: DEFAULT_TOP_N }
    }

    pub fn with_top_n(top_n: usize) -> Self {
        Self { top_n }
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Sort by score, highest first.
    ///
    /// The sort is stable and compares the score only, so equal scores keep
    /// their watch-list order.
    pub fn rank(&self, results: &mut [ScoreResult]) {
        results.sort_by(|a, b| b.score.cmp(&a.score));
    }

    /// The first `top_n` entries of an already ranked slice
    pub fn top<'a>(&self, ranked: &'a [ScoreResult]) -> &'a [ScoreResult] {
        &ranked[..ranked.len().min(self.top_n)]
    }
}
