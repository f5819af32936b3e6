use async_trait::async_trait;
use crate::{AnalysisError, ChartQuery, RawQuote};

/// Source of per-symbol chart snapshots.
///
/// Implementations must be safe to call concurrently: the scanner shares one
/// provider across all of its workers.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn fetch_quote(&self, query: &ChartQuery) -> Result<RawQuote, AnalysisError>;
}
