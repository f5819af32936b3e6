//! Watch-list Scanner Module
//!
//! Fetches, scores and ranks every symbol of a watch-list. A symbol that
//! cannot be scored is logged and left out; the batch always completes.

use std::sync::Arc;

use analysis_core::{AnalysisError, ChartQuery, QuoteProvider, RawQuote, ScoreResult, WatchlistEntry};
use chrono::{DateTime, Utc};
use tokio::sync::Semaphore;

use crate::metrics::MetricExtractor;
use crate::ranker::{ScoreRanker, DEFAULT_TOP_N};
use crate::scoring::ScoringEngine;

/// Configuration for scanning
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Market region passed to the provider
    pub region: String,
    /// Bar interval
    pub interval: String,
    /// Trailing window
    pub range: String,
    /// Maximum symbols evaluated at once (1 = sequential)
    pub concurrency: usize,
    /// Size of the summary view
    pub top_n: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            region: "TW".to_string(),
            interval: "1d".to_string(),
            range: "5d".to_string(),
            concurrency: 1,
            top_n: DEFAULT_TOP_N,
        }
    }
}

/// A watch-list entry that produced no result
#[derive(Debug, Clone)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub name: String,
    pub reason: String,
}

/// Outcome of one scan
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub started_at: DateTime<Utc>,
    /// Scored symbols, highest score first
    pub ranked: Vec<ScoreResult>,
    /// Skipped symbols in watch-list order
    pub skipped: Vec<SkippedSymbol>,
    pub top_n: usize,
}

impl ScanReport {
    /// Summary view: the first `top_n` ranked results
    pub fn top(&self) -> &[ScoreResult] {
        ScoreRanker::with_top_n(self.top_n).top(&self.ranked)
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

/// Per-symbol step: fetch, extract, score
pub struct SymbolEvaluator {
    provider: Arc<dyn QuoteProvider>,
    extractor: MetricExtractor,
    engine: ScoringEngine,
}

impl SymbolEvaluator {
    pub fn new(provider: Arc<dyn QuoteProvider>, engine: ScoringEngine) -> Self {
        Self {
            provider,
            extractor: MetricExtractor::new(),
            engine,
        }
    }

    /// Fetch and score one symbol.
    ///
    /// The provider owns request deadlines; its `AnalysisError::Timeout`
    /// is returned like any other fetch failure.
    pub async fn evaluate(&self, entry: &WatchlistEntry, query: &ChartQuery) -> Result<ScoreResult, AnalysisError> {
        let quote = self.provider.fetch_quote(query).await?;
        self.score_quote(entry, &quote)
    }

    /// Score an already fetched snapshot
    pub fn score_quote(&self, entry: &WatchlistEntry, quote: &RawQuote) -> Result<ScoreResult, AnalysisError> {
        let metrics = self.extractor.extract(quote)?;
        let meta = quote
            .meta
            .as_ref()
            .ok_or_else(|| AnalysisError::MissingData(format!("{}: no meta block", entry.symbol)))?;

        let card = self.engine.score(meta.volume, &metrics);

        Ok(ScoreResult {
            symbol: entry.symbol.clone(),
            name: entry.name.clone(),
            current_price: meta.current_price,
            metrics,
            volume: meta.volume,
            score: card.score,
            reasons: card.reasons,
            day_high: meta.day_high,
            day_low: meta.day_low,
            prev_close: meta.prev_close,
        })
    }
}

/// Scores a watch-list against an injected quote provider
pub struct DayTradeScanner {
    config: ScanConfig,
    evaluator: Arc<SymbolEvaluator>,
    ranker: ScoreRanker,
}

impl DayTradeScanner {
    /// Create a scanner with the default rubric
    pub fn new(provider: Arc<dyn QuoteProvider>, config: ScanConfig) -> Self {
        let evaluator = Arc::new(SymbolEvaluator::new(provider, ScoringEngine::new()));
        let ranker = ScoreRanker::with_top_n(config.top_n);
        Self {
            config,
            evaluator,
            ranker,
        }
    }

    fn query_for(&self, symbol: &str) -> ChartQuery {
        ChartQuery::new(symbol, self.config.region.as_str())
            .with_window(self.config.interval.as_str(), self.config.range.as_str())
    }

    /// Fetch and score a single symbol
    pub async fn evaluate_symbol(&self, entry: &WatchlistEntry) -> Result<ScoreResult, AnalysisError> {
        self.evaluator.evaluate(entry, &self.query_for(&entry.symbol)).await
    }

    /// Score every entry and rank the results.
    ///
    /// Up to `concurrency` symbols are in flight at once. Results are merged in
    /// watch-list order before the stable sort, so ties never depend on which
    /// fetch finished first.
    pub async fn scan(&self, watchlist: &[WatchlistEntry]) -> ScanReport {
        let started_at = Utc::now();
        let total = watchlist.len();
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));
        let mut handles = Vec::with_capacity(total);

        for (index, entry) in watchlist.iter().enumerate() {
            let evaluator = Arc::clone(&self.evaluator);
            let semaphore = Arc::clone(&semaphore);
            let query = self.query_for(&entry.symbol);
            let entry = entry.clone();

            let handle = tokio::spawn(async move {
                let _permit = match semaphore.acquire().await {
                    Ok(permit) => permit,
                    Err(e) => return Err(AnalysisError::ApiError(format!("worker pool closed: {}", e))),
                };

                tracing::info!("[{}/{}] Analyzing {} ({})...", index + 1, total, entry.name, entry.symbol);
                evaluator.evaluate(&entry, &query).await
            });

            handles.push(handle);
        }

        let mut ranked = Vec::with_capacity(total);
        let mut skipped = Vec::new();

        // Joined in index order
        for (entry, handle) in watchlist.iter().zip(handles) {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => Err(AnalysisError::ApiError(format!("worker failed: {}", e))),
            };

            match outcome {
                Ok(result) => {
                    tracing::info!("{} ({}) scored {}/100", entry.name, entry.symbol, result.score);
                    ranked.push(result);
                }
                Err(e) => {
                    tracing::warn!("Skipping {} ({}): {}", entry.name, entry.symbol, e);
                    skipped.push(SkippedSymbol {
                        symbol: entry.symbol.clone(),
                        name: entry.name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        self.ranker.rank(&mut ranked);

        tracing::info!(
            "Scan finished: {} scored, {} skipped out of {}",
            ranked.len(),
            skipped.len(),
            total
        );

        ScanReport {
            started_at,
            ranked,
            skipped,
            top_n: self.ranker.top_n(),
        }
    }
}
