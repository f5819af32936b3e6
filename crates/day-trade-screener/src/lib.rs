//! Day-Trade Screener
//!
//! Scores a watch-list for intraday trading suitability: derives a few
//! technical metrics per symbol, applies a weighted 0-100 rubric and ranks the
//! results.

pub mod metrics;
pub mod ranker;
pub mod report;
pub mod scanner;
pub mod scoring;

pub use metrics::MetricExtractor;
pub use ranker::{ScoreRanker, DEFAULT_TOP_N};
pub use report::{format_summary, to_document, write_results};
pub use scanner::{DayTradeScanner, ScanConfig, ScanReport, SkippedSymbol, SymbolEvaluator};
pub use scoring::{Band, Category, Rubric, ScoreCard, ScoringEngine};
