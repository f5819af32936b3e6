use serde::{Deserialize, Serialize};

/// Query sent to a chart data provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartQuery {
    pub symbol: String,
    pub region: String,
    /// Bar interval, e.g. "1d"
    pub interval: String,
    /// Trailing window, e.g. "5d"
    pub range: String,
    pub include_adjusted_close: bool,
}

impl ChartQuery {
    /// Daily bars over the trailing five sessions
    pub fn new(symbol: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            region: region.into(),
            interval: "1d".to_string(),
            range: "5d".to_string(),
            include_adjusted_close: true,
        }
    }

    pub fn with_window(mut self, interval: impl Into<String>, range: impl Into<String>) -> Self {
        self.interval = interval.into();
        self.range = range.into();
        self
    }
}

/// Scalar snapshot fields. Fields the provider omits are zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteMeta {
    pub current_price: f64,
    pub day_high: f64,
    pub day_low: f64,
    pub volume: u64,
    pub prev_close: f64,
}

/// Parallel, time-ordered sequences. `None` marks a non-trading point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteSeries {
    pub timestamp: Vec<i64>,
    pub high: Vec<Option<f64>>,
    pub low: Vec<Option<f64>>,
    pub close: Vec<Option<f64>>,
    pub volume: Vec<Option<f64>>,
}

impl QuoteSeries {
    pub fn len(&self) -> usize {
        self.timestamp.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamp.is_empty()
    }
}

/// Raw per-symbol snapshot as returned by a provider.
///
/// Either block may be missing when the upstream document was partial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawQuote {
    pub symbol: String,
    pub meta: Option<QuoteMeta>,
    pub series: Option<QuoteSeries>,
}

/// Technical metrics derived from one snapshot (all percentages except volume)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub daily_change_pct: f64,
    #[serde(rename = "amplitude")]
    pub today_amplitude_pct: f64,
    pub avg_volume: f64,
    #[serde(rename = "avg_amplitude")]
    pub avg_amplitude_pct: f64,
    #[serde(rename = "trend_5d")]
    pub trend_5d_pct: f64,
}

/// One entry of the watch-list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub symbol: String,
    pub name: String,
}

impl WatchlistEntry {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
        }
    }
}

/// Scored symbol, serialized as one flat record of the result document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    #[serde(flatten)]
    pub metrics: DerivedMetrics,
    pub volume: u64,
    /// Suitability score (0-100)
    pub score: u32,
    /// One entry per rubric band that fired, in category order
    pub reasons: Vec<String>,
    pub day_high: f64,
    pub day_low: f64,
    pub prev_close: f64,
}
