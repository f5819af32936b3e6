//! Metric Extraction Module
//!
//! Turns a raw chart snapshot into the handful of metrics the rubric scores.

use analysis_core::stats::{mean, mean_defined, pct_change, range_pct};
use analysis_core::{AnalysisError, DerivedMetrics, QuoteMeta, QuoteSeries, RawQuote};

/// Derives [`DerivedMetrics`] from a [`RawQuote`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricExtractor;

impl MetricExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract metrics, failing with `MissingData` when the snapshot has no
    /// meta block, no series, or sequences that do not line up with the
    /// timestamps.
    pub fn extract(&self, quote: &RawQuote) -> Result<DerivedMetrics, AnalysisError> {
        let meta = quote
            .meta
            .as_ref()
            .ok_or_else(|| AnalysisError::MissingData(format!("{}: no meta block", quote.symbol)))?;
        let series = quote
            .series
            .as_ref()
            .ok_or_else(|| AnalysisError::MissingData(format!("{}: no time series", quote.symbol)))?;

        validate_series(&quote.symbol, series)?;

        Ok(DerivedMetrics {
            daily_change_pct: daily_change_pct(meta),
            today_amplitude_pct: today_amplitude_pct(meta),
            avg_volume: mean_defined(&series.volume),
            avg_amplitude_pct: avg_amplitude_pct(series),
            trend_5d_pct: trend_pct(&series.close),
        })
    }
}

fn validate_series(symbol: &str, series: &QuoteSeries) -> Result<(), AnalysisError> {
    let expected = series.len();
    let sequences = [
        ("high", series.high.len()),
        ("low", series.low.len()),
        ("close", series.close.len()),
        ("volume", series.volume.len()),
    ];

    for (name, len) in sequences {
        if len != expected {
            return Err(AnalysisError::MissingData(format!(
                "{}: {} has {} entries, expected {}",
                symbol, name, len, expected
            )));
        }
    }
    Ok(())
}

/// Change of the current price against the previous close, in percent
pub fn daily_change_pct(meta: &QuoteMeta) -> f64 {
    if meta.prev_close > 0.0 {
        pct_change(meta.prev_close, meta.current_price)
    } else {
        0.0
    }
}

/// Today's high-low range relative to the previous close, in percent
pub fn today_amplitude_pct(meta: &QuoteMeta) -> f64 {
    range_pct(meta.day_high, meta.day_low, meta.prev_close)
}

/// Mean session amplitude over the window.
///
/// Session `i` counts only when its high and low and the prior session's
/// non-zero close are all present; the first session has no prior close.
pub fn avg_amplitude_pct(series: &QuoteSeries) -> f64 {
    let amplitudes: Vec<f64> = (1..series.len())
        .filter_map(|i| {
            let high = series.high.get(i).copied().flatten()?;
            let low = series.low.get(i).copied().flatten()?;
            let prev_close = series.close.get(i - 1).copied().flatten().filter(|c| *c != 0.0)?;
            Some((high - low) / prev_close * 100.0)
        })
        .collect();

    mean(&amplitudes)
}

/// Percent change from the first to the last defined close.
/// Needs at least two defined closes.
pub fn trend_pct(closes: &[Option<f64>]) -> f64 {
    let defined: Vec<f64> = closes.iter().flatten().copied().collect();

    match (defined.first(), defined.last()) {
        (Some(&first), Some(&last)) if defined.len() >= 2 => pct_change(first, last),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(current: f64, high: f64, low: f64, prev_close: f64) -> QuoteMeta {
        QuoteMeta {
            current_price: current,
            day_high: high,
            day_low: low,
            volume: 30_000,
            prev_close,
        }
    }

    fn series(
        high: Vec<Option<f64>>,
        low: Vec<Option<f64>>,
        close: Vec<Option<f64>>,
        volume: Vec<Option<f64>>,
    ) -> QuoteSeries {
        QuoteSeries {
            timestamp: (0..close.len() as i64).map(|i| 1_768_435_200 + i * 86_400).collect(),
            high,
            low,
            close,
            volume,
        }
    }

    fn sample_quote() -> RawQuote {
        RawQuote {
            symbol: "2312.TW".to_string(),
            meta: Some(meta(105.0, 108.0, 100.0, 100.0)),
            series: Some(series(
                vec![Some(101.0), Some(104.0), Some(106.0), Some(108.0)],
                vec![Some(99.0), Some(100.0), Some(101.0), Some(100.0)],
                vec![Some(100.0), Some(102.0), None, Some(105.0)],
                vec![Some(1000.0), Some(3000.0), None, Some(2000.0)],
            )),
        }
    }

    #[test]
    fn test_extract_sample() {
        let m = MetricExtractor::new().extract(&sample_quote()).unwrap();

        assert!((m.daily_change_pct - 5.0).abs() < 1e-9);
        assert!((m.today_amplitude_pct - 8.0).abs() < 1e-9);
        assert!((m.avg_volume - 2000.0).abs() < 1e-9);
        // i=1: (104-100)/100 = 4%; i=2: (106-101)/102 ≈ 4.902%; i=3 skipped (close[2] is null)
        let expected_amp = (4.0 + 5.0 / 102.0 * 100.0) / 2.0;
        assert!((m.avg_amplitude_pct - expected_amp).abs() < 1e-9);
        assert!((m.trend_5d_pct - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_prev_close_falls_back() {
        let m = meta(105.0, 108.0, 100.0, 0.0);
        assert_eq!(daily_change_pct(&m), 0.0);
        assert_eq!(today_amplitude_pct(&m), 0.0);
    }

    #[test]
    fn test_avg_amplitude_skips_zero_and_missing() {
        let s = series(
            vec![Some(10.0), Some(11.0), None, Some(12.0)],
            vec![Some(9.0), Some(10.0), Some(9.0), Some(11.0)],
            vec![Some(0.0), Some(10.0), Some(10.0), Some(10.0)],
            vec![None; 4],
        );
        // i=1 skipped (prior close is zero), i=2 skipped (no high), i=3 counts: 1/10 = 10%
        assert!((avg_amplitude_pct(&s) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_avg_amplitude_no_qualifying_index() {
        let s = series(vec![Some(10.0)], vec![Some(9.0)], vec![Some(9.5)], vec![Some(1.0)]);
        assert_eq!(avg_amplitude_pct(&s), 0.0);
    }

    #[test]
    fn test_avg_amplitude_tolerates_short_sequences() {
        let mut s = series(
            vec![Some(10.0), Some(11.0), Some(12.0), Some(12.0)],
            vec![Some(9.0), Some(10.0), Some(11.0), Some(11.0)],
            vec![Some(10.0), Some(10.0), Some(10.0), Some(10.0)],
            vec![None; 4],
        );
        s.high.truncate(2);
        s.low.truncate(3);
        // Only i=1 has both a high and a low: 1/10 = 10%
        assert!((avg_amplitude_pct(&s) - 10.0).abs() < 1e-9);

        s.close.clear();
        assert_eq!(avg_amplitude_pct(&s), 0.0);
    }

    #[test]
    fn test_trend_uses_defined_closes() {
        assert!((trend_pct(&[None, Some(50.0), None, Some(55.0), None]) - 10.0).abs() < 1e-9);
        assert_eq!(trend_pct(&[None, Some(50.0), None]), 0.0);
        assert_eq!(trend_pct(&[]), 0.0);
        assert_eq!(trend_pct(&[Some(0.0), Some(5.0)]), 0.0);
    }

    #[test]
    fn test_all_null_series_yields_zero_metrics() {
        let quote = RawQuote {
            symbol: "1815.TWO".to_string(),
            meta: Some(meta(20.0, 21.0, 19.0, 20.0)),
            series: Some(series(vec![None; 3], vec![None; 3], vec![None; 3], vec![None; 3])),
        };
        let m = MetricExtractor::new().extract(&quote).unwrap();
        assert_eq!(m.avg_volume, 0.0);
        assert_eq!(m.avg_amplitude_pct, 0.0);
        assert_eq!(m.trend_5d_pct, 0.0);
    }

    #[test]
    fn test_missing_meta_is_missing_data() {
        let mut quote = sample_quote();
        quote.meta = None;
        let err = MetricExtractor::new().extract(&quote).unwrap_err();
        assert!(err.is_missing_data());
    }

    #[test]
    fn test_missing_series_is_missing_data() {
        let mut quote = sample_quote();
        quote.series = None;
        assert!(MetricExtractor::new().extract(&quote).unwrap_err().is_missing_data());
    }

    #[test]
    fn test_misaligned_series_is_missing_data() {
        let mut quote = sample_quote();
        if let Some(s) = quote.series.as_mut() {
            s.high.pop();
        }
        let err = MetricExtractor::new().extract(&quote).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingData(ref msg) if msg.contains("high")));
    }
}
