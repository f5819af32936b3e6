//! Chart document wire format and its conversion into [`RawQuote`].

use analysis_core::{AnalysisError, QuoteMeta, QuoteSeries, RawQuote};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ChartEnvelope {
    #[serde(default)]
    chart: Option<ChartBody>,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ChartErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: Option<ChartMeta>,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    #[serde(default)]
    regular_market_price: Option<f64>,
    #[serde(default)]
    regular_market_day_high: Option<f64>,
    #[serde(default)]
    regular_market_day_low: Option<f64>,
    #[serde(default)]
    regular_market_volume: Option<f64>,
    #[serde(default)]
    previous_close: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Option<Vec<QuoteBlock>>,
}

#[derive(Debug, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    high: Option<Vec<Option<f64>>>,
    #[serde(default)]
    low: Option<Vec<Option<f64>>>,
    #[serde(default)]
    close: Option<Vec<Option<f64>>>,
    #[serde(default)]
    volume: Option<Vec<Option<f64>>>,
}

fn meta_from(m: ChartMeta) -> QuoteMeta {
    QuoteMeta {
        current_price: m.regular_market_price.unwrap_or(0.0),
        day_high: m.regular_market_day_high.unwrap_or(0.0),
        day_low: m.regular_market_day_low.unwrap_or(0.0),
        volume: m.regular_market_volume.map(|v| v.max(0.0).round() as u64).unwrap_or(0),
        prev_close: m.previous_close.unwrap_or(0.0),
    }
}

fn series_from(timestamp: Option<Vec<i64>>, indicators: Option<Indicators>) -> Option<QuoteSeries> {
    let timestamp = timestamp?;
    let block = indicators?.quote?.into_iter().next()?;

    Some(QuoteSeries {
        timestamp,
        high: block.high?,
        low: block.low?,
        close: block.close?,
        volume: block.volume?,
    })
}

/// Convert a chart document into a snapshot for `symbol`.
///
/// A document without `chart.result[0]` is `MissingData`; an upstream error
/// object with no result is `ApiError`. A result lacking its meta block or any
/// of its sequences still converts, with that part set to `None`.
pub fn parse_chart(symbol: &str, envelope: ChartEnvelope) -> Result<RawQuote, AnalysisError> {
    let body = envelope
        .chart
        .ok_or_else(|| AnalysisError::MissingData(format!("{}: no chart block", symbol)))?;

    let first = body.result.and_then(|results| results.into_iter().next());

    let result = match (first, body.error) {
        (Some(result), _) => result,
        (None, Some(err)) => {
            return Err(AnalysisError::ApiError(format!(
                "{}: {} ({})",
                symbol,
                err.description.unwrap_or_default(),
                err.code.unwrap_or_default()
            )))
        }
        (None, None) => {
            return Err(AnalysisError::MissingData(format!("{}: chart has no result", symbol)))
        }
    };

    Ok(RawQuote {
        symbol: symbol.to_string(),
        meta: result.meta.map(meta_from),
        series: series_from(result.timestamp, result.indicators),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: serde_json::Value) -> ChartEnvelope {
        serde_json::from_value(value).unwrap()
    }

    fn sample_document() -> serde_json::Value {
        json!({
            "chart": {
                "result": [{
                    "meta": {
                        "currency": "TWD",
                        "symbol": "2409.TW",
                        "regularMarketPrice": 15.6,
                        "regularMarketDayHigh": 15.9,
                        "regularMarketDayLow": 14.8,
                        "regularMarketVolume": 282821,
                        "previousClose": 14.2
                    },
                    "timestamp": [1768435200, 1768521600, 1768780800],
                    "indicators": {
                        "quote": [{
                            "open": [14.0, 14.1, 14.3],
                            "high": [14.4, null, 15.9],
                            "low": [13.9, null, 14.8],
                            "close": [14.3, null, 15.6],
                            "volume": [120000, null, 282821]
                        }],
                        "adjclose": [{ "adjclose": [14.3, null, 15.6] }]
                    }
                }],
                "error": null
            }
        })
    }

    #[test]
    fn test_parse_full_document() {
        let quote = parse_chart("2409.TW", envelope(sample_document())).unwrap();

        let meta = quote.meta.unwrap();
        assert_eq!(meta.current_price, 15.6);
        assert_eq!(meta.day_high, 15.9);
        assert_eq!(meta.day_low, 14.8);
        assert_eq!(meta.volume, 282_821);
        assert_eq!(meta.prev_close, 14.2);

        let series = quote.series.unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.high, vec![Some(14.4), None, Some(15.9)]);
        assert_eq!(series.volume[1], None);
    }

    #[test]
    fn test_missing_meta_fields_default_to_zero() {
        let doc = json!({
            "chart": { "result": [{ "meta": { "regularMarketPrice": 10.0 } }] }
        });
        let quote = parse_chart("X", envelope(doc)).unwrap();

        let meta = quote.meta.unwrap();
        assert_eq!(meta.current_price, 10.0);
        assert_eq!(meta.prev_close, 0.0);
        assert_eq!(meta.volume, 0);
        assert!(quote.series.is_none());
    }

    #[test]
    fn test_missing_chart_is_missing_data() {
        let err = parse_chart("X", envelope(json!({}))).unwrap_err();
        assert!(err.is_missing_data());
    }

    #[test]
    fn test_empty_result_is_missing_data() {
        let err = parse_chart("X", envelope(json!({ "chart": { "result": [] } }))).unwrap_err();
        assert!(err.is_missing_data());
    }

    #[test]
    fn test_upstream_error_is_api_error() {
        let doc = json!({
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
            }
        });
        let err = parse_chart("9999.TW", envelope(doc)).unwrap_err();
        assert!(matches!(err, AnalysisError::ApiError(ref msg) if msg.contains("delisted")));
    }

    #[test]
    fn test_missing_meta_block_keeps_series() {
        let mut doc = sample_document();
        doc["chart"]["result"][0].as_object_mut().unwrap().remove("meta");

        let quote = parse_chart("2409.TW", envelope(doc)).unwrap();
        assert!(quote.meta.is_none());
        assert!(quote.series.is_some());
    }

    #[test]
    fn test_missing_sequence_drops_series() {
        let mut doc = sample_document();
        doc["chart"]["result"][0]["indicators"]["quote"][0]
            .as_object_mut()
            .unwrap()
            .remove("close");

        let quote = parse_chart("2409.TW", envelope(doc)).unwrap();
        assert!(quote.meta.is_some());
        assert!(quote.series.is_none());
    }
}
