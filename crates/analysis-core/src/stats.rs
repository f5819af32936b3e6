//! Guarded arithmetic shared by the metric extractors.
//!
//! Every helper here returns `0.0` instead of dividing by zero or averaging an
//! empty set, so callers can treat `0` as the defined fallback.

/// Mean of a data slice, `0.0` when empty.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Mean of the defined samples, `0.0` when none are defined.
pub fn mean_defined(data: &[Option<f64>]) -> f64 {
    let defined: Vec<f64> = data.iter().flatten().copied().collect();
    mean(&defined)
}

/// `(to - from) / from * 100`, or `0.0` when `from` is zero.
pub fn pct_change(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        return 0.0;
    }
    (to - from) / from * 100.0
}

/// `(high - low) / base * 100`, or `0.0` when `base` is not positive.
pub fn range_pct(high: f64, low: f64, base: f64) -> f64 {
    if base > 0.0 {
        (high - low) / base * 100.0
    } else {
        0.0
    }
}
