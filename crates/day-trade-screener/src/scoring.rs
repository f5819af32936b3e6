//! Scoring Module
//!
//! Weighted rubric that turns derived metrics into a 0-100 day-trading score.
//! Each category is a list of bands checked from the highest threshold down;
//! the first band that matches awards its points and the rest are ignored.

use analysis_core::DerivedMetrics;

/// How a category's measured value is rendered inside a reason string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    /// Whole shares with thousands separators
    Shares,
    /// Percentage with two decimals
    Percent,
}

impl ValueFormat {
    pub fn render(&self, value: f64) -> String {
        match self {
            ValueFormat::Shares => format!("{} shares", format_thousands(value.max(0.0).round() as u64)),
            ValueFormat::Percent => format!("{:.2}%", value),
        }
    }
}

/// One tier of a category: matches when `above < value` and, if set, `value < below`
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub above: f64,
    pub below: Option<f64>,
    pub points: u32,
    pub label: &'static str,
}

impl Band {
    pub fn above(above: f64, points: u32, label: &'static str) -> Self {
        Self {
            above,
            below: None,
            points,
            label,
        }
    }

    pub fn between(above: f64, below: f64, points: u32, label: &'static str) -> Self {
        Self {
            above,
            below: Some(below),
            points,
            label,
        }
    }

    pub fn matches(&self, value: f64) -> bool {
        value > self.above && self.below.map_or(true, |b| value < b)
    }
}

/// Which measurement a category reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Volume,
    TodayAmplitude,
    DailyChange,
    AvgAmplitude,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub measure: Measure,
    pub format: ValueFormat,
    /// Checked in order, first match wins
    pub bands: Vec<Band>,
}

impl Category {
    /// Highest points this category can award
    pub fn weight(&self) -> u32 {
        self.bands.iter().map(|b| b.points).max().unwrap_or(0)
    }

    /// Points and reason for `value`, or `None` when no band matches
    pub fn evaluate(&self, value: f64) -> Option<(u32, String)> {
        self.bands
            .iter()
            .find(|band| band.matches(value))
            .filter(|band| band.points > 0)
            .map(|band| (band.points, format!("{} ({})", band.label, self.format.render(value))))
    }
}

/// Ordered set of scoring categories
#[derive(Debug, Clone, PartialEq)]
pub struct Rubric {
    pub categories: Vec<Category>,
}

impl Rubric {
    /// Volume 30, today amplitude 30, daily trend 20, average amplitude 20.
    ///
    /// The daily-trend bands overlap on (0, 8): inside it the narrower band is
    /// checked first and wins, at 8% and above only the 10-point band matches.
    pub fn day_trading() -> Self {
        Self {
            categories: vec![
                Category {
                    measure: Measure::Volume,
                    format: ValueFormat::Shares,
                    bands: vec![
                        Band::above(50_000.0, 30, "volume sufficient"),
                        Band::above(20_000.0, 20, "volume good"),
                        Band::above(10_000.0, 10, "volume adequate"),
                    ],
                },
                Category {
                    measure: Measure::TodayAmplitude,
                    format: ValueFormat::Percent,
                    bands: vec![
                        Band::above(5.0, 30, "large intraday amplitude"),
                        Band::above(3.0, 20, "moderate intraday amplitude"),
                        Band::above(2.0, 10, "adequate intraday amplitude"),
                    ],
                },
                Category {
                    measure: Measure::DailyChange,
                    format: ValueFormat::Percent,
                    bands: vec![
                        Band::between(0.0, 8.0, 20, "healthy daily gain"),
                        Band::above(0.0, 10, "daily gain"),
                    ],
                },
                Category {
                    measure: Measure::AvgAmplitude,
                    format: ValueFormat::Percent,
                    bands: vec![
                        Band::above(4.0, 20, "high average amplitude"),
                        Band::above(3.0, 15, "good average amplitude"),
                        Band::above(2.0, 10, "adequate average amplitude"),
                    ],
                },
            ],
        }
    }

    pub fn max_score(&self) -> u32 {
        self.categories.iter().map(Category::weight).sum()
    }
}

impl Default for Rubric {
    fn default() -> Self {
        Self::day_trading()
    }
}

/// Score plus one reason per category that awarded points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreCard {
    pub score: u32,
    pub reasons: Vec<String>,
}

/// Applies a [`Rubric`] to derived metrics
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    rubric: Rubric,
}

impl ScoringEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score one symbol from its raw session volume and derived metrics
    pub fn score(&self, volume: u64, metrics: &DerivedMetrics) -> ScoreCard {
        let mut score = 0;
        let mut reasons = Vec::new();

        for category in &self.rubric.categories {
            let value = match category.measure {
                Measure::Volume => volume as f64,
                Measure::TodayAmplitude => metrics.today_amplitude_pct,
                Measure::DailyChange => metrics.daily_change_pct,
                Measure::AvgAmplitude => metrics.avg_amplitude_pct,
            };

            if let Some((points, reason)) = category.evaluate(value) {
                score += points;
                reasons.push(reason);
            }
        }

        ScoreCard { score, reasons }
    }
}

/// `1234567` -> `"1,234,567"`
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
