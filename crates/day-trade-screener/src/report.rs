//! Result document and console summary.

use std::fmt::Write as _;
use std::path::Path;

use analysis_core::ScoreResult;
use anyhow::{Context, Result};

use crate::scanner::ScanReport;
use crate::scoring::format_thousands;

const RULE: &str = "================================================================================";

/// Render the ranked results as a pretty-printed JSON array
pub fn to_document(results: &[ScoreResult]) -> Result<String> {
    serde_json::to_string_pretty(results).context("Failed to serialize score results")
}

/// Write the ranked results to `path`, replacing any previous run
pub fn write_results(path: &Path, results: &[ScoreResult]) -> Result<()> {
    let document = to_document(results)?;
    std::fs::write(path, document).with_context(|| format!("Failed to write results to {}", path.display()))?;
    tracing::info!("Saved {} results to {}", results.len(), path.display());
    Ok(())
}

/// Human-readable summary of the top-N view
pub fn format_summary(report: &ScanReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "Results by score ({})", report.started_at.format("%Y-%m-%d %H:%M:%S UTC"));
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out);

    if report.ranked.is_empty() {
        let _ = writeln!(out, "No symbol could be scored.");
    }

    for (i, r) in report.top().iter().enumerate() {
        let _ = writeln!(out, "{}. {} ({})", i + 1, r.name, r.symbol);
        let _ = writeln!(out, "   Score: {}/100", r.score);
        let _ = writeln!(out, "   Price: ${:.2}", r.current_price);
        let _ = writeln!(out, "   Daily change: {:+.2}%", r.metrics.daily_change_pct);
        let _ = writeln!(out, "   Today amplitude: {:.2}%", r.metrics.today_amplitude_pct);
        let _ = writeln!(out, "   Volume: {} shares", format_thousands(r.volume));
        let _ = writeln!(out, "   Avg amplitude: {:.2}%", r.metrics.avg_amplitude_pct);
        let _ = writeln!(out, "   5d trend: {:+.2}%", r.metrics.trend_5d_pct);
        let _ = writeln!(out, "   Strengths: {}", r.reasons.join(", "));
        let _ = writeln!(out);
    }

    if !report.skipped.is_empty() {
        let _ = writeln!(out, "Skipped {} symbol(s):", report.skipped.len());
        for s in &report.skipped {
            let _ = writeln!(out, "   {} ({}): {}", s.name, s.symbol, s.reason);
        }
    }

    out
}
