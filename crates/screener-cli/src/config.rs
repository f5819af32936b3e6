use anyhow::{Context, Result};
use day_trade_screener::ScanConfig;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenerConfig {
    // Chart API
    pub chart_api_base_url: String,
    pub chart_rate_limit: usize,    // requests per minute

    // Query window
    pub region: String,             // "TW"
    pub interval: String,           // "1d"
    pub range: String,              // "5d"

    // Run
    pub top_n: usize,               // 10
    pub concurrency: usize,         // 1 = sequential
    pub timeout_secs: u64,          // per HTTP attempt
    pub output_path: PathBuf,
}

impl ScreenerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; missing keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let config = Self {
            chart_api_base_url: var("CHART_API_BASE_URL", chart_client::DEFAULT_BASE_URL),
            chart_rate_limit: var("CHART_RATE_LIMIT", "60")
                .parse()
                .context("CHART_RATE_LIMIT must be a positive integer")?,

            region: var("SCREENER_REGION", "TW"),
            interval: var("SCREENER_INTERVAL", "1d"),
            range: var("SCREENER_RANGE", "5d"),

            top_n: var("SCREENER_TOP_N", "10")
                .parse()
                .context("SCREENER_TOP_N must be a non-negative integer")?,
            concurrency: var("SCREENER_CONCURRENCY", "1")
                .parse()
                .context("SCREENER_CONCURRENCY must be a positive integer")?,
            timeout_secs: var("SCREENER_TIMEOUT_SECS", "15")
                .parse()
                .context("SCREENER_TIMEOUT_SECS must be a positive integer")?,
            output_path: PathBuf::from(var("SCREENER_OUTPUT", "stock_analysis_results.json")),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            anyhow::bail!("concurrency must be at least 1");
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout must be at least 1 second");
        }
        if self.chart_rate_limit == 0 {
            anyhow::bail!("CHART_RATE_LIMIT must be at least 1");
        }
        Ok(())
    }

    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            region: self.region.clone(),
            interval: self.interval.clone(),
            range: self.range.clone(),
            concurrency: self.concurrency,
            top_n: self.top_n,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
