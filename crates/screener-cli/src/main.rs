//! screener: score a watch-list for day-trading suitability.
//!
//! Fetches five sessions of daily bars per symbol, scores each one against the
//! volume / amplitude / trend rubric, prints the top results and saves the full
//! ranking as JSON.
//!
//! Usage:
//!   cargo run -p screener-cli                                   # built-in Taiwan watch-list
//!   cargo run -p screener-cli -- --symbols 2330.TW:TSMC 2303.TW
//!   cargo run -p screener-cli -- --watchlist watchlist.json --top 5
//!   cargo run -p screener-cli -- --concurrency 4 --dry-run

mod config;
mod watchlist;

use analysis_core::WatchlistEntry;
use anyhow::{Context, Result};
use chart_client::ChartClient;
use config::ScreenerConfig;
use day_trade_screener::{format_summary, write_results, DayTradeScanner};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    symbols: Vec<String>,
    watchlist: Option<PathBuf>,
    top_n: Option<usize>,
    concurrency: Option<usize>,
    timeout_secs: Option<u64>,
    output: Option<PathBuf>,
    dry_run: bool,
    help: bool,
}

impl CliArgs {
    fn parse(args: &[String]) -> Result<Self> {
        fn value<'a>(args: &'a [String], flag: &str) -> Option<&'a String> {
            args.iter().position(|a| a == flag).and_then(|i| args.get(i + 1))
        }

        fn number<T: std::str::FromStr>(args: &[String], flag: &str) -> Result<Option<T>> {
            match value(args, flag) {
                Some(v) => v
                    .parse()
                    .map(Some)
                    .map_err(|_| anyhow::anyhow!("{} expects a number, got '{}'", flag, v)),
                None => Ok(None),
            }
        }

        let symbols = match args.iter().position(|a| a == "--symbols") {
            Some(idx) => args[idx + 1..]
                .iter()
                .take_while(|a| !a.starts_with("--"))
                .cloned()
                .collect(),
            None => Vec::new(),
        };

        Ok(Self {
            symbols,
            watchlist: value(args, "--watchlist").map(PathBuf::from),
            top_n: number(args, "--top")?,
            concurrency: number(args, "--concurrency")?,
            timeout_secs: number(args, "--timeout")?,
            output: value(args, "--output").map(PathBuf::from),
            dry_run: args.iter().any(|a| a == "--dry-run"),
            help: args.iter().any(|a| a == "--help" || a == "-h"),
        })
    }

    fn apply(&self, config: &mut ScreenerConfig) -> Result<()> {
        if let Some(n) = self.top_n {
            config.top_n = n;
        }
        if let Some(n) = self.concurrency {
            config.concurrency = n;
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = secs;
        }
        if let Some(ref path) = self.output {
            config.output_path = path.clone();
        }
        config.validate()
    }

    fn watchlist(&self) -> Result<Vec<WatchlistEntry>> {
        if !self.symbols.is_empty() {
            self.symbols.iter().map(|s| watchlist::parse_entry(s)).collect()
        } else if let Some(ref path) = self.watchlist {
            watchlist::load_watchlist(path)
        } else {
            Ok(watchlist::default_watchlist())
        }
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  screener                                 Score the built-in Taiwan watch-list");
    eprintln!("  screener --symbols SYM[:NAME] ...        Score specific symbols");
    eprintln!("  screener --watchlist FILE                Score a JSON watch-list [{{\"symbol\", \"name\"}}]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --top N            Results shown in the summary (default: 10)");
    eprintln!("  --concurrency N    Symbols fetched in parallel (default: 1)");
    eprintln!("  --timeout SECS     Timeout of each chart request (default: 15)");
    eprintln!("  --output PATH      JSON result file (default: stock_analysis_results.json)");
    eprintln!("  --dry-run          Print the summary without writing the result file");
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "screener=info,day_trade_screener=info,chart_client=warn".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = CliArgs::parse(&args)?;
    if cli.help {
        print_usage();
        return Ok(());
    }

    let mut config = ScreenerConfig::from_env().context("Invalid screener configuration")?;
    cli.apply(&mut config)?;
    let entries = cli.watchlist()?;

    tracing::info!(
        "screener: {} symbols, region={}, window={}/{}, concurrency={}, dry_run={}",
        entries.len(),
        config.region,
        config.interval,
        config.range,
        config.concurrency,
        cli.dry_run
    );

    let client = ChartClient::new(config.chart_api_base_url.clone(), config.chart_rate_limit)
        .with_request_timeout(config.request_timeout());
    let client = Arc::new(client);
    let scanner = DayTradeScanner::new(client, config.scan_config());

    let report = scanner.scan(&entries).await;

    println!("{}", format_summary(&report));

    if !cli.dry_run {
        write_results(&config.output_path, &report.ranked)?;
        println!("Results saved to {}", config.output_path.display());
    }

    Ok(())
}
