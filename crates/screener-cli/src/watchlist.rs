use analysis_core::WatchlistEntry;
use anyhow::{Context, Result};
use std::path::Path;

/// Built-in Taiwan watch-list, picked by trading volume and sector momentum
const DEFAULT_WATCHLIST: &[(&str, &str)] = &[
    ("2409.TW", "AUO"),
    ("3481.TW", "Innolux"),
    ("3037.TW", "Unimicron"),
    ("8150.TW", "ChipMOS"),
    ("2312.TW", "Kinpo Electronics"),
    ("1802.TW", "Taiwan Glass"),
    ("8110.TW", "Walton Advanced Engineering"),
    ("1815.TWO", "Fulltech Fiber Glass"),
    ("6282.TW", "AcBel Polytech"),
    ("2485.TW", "Zinwell"),
    ("1303.TW", "Nan Ya Plastics"),
    ("2303.TW", "UMC"),
    ("1717.TW", "Eternal Materials"),
    ("3231.TW", "Wistron"),
];

pub fn default_watchlist() -> Vec<WatchlistEntry> {
    DEFAULT_WATCHLIST
        .iter()
        .map(|(symbol, name)| WatchlistEntry::new(*symbol, *name))
        .collect()
}

/// Parse `SYMBOL` or `SYMBOL:NAME`; a bare symbol is its own display name
pub fn parse_entry(arg: &str) -> Result<WatchlistEntry> {
    let (symbol, name) = match arg.split_once(':') {
        Some((symbol, name)) => (symbol.trim(), name.trim()),
        None => (arg.trim(), arg.trim()),
    };

    if symbol.is_empty() {
        anyhow::bail!("empty symbol in '{}'", arg);
    }
    let name = if name.is_empty() { symbol } else { name };

    Ok(WatchlistEntry::new(symbol, name))
}

/// Load a JSON array of `{"symbol": .., "name": ..}` records
pub fn load_watchlist(path: &Path) -> Result<Vec<WatchlistEntry>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read watch-list {}", path.display()))?;
    parse_watchlist(&raw).with_context(|| format!("Invalid watch-list {}", path.display()))
}

pub fn parse_watchlist(raw: &str) -> Result<Vec<WatchlistEntry>> {
    let entries: Vec<WatchlistEntry> = serde_json::from_str(raw)?;
    Ok(entries)
}
