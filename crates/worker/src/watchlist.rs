use pricewatch_core::domain::watchlist::WatchlistEntry;

pub const DEFAULT_WATCHLIST: &[WatchlistEntry] = &[
    // Mega-cap tech
    WatchlistEntry::new("TSLA", "Tesla Inc"),
    WatchlistEntry::new("NVDA", "NVIDIA Corporation"),
    WatchlistEntry::new("AAPL", "Apple Inc"),
    WatchlistEntry::new("MSFT", "Microsoft Corporation"),
    WatchlistEntry::new("GOOGL", "Alphabet Inc"),
    WatchlistEntry::new("AMZN", "Amazon.com Inc"),
    WatchlistEntry::new("META", "Meta Platforms Inc"),
    // Semiconductors
    WatchlistEntry::new("AMD", "Advanced Micro Devices"),
    WatchlistEntry::new("INTC", "Intel Corporation"),
    WatchlistEntry::new("MU", "Micron Technology"),
    // Finance and crypto
    WatchlistEntry::new("COIN", "Coinbase Global Inc"),
    WatchlistEntry::new("V", "Visa Inc"),
    WatchlistEntry::new("MA", "Mastercard Inc"),
    // Growth
    WatchlistEntry::new("PLTR", "Palantir Technologies"),
    WatchlistEntry::new("MSTR", "MicroStrategy Inc"),
    WatchlistEntry::new("MRVL", "Marvell Technology"),
];

/// Restricts the built-in list to a comma-separated set of symbols.
/// Order always follows the built-in list; `None` selects everything.
pub fn select(symbols: Option<&str>) -> anyhow::Result<Vec<WatchlistEntry>> {
    let Some(symbols) = symbols else {
        return Ok(DEFAULT_WATCHLIST.to_vec());
    };

    let wanted: Vec<String> = symbols
        .split(',')
        .map(|s| s.trim().to_ascii_uppercase())
        .filter(|s| !s.is_empty())
        .collect();
    anyhow::ensure!(!wanted.is_empty(), "--symbols must name at least one ticker");

    for symbol in &wanted {
        anyhow::ensure!(
            DEFAULT_WATCHLIST.iter().any(|e| e.symbol == symbol.as_str()),
            "unknown symbol {symbol} (not on the watchlist)"
        );
    }

    Ok(DEFAULT_WATCHLIST
        .iter()
        .filter(|e| wanted.iter().any(|w| w == e.symbol))
        .copied()
        .collect())
}
