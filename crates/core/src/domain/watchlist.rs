/// A ticker to monitor and the company name used as the news search term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchlistEntry {
    pub symbol: &'static str,
    pub name: &'static str,
}

impl WatchlistEntry {
    pub const fn new(symbol: &'static str, name: &'static str) -> Self {
        Self { symbol, name }
    }
}
