use std::fmt;

/// Market-data payload problems. Transport failures stay plain `anyhow` errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// The provider answered without the time-series key, usually a rate-limit note.
    MissingTimeSeries { symbol: String, detail: String },
    InsufficientHistory { symbol: String, found: usize },
    MalformedRecord { symbol: String, detail: String },
    NonPositiveClose { symbol: String, close: f64 },
}

impl MarketDataError {
    pub fn symbol(&self) -> &str {
        match self {
            MarketDataError::MissingTimeSeries { symbol, .. }
            | MarketDataError::InsufficientHistory { symbol, .. }
            | MarketDataError::MalformedRecord { symbol, .. }
            | MarketDataError::NonPositiveClose { symbol, .. } => symbol,
        }
    }
}

impl fmt::Display for MarketDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketDataError::MissingTimeSeries { symbol, detail } => {
                write!(f, "could not get data for {symbol}: {detail}")
            }
            MarketDataError::InsufficientHistory { symbol, found } => write!(
                f,
                "need two daily closes for {symbol}, provider returned {found}"
            ),
            MarketDataError::MalformedRecord { symbol, detail } => {
                write!(f, "malformed daily record for {symbol}: {detail}")
            }
            MarketDataError::NonPositiveClose { symbol, close } => {
                write!(f, "previous close for {symbol} is not positive ({close})")
            }
        }
    }
}

impl std::error::Error for MarketDataError {}
