pub mod alpha_vantage;
pub mod error;

use anyhow::Result;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyClose {
    pub date: NaiveDate,
    pub close: f64,
}

/// The two most recent closes, in the provider's own newest-first order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosePair {
    pub latest: DailyClose,
    pub previous: DailyClose,
}

#[async_trait::async_trait]
pub trait PriceProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn fetch_daily_closes(&self, symbol: &str) -> Result<ClosePair>;
}
