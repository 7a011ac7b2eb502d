use anyhow::Result;
use pricewatch_core::domain::change::{ChangeResult, BREACH_THRESHOLD_PCT};
use pricewatch_core::domain::watchlist::WatchlistEntry;
use pricewatch_core::market::error::MarketDataError;
use pricewatch_core::market::PriceProvider;
use pricewatch_core::news::NewsProvider;
use pricewatch_core::notify::digest::{self, Digest};
use pricewatch_core::notify::Notifier;
use std::time::Duration;

/// Alpha Vantage's free tier allows 5 calls a minute.
pub const DEFAULT_PAUSE: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct MonitorOptions {
    /// Sleep between consecutive watchlist entries (not after the last one).
    pub pause: Duration,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            pause: DEFAULT_PAUSE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    Steady(ChangeResult),
    NoNews(ChangeResult),
    Notified(ChangeResult),
    NotifyFailed(ChangeResult),
}

impl EntryOutcome {
    pub fn change(&self) -> &ChangeResult {
        match self {
            EntryOutcome::Steady(c)
            | EntryOutcome::NoNews(c)
            | EntryOutcome::Notified(c)
            | EntryOutcome::NotifyFailed(c) => c,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub checked: usize,
    pub skipped: usize,
    pub breaches: usize,
    pub notified: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &EntryOutcome) {
        if outcome.change().is_breach() {
            self.breaches += 1;
        }
        if matches!(outcome, EntryOutcome::Notified(_)) {
            self.notified += 1;
        }
    }
}

/// Checks every entry in order. Per-entry failures are logged and counted, never returned.
pub async fn run(
    entries: &[WatchlistEntry],
    prices: &dyn PriceProvider,
    news: &dyn NewsProvider,
    notifier: &dyn Notifier,
    opts: &MonitorOptions,
) -> RunSummary {
    let mut summary = RunSummary::default();

    for (i, entry) in entries.iter().enumerate() {
        summary.checked += 1;
        match check_entry(entry, prices, news, notifier).await {
            Ok(outcome) => summary.record(&outcome),
            Err(err) => {
                summary.skipped += 1;
                report_skip(entry, &err);
            }
        }

        if i + 1 < entries.len() && !opts.pause.is_zero() {
            tracing::info!(
                secs = opts.pause.as_secs(),
                "waiting before next request (API rate limit)"
            );
            tokio::time::sleep(opts.pause).await;
        }
    }

    summary
}

pub async fn check_entry(
    entry: &WatchlistEntry,
    prices: &dyn PriceProvider,
    news: &dyn NewsProvider,
    notifier: &dyn Notifier,
) -> Result<EntryOutcome> {
    let symbol = entry.symbol;
    tracing::info!(symbol, name = entry.name, "checking");

    let closes = prices.fetch_daily_closes(symbol).await?;
    let change = ChangeResult::between(closes.latest.close, closes.previous.close).ok_or_else(
        || MarketDataError::NonPositiveClose {
            symbol: symbol.to_string(),
            close: closes.previous.close,
        },
    )?;

    tracing::info!(
        symbol,
        date = %closes.latest.date,
        "{}",
        digest::price_line(closes.latest.close, &change)
    );

    if !change.is_breach() {
        tracing::info!(symbol, "no significant change (threshold: {BREACH_THRESHOLD_PCT}%)");
        return Ok(EntryOutcome::Steady(change));
    }

    tracing::warn!(symbol, pct = change.pct, "significant change detected; fetching news");
    let articles = news.search(entry.name).await?;
    if articles.is_empty() {
        tracing::info!(symbol, name = entry.name, "no news articles found");
        return Ok(EntryOutcome::NoNews(change));
    }

    let digest = Digest::build(symbol, closes.latest.close, &change, &articles);
    match notifier.send(&digest).await {
        Ok(()) => {
            tracing::info!(symbol, channel = notifier.channel(), subject = %digest.subject, "alert sent");
            Ok(EntryOutcome::Notified(change))
        }
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(symbol, channel = notifier.channel(), error = %format!("{err:#}"), "failed to send alert");
            Ok(EntryOutcome::NotifyFailed(change))
        }
    }
}

fn report_skip(entry: &WatchlistEntry, err: &anyhow::Error) {
    if let Some(market_err) = err.downcast_ref::<MarketDataError>() {
        if let MarketDataError::MissingTimeSeries { detail, .. } = market_err {
            tracing::warn!(symbol = market_err.symbol(), detail = %detail, "could not get price data; skipping");
            return;
        }
    }

    sentry_anyhow::capture_anyhow(err);
    tracing::error!(symbol = entry.symbol, error = %format!("{err:#}"), "error checking symbol; skipping");
}
