use clap::Parser;
use pricewatch_core::market::alpha_vantage::AlphaVantageClient;
use pricewatch_core::market::PriceProvider;
use pricewatch_core::news::newsapi::NewsApiClient;
use pricewatch_core::news::NewsProvider;
use pricewatch_core::notify::smtp::SmtpNotifier;
use pricewatch_core::notify::{LogNotifier, Notifier};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod monitor;
mod watchlist;

#[derive(Debug, Parser)]
#[command(name = "pricewatch_worker")]
struct Args {
    /// Only check these watchlist symbols (comma-separated, e.g. TSLA,NVDA).
    #[arg(long)]
    symbols: Option<String>,

    /// Seconds to wait between symbols to stay under the price provider's rate limit
    /// (default 15).
    #[arg(long)]
    pause_secs: Option<u64>,

    /// Log alert digests instead of sending email.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = pricewatch_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    let entries = watchlist::select(args.symbols.as_deref())?;

    let prices = AlphaVantageClient::from_settings(&settings)?;
    let news = NewsApiClient::from_settings(&settings)?;
    let notifier: Box<dyn Notifier> = if args.dry_run {
        Box::new(LogNotifier)
    } else {
        Box::new(SmtpNotifier::from_settings(&settings))
    };

    let mut opts = monitor::MonitorOptions::default();
    if let Some(secs) = args.pause_secs {
        opts.pause = Duration::from_secs(secs);
    }

    tracing::info!(
        started_at = %chrono::Utc::now(),
        symbols = entries.len(),
        price_provider = prices.provider_name(),
        news_provider = news.provider_name(),
        pause_secs = opts.pause.as_secs(),
        channel = notifier.channel(),
        dry_run = args.dry_run,
        "stock price monitor starting"
    );

    let summary = monitor::run(&entries, &prices, &news, notifier.as_ref(), &opts).await;

    tracing::info!(
        checked = summary.checked,
        skipped = summary.skipped,
        breaches = summary.breaches,
        notified = summary.notified,
        "monitoring complete"
    );
    Ok(())
}

fn init_sentry(settings: &pricewatch_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
