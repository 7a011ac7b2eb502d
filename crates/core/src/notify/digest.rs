use crate::domain::change::ChangeResult;
use crate::news::{NewsArticle, MAX_ARTICLES};
use std::fmt::Write;

const SEPARATOR_WIDTH: usize = 50;
const MISSING: &str = "N/A";

/// Subject and plain-text body for one breaching ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub subject: String,
    pub body: String,
}

impl Digest {
    /// Renders at most [`MAX_ARTICLES`] articles. A missing headline, brief or link
    /// prints as `N/A`.
    pub fn build(
        symbol: &str,
        latest_close: f64,
        change: &ChangeResult,
        articles: &[NewsArticle],
    ) -> Self {
        let headline = format!(
            "{}{}%",
            change.direction.glyph(),
            change.rounded_pct()
        );

        let mut body = String::new();
        let _ = writeln!(body, "{symbol}: {headline}");
        let _ = writeln!(body, "Price: ${latest_close:.2}");
        let _ = writeln!(body, "{}", "=".repeat(SEPARATOR_WIDTH));
        body.push('\n');

        for (i, article) in articles.iter().take(MAX_ARTICLES).enumerate() {
            let _ = writeln!(body, "📰 Article {}:", i + 1);
            let _ = writeln!(body, "Headline: {}", or_missing(&article.title));
            let _ = writeln!(body, "Brief: {}", or_missing(&article.description));
            let _ = writeln!(body, "Link: {}", or_missing(&article.url));
            body.push('\n');
        }

        Self {
            subject: format!("🚨 {symbol} Stock Alert: {headline}"),
            body,
        }
    }
}

/// Console line for a checked ticker, e.g. `Price: $106.00 (🔺6.00%)`.
pub fn price_line(latest_close: f64, change: &ChangeResult) -> String {
    format!(
        "Price: ${latest_close:.2} ({}{:.2}%)",
        change.direction.glyph(),
        change.pct
    )
}

fn or_missing(v: &Option<String>) -> &str {
    v.as_deref().unwrap_or(MISSING)
}
