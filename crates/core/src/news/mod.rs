pub mod newsapi;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// At most this many articles make it into a digest.
pub const MAX_ARTICLES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewsArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[async_trait::async_trait]
pub trait NewsProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// Free-text search; returns at most [`MAX_ARTICLES`] articles in provider order.
    async fn search(&self, query: &str) -> Result<Vec<NewsArticle>>;
}
