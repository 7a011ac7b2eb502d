use crate::config::Settings;
use crate::news::{NewsArticle, NewsProvider, MAX_ARTICLES};
use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct NewsApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    // `null` and a missing key both mean no articles.
    #[serde(default)]
    articles: Option<Vec<NewsArticle>>,
}

impl NewsApiClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(
            settings.http_client()?,
            settings.news_api_base_url.clone(),
            settings.news_api_key.clone(),
        ))
    }

    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key,
        }
    }
}

#[async_trait::async_trait]
impl NewsProvider for NewsApiClient {
    fn provider_name(&self) -> &'static str {
        "newsapi"
    }

    async fn search(&self, query: &str) -> Result<Vec<NewsArticle>> {
        let mut params = vec![("q", query)];
        if let Some(api_key) = self.api_key.as_deref() {
            params.push(("apiKey", api_key));
        }

        let res = self
            .http
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .with_context(|| format!("news request for {query:?} failed"))?;

        // Error statuses still carry a JSON body with status/code/message.
        let text = res.text().await.context("failed to read news response")?;
        let parsed = serde_json::from_str::<EverythingResponse>(&text)
            .with_context(|| format!("news response is not valid JSON: {text}"))?;

        Ok(take_articles(query, parsed))
    }
}

fn take_articles(query: &str, resp: EverythingResponse) -> Vec<NewsArticle> {
    if resp.status.as_deref() == Some("error") {
        tracing::warn!(
            query,
            code = resp.code.as_deref().unwrap_or("unknown"),
            message = resp.message.as_deref().unwrap_or(""),
            "news provider returned an error; treating as no articles"
        );
        return Vec::new();
    }

    let mut articles = resp.articles.unwrap_or_default();
    articles.truncate(MAX_ARTICLES);
    articles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resp(raw: &str) -> EverythingResponse {
        serde_json::from_str(raw).unwrap()
    }

    fn titles(articles: &[NewsArticle]) -> Vec<&str> {
        articles
            .iter()
            .map(|a| a.title.as_deref().unwrap_or(""))
            .collect()
    }

    #[test]
    fn keeps_first_three_in_provider_order() {
        let r = resp(
            r#"{"status":"ok","totalResults":5,"articles":[
                {"title":"e","description":"d5","url":"https://x/5"},
                {"title":"b","description":"d2","url":"https://x/2"},
                {"title":"a","description":"d1","url":"https://x/1"},
                {"title":"c","description":"d3","url":"https://x/3"},
                {"title":"d","description":"d4","url":"https://x/4"}
            ]}"#,
        );
        let out = take_articles("Tesla Inc", r);
        assert_eq!(titles(&out), vec!["e", "b", "a"]);
    }

    #[test]
    fn fewer_than_three_are_kept_as_is() {
        let r = resp(r#"{"status":"ok","articles":[{"title":"only","description":null}]}"#);
        let out = take_articles("Tesla Inc", r);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].description, None);
        assert_eq!(out[0].url, None);
    }

    #[test]
    fn error_status_and_missing_articles_yield_nothing() {
        let r = resp(r#"{"status":"error","code":"apiKeyMissing","message":"Your API key is missing."}"#);
        assert!(take_articles("Tesla Inc", r).is_empty());

        let r = resp(r#"{"status":"ok","totalResults":0}"#);
        assert!(take_articles("Tesla Inc", r).is_empty());

        let r = resp(r#"{"status":"ok","articles":null}"#);
        assert!(take_articles("Tesla Inc", r).is_empty());
    }
}
