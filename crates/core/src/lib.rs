pub mod domain;
pub mod market;
pub mod news;
pub mod notify;

pub mod config {
    use anyhow::Context;

    pub const DEFAULT_ALPHA_VANTAGE_BASE_URL: &str = "https://www.alphavantage.co/query";
    pub const DEFAULT_NEWS_API_BASE_URL: &str = "https://newsapi.org/v2/everything";
    pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
    pub const DEFAULT_SMTP_PORT: u16 = 587;
    pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub alpha_vantage_api_key: Option<String>,
        pub alpha_vantage_base_url: String,
        pub news_api_key: Option<String>,
        pub news_api_base_url: String,
        pub email_address: Option<String>,
        pub email_password: Option<String>,
        pub email_to: Option<String>,
        pub smtp_host: String,
        pub smtp_port: u16,
        pub http_timeout_secs: u64,
        pub sentry_dsn: Option<String>,
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                alpha_vantage_api_key: None,
                alpha_vantage_base_url: DEFAULT_ALPHA_VANTAGE_BASE_URL.to_string(),
                news_api_key: None,
                news_api_base_url: DEFAULT_NEWS_API_BASE_URL.to_string(),
                email_address: None,
                email_password: None,
                email_to: None,
                smtp_host: DEFAULT_SMTP_HOST.to_string(),
                smtp_port: DEFAULT_SMTP_PORT,
                http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
                sentry_dsn: None,
            }
        }
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_lookup(|key| std::env::var(key).ok())
        }

        /// Builds settings from an arbitrary key lookup. Blank values count as unset.
        pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
        where
            F: Fn(&str) -> Option<String>,
        {
            let get = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());
            let defaults = Self::default();

            let smtp_port = match get("SMTP_PORT") {
                Some(s) => s
                    .trim()
                    .parse::<u16>()
                    .with_context(|| format!("SMTP_PORT must be a port number (got {s})"))?,
                None => defaults.smtp_port,
            };

            let http_timeout_secs = match get("HTTP_TIMEOUT_SECS") {
                Some(s) => s
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("HTTP_TIMEOUT_SECS must be an integer (got {s})"))?,
                None => defaults.http_timeout_secs,
            };

            Ok(Self {
                alpha_vantage_api_key: get("ALPHA_VANTAGE_API_KEY"),
                alpha_vantage_base_url: get("ALPHA_VANTAGE_BASE_URL")
                    .unwrap_or(defaults.alpha_vantage_base_url),
                news_api_key: get("NEWS_API_KEY"),
                news_api_base_url: get("NEWS_API_BASE_URL").unwrap_or(defaults.news_api_base_url),
                email_address: get("EMAIL_ADDRESS"),
                email_password: get("EMAIL_PASSWORD"),
                email_to: get("EMAIL_TO"),
                smtp_host: get("SMTP_HOST").unwrap_or(defaults.smtp_host),
                smtp_port,
                http_timeout_secs,
                sentry_dsn: get("SENTRY_DSN"),
            })
        }

        pub fn require_email_address(&self) -> anyhow::Result<&str> {
            self.email_address
                .as_deref()
                .context("EMAIL_ADDRESS is required")
        }

        pub fn require_email_password(&self) -> anyhow::Result<&str> {
            self.email_password
                .as_deref()
                .context("EMAIL_PASSWORD is required")
        }

        pub fn require_email_to(&self) -> anyhow::Result<&str> {
            self.email_to.as_deref().context("EMAIL_TO is required")
        }

        pub fn http_client(&self) -> anyhow::Result<reqwest::Client> {
            reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(self.http_timeout_secs))
                .user_agent(concat!("pricewatch/", env!("CARGO_PKG_VERSION")))
                .build()
                .context("failed to build reqwest client")
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::collections::HashMap;

        fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
            let map: HashMap<String, String> = pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            move |key| map.get(key).cloned()
        }

        #[test]
        fn empty_environment_uses_defaults() {
            let s = Settings::from_lookup(lookup(&[])).unwrap();
            assert_eq!(s.alpha_vantage_base_url, DEFAULT_ALPHA_VANTAGE_BASE_URL);
            assert_eq!(s.news_api_base_url, DEFAULT_NEWS_API_BASE_URL);
            assert_eq!(s.smtp_host, "smtp.gmail.com");
            assert_eq!(s.smtp_port, 587);
            assert!(s.alpha_vantage_api_key.is_none());
            assert!(s.require_email_to().is_err());
        }

        #[test]
        fn reads_credentials_and_overrides() {
            let s = Settings::from_lookup(lookup(&[
                ("ALPHA_VANTAGE_API_KEY", "av-key"),
                ("NEWS_API_KEY", "news-key"),
                ("EMAIL_ADDRESS", "me@example.com"),
                ("EMAIL_PASSWORD", "app-token"),
                ("EMAIL_TO", "you@example.com"),
                ("SMTP_PORT", "2525"),
                ("HTTP_TIMEOUT_SECS", "5"),
            ]))
            .unwrap();

            assert_eq!(s.alpha_vantage_api_key.as_deref(), Some("av-key"));
            assert_eq!(s.news_api_key.as_deref(), Some("news-key"));
            assert_eq!(s.require_email_address().unwrap(), "me@example.com");
            assert_eq!(s.require_email_password().unwrap(), "app-token");
            assert_eq!(s.require_email_to().unwrap(), "you@example.com");
            assert_eq!(s.smtp_port, 2525);
            assert_eq!(s.http_timeout_secs, 5);
        }

        #[test]
        fn blank_values_count_as_missing() {
            let s = Settings::from_lookup(lookup(&[("EMAIL_TO", "  ")])).unwrap();
            let err = s.require_email_to().unwrap_err();
            assert_eq!(err.to_string(), "EMAIL_TO is required");
        }

        #[test]
        fn rejects_unparseable_port() {
            assert!(Settings::from_lookup(lookup(&[("SMTP_PORT", "smtp")])).is_err());
        }
    }
}
