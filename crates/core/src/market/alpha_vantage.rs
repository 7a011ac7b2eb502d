use crate::config::Settings;
use crate::market::error::MarketDataError;
use crate::market::{ClosePair, DailyClose, PriceProvider};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde_json::Value;

const FUNCTION_DAILY: &str = "TIME_SERIES_DAILY";
const TIME_SERIES_KEY: &str = "Time Series (Daily)";
const CLOSE_KEY: &str = "4. close";

// Keys Alpha Vantage uses for throttling notices and bad requests, in lookup order.
const PROVIDER_MESSAGE_KEYS: [&str; 3] = ["Note", "Error Message", "Information"];

#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl AlphaVantageClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(
            settings.http_client()?,
            settings.alpha_vantage_base_url.clone(),
            settings.alpha_vantage_api_key.clone(),
        ))
    }

    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key,
        }
    }

    async fn fetch_raw(&self, symbol: &str) -> Result<Value> {
        let mut query = vec![("function", FUNCTION_DAILY), ("symbol", symbol)];
        if let Some(api_key) = self.api_key.as_deref() {
            query.push(("apikey", api_key));
        }

        let res = self
            .http
            .get(&self.base_url)
            .query(&query)
            .send()
            .await
            .with_context(|| format!("market data request for {symbol} failed"))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read market data response")?;
        let raw_json = match serde_json::from_str::<Value>(&text) {
            Ok(v) => v,
            Err(_) if !status.is_success() => anyhow::bail!("market data HTTP {status}: {text}"),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("market data response is not valid JSON: {text}"))
            }
        };

        // Throttling notices can arrive with an error status; let them reach the typed path.
        if !status.is_success()
            && raw_json.get(TIME_SERIES_KEY).is_none()
            && provider_message(&raw_json).is_none()
        {
            anyhow::bail!("market data HTTP {status}: {raw_json}");
        }

        Ok(raw_json)
    }
}

#[async_trait::async_trait]
impl PriceProvider for AlphaVantageClient {
    fn provider_name(&self) -> &'static str {
        "alpha_vantage"
    }

    async fn fetch_daily_closes(&self, symbol: &str) -> Result<ClosePair> {
        let payload = self.fetch_raw(symbol).await?;
        Ok(parse_daily_closes(symbol, &payload)?)
    }
}

/// Takes the first two records of the daily series as yesterday and the day before.
/// The provider lists newest first; dates are not re-sorted here.
pub fn parse_daily_closes(symbol: &str, payload: &Value) -> Result<ClosePair, MarketDataError> {
    let Some(series) = payload.get(TIME_SERIES_KEY).and_then(Value::as_object) else {
        return Err(MarketDataError::MissingTimeSeries {
            symbol: symbol.to_string(),
            detail: provider_message(payload)
                .unwrap_or("Unknown error")
                .to_string(),
        });
    };

    let mut records = series.iter();
    let (Some(first), Some(second)) = (records.next(), records.next()) else {
        return Err(MarketDataError::InsufficientHistory {
            symbol: symbol.to_string(),
            found: series.len(),
        });
    };

    let latest = parse_record(symbol, first.0, first.1)?;
    let previous = parse_record(symbol, second.0, second.1)?;

    if previous.close <= 0.0 {
        return Err(MarketDataError::NonPositiveClose {
            symbol: symbol.to_string(),
            close: previous.close,
        });
    }

    Ok(ClosePair { latest, previous })
}

fn parse_record(symbol: &str, date: &str, record: &Value) -> Result<DailyClose, MarketDataError> {
    let malformed = |detail: String| MarketDataError::MalformedRecord {
        symbol: symbol.to_string(),
        detail,
    };

    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| malformed(format!("bad date {date:?}: {e}")))?;

    // Alpha Vantage quotes prices as strings; accept bare numbers too.
    let close = match record.get(CLOSE_KEY) {
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Number(n)) => n.as_f64(),
        _ => None,
    }
    .filter(|v| v.is_finite())
    .ok_or_else(|| malformed(format!("{date}: missing or invalid {CLOSE_KEY:?}")))?;

    Ok(DailyClose { date, close })
}

fn provider_message(payload: &Value) -> Option<&str> {
    PROVIDER_MESSAGE_KEYS
        .iter()
        .find_map(|key| payload.get(*key).and_then(Value::as_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(symbol: &str, raw: &str) -> Result<ClosePair, MarketDataError> {
        let v: Value = serde_json::from_str(raw).unwrap();
        parse_daily_closes(symbol, &v)
    }

    #[test]
    fn takes_first_two_records_as_latest_and_previous() {
        let raw = r#"{
            "Meta Data": {"2. Symbol": "TSLA"},
            "Time Series (Daily)": {
                "2026-01-09": {"1. open": "101.0000", "4. close": "106.0000"},
                "2026-01-08": {"1. open": "99.0000", "4. close": "100.0000"},
                "2026-01-07": {"1. open": "98.0000", "4. close": "97.5000"}
            }
        }"#;

        let pair = parse("TSLA", raw).unwrap();
        assert_eq!(pair.latest.date, NaiveDate::from_ymd_opt(2026, 1, 9).unwrap());
        assert_eq!(pair.latest.close, 106.0);
        assert_eq!(pair.previous.date, NaiveDate::from_ymd_opt(2026, 1, 8).unwrap());
        assert_eq!(pair.previous.close, 100.0);
    }

    #[test]
    fn keeps_provider_order_instead_of_sorting_by_date() {
        let raw = r#"{
            "Time Series (Daily)": {
                "2026-01-07": {"4. close": "50.0"},
                "2026-01-09": {"4. close": "60.0"}
            }
        }"#;

        let pair = parse("X", raw).unwrap();
        assert_eq!(pair.latest.close, 50.0);
        assert_eq!(pair.previous.close, 60.0);
    }

    #[test]
    fn rate_limit_note_maps_to_missing_time_series() {
        let raw = r#"{"Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."}"#;
        let err = parse("NVDA", raw).unwrap_err();
        match &err {
            MarketDataError::MissingTimeSeries { symbol, detail } => {
                assert_eq!(symbol, "NVDA");
                assert!(detail.starts_with("Thank you for using Alpha Vantage"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().starts_with("could not get data for NVDA"));
    }

    #[test]
    fn error_message_and_unknown_payloads() {
        let err = parse("NOPE", r#"{"Error Message": "Invalid API call."}"#).unwrap_err();
        assert_eq!(
            err,
            MarketDataError::MissingTimeSeries {
                symbol: "NOPE".to_string(),
                detail: "Invalid API call.".to_string(),
            }
        );

        let err = parse("NOPE", "{}").unwrap_err();
        assert_eq!(err.to_string(), "could not get data for NOPE: Unknown error");
    }

    #[test]
    fn single_record_is_insufficient_history() {
        let raw = r#"{"Time Series (Daily)": {"2026-01-09": {"4. close": "10.0"}}}"#;
        assert_eq!(
            parse("AAPL", raw).unwrap_err(),
            MarketDataError::InsufficientHistory {
                symbol: "AAPL".to_string(),
                found: 1,
            }
        );
    }

    #[test]
    fn missing_close_field_is_malformed() {
        let raw = r#"{
            "Time Series (Daily)": {
                "2026-01-09": {"1. open": "10.0"},
                "2026-01-08": {"4. close": "10.0"}
            }
        }"#;
        assert!(matches!(
            parse("AAPL", raw),
            Err(MarketDataError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn zero_previous_close_is_rejected() {
        let raw = r#"{
            "Time Series (Daily)": {
                "2026-01-09": {"4. close": "10.0"},
                "2026-01-08": {"4. close": "0.0000"}
            }
        }"#;
        assert!(matches!(
            parse("AAPL", raw),
            Err(MarketDataError::NonPositiveClose { .. })
        ));
    }
}
