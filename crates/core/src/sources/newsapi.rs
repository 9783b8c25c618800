use crate::config::{parse_var, Settings};
use crate::sources::types::NewsArticle;
use crate::sources::NewsSource;
use anyhow::{Context, Result};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://newsapi.org";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone)]
pub struct NewsApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl NewsApiClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings
            .news_api_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let api_key = settings.news_api_key.clone();

        let timeout_secs = parse_var::<u64>("NEWS_API_TIMEOUT_SECS").unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build news api http client")?;

        if api_key.is_none() {
            tracing::warn!("NEWS_API_KEY not set; news headlines disabled");
        }

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    fn url(&self) -> String {
        format!("{}/v2/everything", self.base_url.trim_end_matches('/'))
    }

    fn headers(&self, api_key: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_str(api_key)?);
        Ok(headers)
    }
}

#[async_trait::async_trait]
impl NewsSource for NewsApiClient {
    fn source_name(&self) -> &'static str {
        "newsapi"
    }

    async fn fetch_recent(&self, topic: &str, days_back: u32) -> Result<Vec<NewsArticle>> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(Vec::new());
        };

        let from = from_date(Utc::now(), days_back);
        let page_size = PAGE_SIZE.to_string();
        let params = [
            ("q", topic),
            ("from", from.as_str()),
            ("sortBy", "relevancy"),
            ("language", "en"),
            ("pageSize", page_size.as_str()),
        ];

        let res = self
            .http
            .get(self.url())
            .headers(self.headers(api_key)?)
            .query(&params)
            .send()
            .await
            .context("news api request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read news api response")?;

        if !status.is_success() {
            anyhow::bail!("news api HTTP {status}: {text}");
        }

        parse_articles(&text)
    }
}

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<NewsArticle>,
}

fn parse_articles(text: &str) -> Result<Vec<NewsArticle>> {
    let parsed = serde_json::from_str::<EverythingResponse>(text)
        .with_context(|| format!("news api response is not valid JSON: {text}"))?;

    anyhow::ensure!(
        parsed.status == "ok",
        "news api returned status={}: {}",
        parsed.status,
        parsed.message.unwrap_or_default()
    );

    Ok(parsed.articles)
}

fn from_date(now: DateTime<Utc>, days_back: u32) -> String {
    (now - ChronoDuration::days(i64::from(days_back)))
        .format("%Y-%m-%d")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn parses_everything_response_in_order() {
        let body = json!({
            "status": "ok",
            "totalResults": 2,
            "articles": [
                {"title": "AAPL stock surges", "url": "https://a", "publishedAt": "2026-01-27T10:00:00Z"},
                {"title": null, "url": "https://b"}
            ]
        })
        .to_string();

        let articles = parse_articles(&body).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title.as_deref(), Some("AAPL stock surges"));
        assert!(articles[1].title.is_none());
    }

    #[test]
    fn rejects_error_status() {
        let body = json!({
            "status": "error",
            "code": "rateLimited",
            "message": "too many requests"
        })
        .to_string();

        let err = parse_articles(&body).unwrap_err();
        assert!(err.to_string().contains("too many requests"));
    }

    #[test]
    fn rejects_non_json() {
        assert!(parse_articles("<html>").is_err());
    }

    #[test]
    fn from_date_subtracts_days() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
        assert_eq!(from_date(now, 5), "2026-02-25");
        assert_eq!(from_date(now, 0), "2026-03-02");
    }

    #[tokio::test]
    async fn disabled_client_returns_empty() {
        let client = NewsApiClient {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
        };
        assert!(!client.is_enabled());
        let articles = client.fetch_recent("AAPL", 5).await.unwrap();
        assert!(articles.is_empty());
    }
}
