use crate::config::{parse_var, Settings};
use crate::sources::types::{SearchResult, SearchResults};
use crate::sources::SearchSource;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
// Custom Search caps `num` at 10 per request.
const MAX_RESULTS_PER_REQUEST: u32 = 10;

#[derive(Debug, Clone)]
pub struct GoogleSearchClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    cse_id: Option<String>,
}

impl GoogleSearchClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings
            .google_search_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs =
            parse_var::<u64>("GOOGLE_SEARCH_TIMEOUT_SECS").unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build search http client")?;

        let client = Self {
            http,
            base_url,
            api_key: settings.google_api_key.clone(),
            cse_id: settings.google_cse_id.clone(),
        };

        if !client.is_enabled() {
            tracing::warn!("GOOGLE_API_KEY/GOOGLE_CSE_ID not set; search headlines disabled");
        }

        Ok(client)
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some() && self.cse_id.is_some()
    }

    fn url(&self) -> String {
        format!("{}/customsearch/v1", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl SearchSource for GoogleSearchClient {
    fn source_name(&self) -> &'static str {
        "google_cse"
    }

    async fn search(&self, query: &str, max_results: u32, advanced: bool) -> Result<SearchResults> {
        let (Some(api_key), Some(cse_id)) = (self.api_key.as_deref(), self.cse_id.as_deref())
        else {
            return Ok(SearchResults::default());
        };

        let t0 = std::time::Instant::now();
        let num = max_results.clamp(1, MAX_RESULTS_PER_REQUEST).to_string();
        let params = [
            ("key", api_key),
            ("cx", cse_id),
            ("q", query),
            ("num", num.as_str()),
            ("hl", "en"),
        ];

        let res = self
            .http
            .get(self.url())
            .query(&params)
            .send()
            .await
            .context("search request failed")?;

        let status = res.status();
        let text = res.text().await.context("failed to read search response")?;

        if !status.is_success() {
            anyhow::bail!("search HTTP {status}: {text}");
        }

        let results = parse_results(&text, advanced)?;
        tracing::debug!(
            query,
            max_results,
            advanced,
            result_count = results.result_count,
            elapsed_ms = t0.elapsed().as_millis(),
            "search completed"
        );
        Ok(results)
    }
}

#[derive(Debug, Deserialize)]
struct CseResponse {
    #[serde(default)]
    items: Vec<CseItem>,
}

#[derive(Debug, Deserialize)]
struct CseItem {
    link: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

fn parse_results(text: &str, advanced: bool) -> Result<SearchResults> {
    let parsed = serde_json::from_str::<CseResponse>(text)
        .with_context(|| format!("search response is not valid JSON: {text}"))?;

    let results = parsed
        .items
        .into_iter()
        .map(|item| {
            if advanced {
                SearchResult {
                    url: item.link,
                    title: item.title,
                    description: item.snippet,
                }
            } else {
                SearchResult {
                    url: item.link,
                    title: None,
                    description: None,
                }
            }
        })
        .collect();

    Ok(SearchResults::new(results))
}
