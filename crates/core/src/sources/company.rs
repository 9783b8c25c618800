use crate::config::{parse_var, Settings};
use crate::domain::Candidate;
use crate::sources::types::LookupResponse;
use crate::sources::CompanyLookup;
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Fetches `{base_url}/{symbol}` and hands the body to [`LookupResponse::from_body`].
#[derive(Debug, Clone)]
pub struct HttpCompanyLookup {
    http: reqwest::Client,
    base_url: Option<String>,
    api_key: Option<String>,
}

impl HttpCompanyLookup {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = match settings.require_company_lookup_base_url() {
            Ok(url) => Some(url.to_string()),
            Err(err) => {
                tracing::warn!(error = %err, "company names and sectors will fall back to defaults");
                None
            }
        };

        let timeout_secs =
            parse_var::<u64>("COMPANY_LOOKUP_TIMEOUT_SECS").unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build company lookup http client")?;

        Ok(Self {
            http,
            base_url,
            api_key: settings.company_lookup_api_key.clone(),
        })
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &self.api_key {
            headers.insert("x-api-key", HeaderValue::from_str(api_key)?);
        }
        Ok(headers)
    }
}

#[async_trait::async_trait]
impl CompanyLookup for HttpCompanyLookup {
    fn source_name(&self) -> &'static str {
        "http_company_lookup"
    }

    async fn lookup(&self, candidate: &Candidate) -> Result<LookupResponse> {
        let base_url = self
            .base_url
            .as_deref()
            .context("company lookup is not configured")?;
        let url = format!("{}/{}", base_url.trim_end_matches('/'), candidate);

        let res = self
            .http
            .get(url)
            .headers(self.headers()?)
            .send()
            .await
            .context("company lookup request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read company lookup response")?;

        if !status.is_success() {
            anyhow::bail!("company lookup HTTP {status}: {text}");
        }

        Ok(LookupResponse::from_body(&text))
    }
}
