use crate::domain::Candidate;
use anyhow::Result;

pub mod company;
pub mod google;
pub mod newsapi;
pub mod types;

pub use types::{LookupResponse, NewsArticle, SearchResult, SearchResults};

/// Recent news articles about a topic.
///
/// Implementations must return an empty list, not an error, when they are not configured.
#[async_trait::async_trait]
pub trait NewsSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn fetch_recent(&self, topic: &str, days_back: u32) -> Result<Vec<NewsArticle>>;
}

#[async_trait::async_trait]
pub trait SearchSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn search(&self, query: &str, max_results: u32, advanced: bool) -> Result<SearchResults>;
}

#[async_trait::async_trait]
pub trait CompanyLookup: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn lookup(&self, candidate: &Candidate) -> Result<LookupResponse>;
}
