use crate::config::PipelineOptions;
use crate::domain::{Candidate, TextItem};
use crate::error::{SourceFailure, SourceKind};
use crate::sources::{NewsSource, SearchSource};
use std::sync::Arc;

/// Gathers headlines for one candidate from the news feed and the search engine.
///
/// Output is every news headline in feed order followed by every search headline in result
/// order. Both sources are weighted equally and nothing is deduplicated.
#[derive(Clone)]
pub struct HeadlineCollector {
    news: Arc<dyn NewsSource>,
    search: Arc<dyn SearchSource>,
    news_days_back: u32,
    search_max_results: u32,
    search_advanced: bool,
}

impl HeadlineCollector {
    pub fn new(
        news: Arc<dyn NewsSource>,
        search: Arc<dyn SearchSource>,
        opts: &PipelineOptions,
    ) -> Self {
        Self {
            news,
            search,
            news_days_back: opts.news_days_back,
            search_max_results: opts.search_max_results,
            search_advanced: opts.search_advanced,
        }
    }

    pub fn search_query(candidate: &Candidate) -> String {
        format!("{candidate} stock news")
    }

    pub async fn collect(&self, candidate: &Candidate) -> Vec<TextItem> {
        let (news, search) = tokio::join!(self.news_items(candidate), self.search_items(candidate));

        let mut out = Vec::with_capacity(news.len() + search.len());
        out.extend(news);
        out.extend(search);
        out
    }

    async fn news_items(&self, candidate: &Candidate) -> Vec<TextItem> {
        match self
            .news
            .fetch_recent(candidate.as_str(), self.news_days_back)
            .await
        {
            Ok(articles) => articles
                .into_iter()
                .map(|a| TextItem::new(a.title.unwrap_or_default()))
                .collect(),
            Err(err) => {
                let failure = SourceFailure::from_anyhow(SourceKind::News, &err);
                tracing::warn!(
                    symbol = %candidate,
                    source = self.news.source_name(),
                    error = %failure,
                    "news fetch failed; treating as no headlines"
                );
                Vec::new()
            }
        }
    }

    async fn search_items(&self, candidate: &Candidate) -> Vec<TextItem> {
        let query = Self::search_query(candidate);
        match self
            .search
            .search(&query, self.search_max_results, self.search_advanced)
            .await
        {
            Ok(res) => res
                .results
                .into_iter()
                .map(|r| TextItem::new(r.title.unwrap_or_default()))
                .collect(),
            Err(err) => {
                let failure = SourceFailure::from_anyhow(SourceKind::Search, &err);
                tracing::warn!(
                    symbol = %candidate,
                    source = self.search.source_name(),
                    error = %failure,
                    "search failed; treating as no headlines"
                );
                Vec::new()
            }
        }
    }
}
