pub mod domain;
pub mod error;
pub mod pipeline;
pub mod sources;
pub mod storage;

pub mod config {
    use anyhow::Context;

    const DEFAULT_RECOMMENDATIONS_DIR: &str = "./recommendations";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub news_api_key: Option<String>,
        pub news_api_base_url: Option<String>,
        pub google_api_key: Option<String>,
        pub google_cse_id: Option<String>,
        pub google_search_base_url: Option<String>,
        pub company_lookup_base_url: Option<String>,
        pub company_lookup_api_key: Option<String>,
        pub sentry_dsn: Option<String>,
        pub recommendations_dir: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                news_api_key: non_empty_var("NEWS_API_KEY"),
                news_api_base_url: non_empty_var("NEWS_API_BASE_URL"),
                google_api_key: non_empty_var("GOOGLE_API_KEY"),
                google_cse_id: non_empty_var("GOOGLE_CSE_ID"),
                google_search_base_url: non_empty_var("GOOGLE_SEARCH_BASE_URL"),
                company_lookup_base_url: non_empty_var("COMPANY_LOOKUP_BASE_URL"),
                company_lookup_api_key: non_empty_var("COMPANY_LOOKUP_API_KEY"),
                sentry_dsn: non_empty_var("SENTRY_DSN"),
                recommendations_dir: non_empty_var("RECOMMENDATIONS_DIR"),
            })
        }

        pub fn require_company_lookup_base_url(&self) -> anyhow::Result<&str> {
            self.company_lookup_base_url
                .as_deref()
                .context("COMPANY_LOOKUP_BASE_URL is required")
        }

        pub fn recommendations_dir(&self) -> std::path::PathBuf {
            self.recommendations_dir
                .as_deref()
                .unwrap_or(DEFAULT_RECOMMENDATIONS_DIR)
                .into()
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|s| !s.trim().is_empty())
    }

    /// Knobs for one screening pass.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct PipelineOptions {
        pub top_n: usize,
        pub news_days_back: u32,
        pub search_max_results: u32,
        pub search_advanced: bool,
        /// Number of candidates evaluated at once. 1 means strictly sequential.
        pub concurrency: usize,
    }

    impl Default for PipelineOptions {
        fn default() -> Self {
            Self {
                top_n: 10,
                news_days_back: 5,
                search_max_results: 5,
                search_advanced: true,
                concurrency: 1,
            }
        }
    }

    impl PipelineOptions {
        pub fn from_env() -> Self {
            let mut out = Self::default();

            if let Some(n) = parse_var::<usize>("TOP_N") {
                out.top_n = n;
            }
            if let Some(n) = parse_var::<u32>("NEWS_DAYS_BACK") {
                out.news_days_back = n;
            }
            if let Some(n) = parse_var::<u32>("SEARCH_MAX_RESULTS") {
                out.search_max_results = n;
            }
            if let Some(n) = parse_var::<usize>("PIPELINE_CONCURRENCY") {
                out.concurrency = n;
            }

            out
        }

        pub fn validate(&self) -> anyhow::Result<()> {
            anyhow::ensure!(self.top_n >= 1, "top_n must be >= 1 (got {})", self.top_n);
            anyhow::ensure!(
                self.concurrency >= 1,
                "concurrency must be >= 1 (got {})",
                self.concurrency
            );
            Ok(())
        }
    }

    pub(crate) fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
        std::env::var(key).ok().and_then(|s| s.trim().parse::<T>().ok())
    }

}
