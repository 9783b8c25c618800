//! Per-candidate evaluation (collect, score, enrich) and the final ranking pass.

pub mod collector;
pub mod enricher;
pub mod ranker;
pub mod scorer;

pub use collector::HeadlineCollector;
pub use enricher::{CandidateEnricher, CompanyProfile};
pub use ranker::{Evaluation, RankReport, RecommendationRanker};
pub use scorer::{Lexicon, SentimentResult, SentimentScorer};
