use crate::config::PipelineOptions;
use crate::domain::{Candidate, Recommendation};
use crate::error::SkipReason;
use crate::pipeline::collector::HeadlineCollector;
use crate::pipeline::enricher::{CandidateEnricher, CompanyProfile};
use crate::pipeline::scorer::{Lexicon, SentimentResult, SentimentScorer};
use crate::sources::{CompanyLookup, NewsSource, SearchSource};
use futures::{FutureExt, StreamExt};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Reported to the progress observer once per candidate, in universe order.
#[derive(Debug)]
pub struct Evaluation<'a> {
    pub index: usize,
    pub total: usize,
    pub candidate: &'a Candidate,
    pub outcome: &'a Result<Recommendation, SkipReason>,
}

#[derive(Debug, Clone)]
pub struct RankReport {
    pub recommendations: Vec<Recommendation>,
    pub skipped: Vec<(Candidate, SkipReason)>,
    pub evaluated: usize,
}

impl RankReport {
    pub fn failures(&self) -> impl Iterator<Item = &(Candidate, SkipReason)> {
        self.skipped.iter().filter(|(_, reason)| reason.is_failure())
    }
}

pub struct RecommendationRanker {
    collector: HeadlineCollector,
    scorer: SentimentScorer,
    enricher: CandidateEnricher,
    concurrency: usize,
}

impl RecommendationRanker {
    pub fn new(
        collector: HeadlineCollector,
        scorer: SentimentScorer,
        enricher: CandidateEnricher,
        concurrency: usize,
    ) -> Self {
        Self {
            collector,
            scorer,
            enricher,
            concurrency: concurrency.max(1),
        }
    }

    pub fn from_sources(
        news: Arc<dyn NewsSource>,
        search: Arc<dyn SearchSource>,
        lookup: Arc<dyn CompanyLookup>,
        lexicon: Lexicon,
        opts: &PipelineOptions,
    ) -> Self {
        Self::new(
            HeadlineCollector::new(news, search, opts),
            SentimentScorer::new(lexicon),
            CandidateEnricher::new(lookup),
            opts.concurrency,
        )
    }

    /// Collect, score and enrich one candidate. A panic anywhere inside is contained here and
    /// reported as `EvaluationFailed`.
    pub async fn evaluate(&self, candidate: &Candidate) -> Result<Recommendation, SkipReason> {
        let run = async {
            let items = self.collector.collect(candidate).await;
            let sentiment = self.scorer.score(candidate, &items);
            if !sentiment.has_evidence() {
                return Err(SkipReason::NoEvidence);
            }

            let profile = self.enricher.enrich(candidate).await;
            Ok(build_recommendation(&sentiment, profile))
        };

        match AssertUnwindSafe(run).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(panic) => Err(SkipReason::EvaluationFailed(panic_message(panic.as_ref()))),
        }
    }

    pub async fn rank(&self, candidates: &[Candidate], top_n: usize) -> RankReport {
        self.rank_with_observer(candidates, top_n, |_| {}).await
    }

    /// Evaluate every candidate (up to `concurrency` at a time), then filter, sort and
    /// truncate. Results are consumed in universe order regardless of completion order.
    pub async fn rank_with_observer<F>(
        &self,
        candidates: &[Candidate],
        top_n: usize,
        mut observer: F,
    ) -> RankReport
    where
        F: FnMut(&Evaluation<'_>),
    {
        let total = candidates.len();
        let this = self;

        let mut outcomes = futures::stream::iter(candidates.iter())
            .map(move |candidate| async move { (candidate, this.evaluate(candidate).await) })
            .buffered(self.concurrency);

        let mut recommendations = Vec::new();
        let mut skipped = Vec::new();
        let mut index = 0usize;

        while let Some((candidate, outcome)) = outcomes.next().await {
            observer(&Evaluation {
                index,
                total,
                candidate,
                outcome: &outcome,
            });
            index += 1;

            match outcome {
                Ok(rec) => recommendations.push(rec),
                Err(reason) => {
                    if reason.is_failure() {
                        tracing::warn!(symbol = %candidate, error = %reason, "skipping candidate");
                    }
                    skipped.push((candidate.clone(), reason));
                }
            }
        }

        RankReport {
            recommendations: select_top(recommendations, top_n),
            skipped,
            evaluated: total,
        }
    }
}

/// Keep strictly positive scores, sort descending, truncate. The sort is stable so equal
/// scores stay in universe order.
pub fn select_top(mut recommendations: Vec<Recommendation>, top_n: usize) -> Vec<Recommendation> {
    recommendations.retain(|r| r.confidence_score > 0.0);
    recommendations.sort_by(|a, b| {
        b.confidence_score
            .partial_cmp(&a.confidence_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    recommendations.truncate(top_n);
    recommendations
}

pub fn build_recommendation(sentiment: &SentimentResult, profile: CompanyProfile) -> Recommendation {
    Recommendation {
        symbol: sentiment.candidate.clone(),
        company_name: profile.company_name,
        current_price: None,
        confidence_score: sentiment.score,
        reasoning: reasoning(sentiment),
        sector: profile.sector,
        market_cap: None,
        pe_ratio: None,
        trend_alignment: None,
    }
}

/// Renders samples as a single-quoted list (`['a', 'b']`) so documents stay byte-compatible
/// with those written by earlier versions of the screener.
fn reasoning(sentiment: &SentimentResult) -> String {
    let samples: Vec<String> = sentiment
        .sample_headlines
        .iter()
        .map(|item| quote_sample(&item.text))
        .collect();
    format!(
        "Headline sentiment: {:.2}. Sample: [{}]",
        sentiment.score,
        samples.join(", ")
    )
}

// Single quotes unless the text holds a single quote and no double quote.
fn quote_sample(text: &str) -> String {
    let quote = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote);
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}
