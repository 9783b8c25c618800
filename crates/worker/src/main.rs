use anyhow::Context;
use clap::Parser;
use sentipick_core::config::{PipelineOptions, Settings};
use sentipick_core::domain::RecommendationDocument;
use sentipick_core::pipeline::{Evaluation, Lexicon, RecommendationRanker};
use sentipick_core::sources::company::HttpCompanyLookup;
use sentipick_core::sources::google::GoogleSearchClient;
use sentipick_core::sources::newsapi::NewsApiClient;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod report;
mod universe;

const DEFAULT_PROGRESS_EVERY: usize = 25;
const MAX_CAPTURED_FAILURES: usize = 10;

#[derive(Debug, Parser)]
#[command(name = "sentipick_worker")]
struct Args {
    /// Number of recommendations to keep. Defaults to TOP_N or 10.
    #[arg(long)]
    top_n: Option<usize>,

    /// Candidates evaluated at once. Defaults to PIPELINE_CONCURRENCY or 1.
    #[arg(long)]
    concurrency: Option<usize>,

    /// Comma separated symbols replacing the built-in universe.
    #[arg(long, value_delimiter = ',')]
    symbols: Option<Vec<String>>,

    /// Screen only the first N candidates of the universe.
    #[arg(long)]
    max_candidates: Option<usize>,

    /// Directory for recommendation documents. Defaults to RECOMMENDATIONS_DIR.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Rank and print, but do not write anything.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let mut opts = PipelineOptions::from_env();
    if let Some(n) = args.top_n {
        opts.top_n = n;
    }
    if let Some(n) = args.concurrency {
        opts.concurrency = n;
    }
    opts.validate()?;

    let mut universe_opts = universe::UniverseOptions::from_env();
    if args.symbols.is_some() {
        universe_opts.symbols = args.symbols.clone();
    }
    if args.max_candidates.is_some() {
        universe_opts.max_candidates = args.max_candidates;
    }
    let candidates = universe::build_universe(&universe_opts)?;

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| settings.recommendations_dir());

    // Held for the whole run so two workers never interleave writes.
    let _run_lock = if args.dry_run {
        None
    } else {
        match sentipick_core::storage::lock::try_acquire_run_lock(&output_dir)? {
            Some(lock) => Some(lock),
            None => {
                tracing::warn!(output_dir = %output_dir.display(), "run lock not acquired; another run in progress");
                return Ok(());
            }
        }
    };

    let news = NewsApiClient::from_settings(&settings)?;
    let search = GoogleSearchClient::from_settings(&settings)?;
    let lookup = HttpCompanyLookup::from_settings(&settings)?;
    let ranker = RecommendationRanker::from_sources(
        Arc::new(news),
        Arc::new(search),
        Arc::new(lookup),
        Lexicon::default(),
        &opts,
    );

    tracing::info!(
        candidates = candidates.len(),
        top_n = opts.top_n,
        concurrency = opts.concurrency,
        dry_run = args.dry_run,
        "screening started"
    );

    let progress_every = std::env::var("PROGRESS_EVERY")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_PROGRESS_EVERY);
    let mut kept = 0usize;
    let mut failures = 0usize;

    let ranking = ranker
        .rank_with_observer(&candidates, opts.top_n, |ev: &Evaluation<'_>| {
            match ev.outcome {
                Ok(_) => kept += 1,
                Err(reason) if reason.is_failure() => {
                    failures += 1;
                    if failures <= MAX_CAPTURED_FAILURES {
                        sentry_anyhow::capture_anyhow(
                            &anyhow::Error::new(reason.clone())
                                .context(format!("evaluating {}", ev.candidate)),
                        );
                    }
                }
                Err(_) => {}
            }

            if progress_every != 0 {
                let n = ev.index + 1;
                if n == 1 || n == ev.total || n % progress_every == 0 {
                    tracing::info!(
                        processed = n,
                        total = ev.total,
                        symbol = %ev.candidate,
                        with_headlines = kept,
                        failures,
                        "screening progress"
                    );
                }
            }
        });

    // Returning drops the run lock; a hard kill is handled by the stale-PID check instead.
    let report = tokio::select! {
        report = ranking => report,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("interrupted; nothing persisted");
            anyhow::bail!("screening interrupted");
        }
    };

    tracing::info!(
        evaluated = report.evaluated,
        recommended = report.recommendations.len(),
        skipped = report.skipped.len(),
        failures = report.failures().count(),
        "screening finished"
    );

    println!("{}", report::render_table(&report.recommendations));
    println!("{}", report::render_details(&report.recommendations));

    if args.dry_run {
        tracing::info!(dry_run = true, "skipping persistence");
        return Ok(());
    }

    let doc = RecommendationDocument::new(chrono::Utc::now(), report.recommendations);
    match sentipick_core::storage::recommendations::persist_document(&output_dir, &doc).await {
        Ok(path) => {
            tracing::info!(path = %path.display(), items = doc.recommendations.len(), "persisted recommendations");
        }
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %err, "failed to persist recommendations");
            return Err(err).context("recommendation run failed");
        }
    }

    Ok(())
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
