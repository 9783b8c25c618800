use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    News,
    Search,
    CompanyLookup,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::News => "news",
            SourceKind::Search => "search",
            SourceKind::CompanyLookup => "company_lookup",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An adapter call that failed and was replaced by empty evidence.
#[derive(Debug, Clone)]
pub struct SourceFailure {
    pub source: SourceKind,
    pub detail: String,
}

impl SourceFailure {
    pub fn from_anyhow(source: SourceKind, err: &anyhow::Error) -> Self {
        Self {
            source,
            detail: format!("{err:#}"),
        }
    }
}

impl fmt::Display for SourceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source {} failed: {}", self.source, self.detail)
    }
}

impl std::error::Error for SourceFailure {}

/// Why a candidate produced no recommendation record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Every source came back empty.
    NoEvidence,
    /// Evaluation of this candidate blew up; the rest of the run is unaffected.
    EvaluationFailed(String),
}

impl SkipReason {
    pub fn is_failure(&self) -> bool {
        matches!(self, SkipReason::EvaluationFailed(_))
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoEvidence => f.write_str("no headlines from any source"),
            SkipReason::EvaluationFailed(detail) => write!(f, "evaluation failed: {detail}"),
        }
    }
}

impl std::error::Error for SkipReason {}
