use crate::domain::recommendation::UNKNOWN_SECTOR;
use crate::domain::Candidate;
use crate::error::{SourceFailure, SourceKind};
use crate::sources::{CompanyLookup, LookupResponse};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyProfile {
    pub company_name: String,
    pub sector: String,
}

impl CompanyProfile {
    pub fn fallback(candidate: &Candidate) -> Self {
        Self {
            company_name: candidate.to_string(),
            sector: UNKNOWN_SECTOR.to_string(),
        }
    }

    pub fn from_lookup(candidate: &Candidate, response: LookupResponse) -> Self {
        match response {
            LookupResponse::Parsed { name, sector } => Self {
                company_name: name.unwrap_or_else(|| candidate.to_string()),
                sector: sector.unwrap_or_else(|| UNKNOWN_SECTOR.to_string()),
            },
            LookupResponse::Unparsed(_) => Self::fallback(candidate),
        }
    }
}

/// Resolves display name and sector. Never fails; anything unusable degrades to the symbol
/// and "Unknown". Price and valuation fields are ignored.
#[derive(Clone)]
pub struct CandidateEnricher {
    lookup: Arc<dyn CompanyLookup>,
}

impl CandidateEnricher {
    pub fn new(lookup: Arc<dyn CompanyLookup>) -> Self {
        Self { lookup }
    }

    pub async fn enrich(&self, candidate: &Candidate) -> CompanyProfile {
        match self.lookup.lookup(candidate).await {
            Ok(response) => {
                if let LookupResponse::Unparsed(raw) = &response {
                    tracing::debug!(
                        symbol = %candidate,
                        raw_len = raw.len(),
                        "company lookup returned unstructured data"
                    );
                }
                CompanyProfile::from_lookup(candidate, response)
            }
            Err(err) => {
                let failure = SourceFailure::from_anyhow(SourceKind::CompanyLookup, &err);
                tracing::debug!(
                    symbol = %candidate,
                    source = self.lookup.source_name(),
                    error = %failure,
                    "company lookup failed; using fallback profile"
                );
                CompanyProfile::fallback(candidate)
            }
        }
    }
}
