use crate::domain::candidate::Candidate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const UNKNOWN_SECTOR: &str = "Unknown";

/// The document handed to the result sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationDocument {
    pub timestamp: DateTime<Utc>,
    pub recommendations: Vec<Recommendation>,
}

impl RecommendationDocument {
    pub fn new(timestamp: DateTime<Utc>, recommendations: Vec<Recommendation>) -> Self {
        Self {
            timestamp,
            recommendations,
        }
    }

    pub fn find(&self, symbol: &str) -> Option<&Recommendation> {
        self.recommendations
            .iter()
            .find(|r| r.symbol.as_str().eq_ignore_ascii_case(symbol))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub symbol: Candidate,
    pub company_name: String,
    pub current_price: Option<f64>,
    pub confidence_score: f64,
    pub reasoning: String,
    pub sector: String,
    pub market_cap: Option<String>,
    pub pe_ratio: Option<f64>,
    pub trend_alignment: Option<String>,
}
