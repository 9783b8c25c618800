pub mod candidate;
pub mod recommendation;

pub use candidate::{Candidate, TextItem};
pub use recommendation::{Recommendation, RecommendationDocument};
