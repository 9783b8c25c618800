use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, rename = "publishedAt")]
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults {
    pub result_count: usize,
    pub results: Vec<SearchResult>,
}

impl SearchResults {
    pub fn new(results: Vec<SearchResult>) -> Self {
        Self {
            result_count: results.len(),
            results,
        }
    }
}

const NAME_KEYS: &[&str] = &["name", "Name", "companyName", "longName"];
const SECTOR_KEYS: &[&str] = &["sector", "Sector"];

/// Company metadata as returned by a lookup collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResponse {
    Parsed {
        name: Option<String>,
        sector: Option<String>,
    },
    Unparsed(String),
}

impl LookupResponse {
    /// Classify a raw response body. Only a JSON object, or an array led by one, counts as
    /// structured; everything else is kept verbatim as `Unparsed`.
    pub fn from_body(body: &str) -> Self {
        let value = match serde_json::from_str::<Value>(body.trim()) {
            Ok(v) => v,
            Err(_) => return LookupResponse::Unparsed(body.to_string()),
        };

        let obj = match &value {
            Value::Object(o) => o,
            Value::Array(items) => match items.first() {
                Some(Value::Object(o)) => o,
                _ => return LookupResponse::Unparsed(body.to_string()),
            },
            _ => return LookupResponse::Unparsed(body.to_string()),
        };

        LookupResponse::Parsed {
            name: first_string(obj, NAME_KEYS),
            sector: first_string(obj, SECTOR_KEYS),
        }
    }
}

fn first_string(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}
