use crate::domain::RecommendationDocument;
use anyhow::Context;
use std::path::{Path, PathBuf};

pub const LATEST_FILE_NAME: &str = "latest.json";

pub fn document_file_name(doc: &RecommendationDocument) -> String {
    format!(
        "investment_recommendations_{}.json",
        doc.timestamp.format("%Y%m%d_%H%M%S")
    )
}

/// Write the document under `dir` and point `latest.json` at the same content. Both files are
/// written to a temp path first and renamed into place.
pub async fn persist_document(dir: &Path, doc: &RecommendationDocument) -> anyhow::Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("failed to create output dir {}", dir.display()))?;

    let body = serde_json::to_vec_pretty(doc).context("failed to serialize recommendations")?;

    let path = dir.join(document_file_name(doc));
    write_atomic(&path, &body).await?;
    write_atomic(&dir.join(LATEST_FILE_NAME), &body).await?;

    tracing::debug!(
        path = %path.display(),
        items = doc.recommendations.len(),
        "recommendation document written"
    );
    Ok(path)
}

pub async fn load_latest(dir: &Path) -> anyhow::Result<Option<RecommendationDocument>> {
    let path = dir.join(LATEST_FILE_NAME);
    let bytes = match tokio::fs::read(&path).await {
        Ok(b) => b,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", path.display()));
        }
    };

    let doc = serde_json::from_slice::<RecommendationDocument>(&bytes)
        .with_context(|| format!("{} is not a valid recommendation document", path.display()))?;
    Ok(Some(doc))
}

async fn write_atomic(path: &Path, body: &[u8]) -> anyhow::Result<()> {
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, body)
        .await
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .with_context(|| format!("failed to move {} into place", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Candidate, Recommendation};
    use chrono::{TimeZone, Utc};

    fn doc() -> RecommendationDocument {
        let ts = Utc.with_ymd_and_hms(2026, 1, 27, 9, 5, 3).unwrap();
        RecommendationDocument::new(
            ts,
            vec![Recommendation {
                symbol: Candidate::new("AAA"),
                company_name: "AAA".to_string(),
                current_price: None,
                confidence_score: 1.0,
                reasoning: "Headline sentiment: 1.00. Sample: ['AAA stock gain continues']"
                    .to_string(),
                sector: "Unknown".to_string(),
                market_cap: None,
                pe_ratio: None,
                trend_alignment: None,
            }],
        )
    }

    #[test]
    fn file_name_embeds_timestamp() {
        assert_eq!(
            document_file_name(&doc()),
            "investment_recommendations_20260127_090503.json"
        );
    }

    #[tokio::test]
    async fn persist_then_load_latest() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested");

        assert!(load_latest(&out).await.unwrap().is_none());

        let path = persist_document(&out, &doc()).await.unwrap();
        assert!(path.ends_with("investment_recommendations_20260127_090503.json"));
        assert!(!out.join("latest.json.tmp").exists());

        let latest = load_latest(&out).await.unwrap().unwrap();
        assert_eq!(latest, doc());

        let on_disk: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(on_disk["recommendations"][0]["symbol"], "AAA");
        assert!(on_disk["recommendations"][0]["pe_ratio"].is_null());
    }

    #[tokio::test]
    async fn empty_list_is_still_a_document() {
        let dir = tempfile::tempdir().unwrap();
        let empty = RecommendationDocument::new(doc().timestamp, Vec::new());
        persist_document(dir.path(), &empty).await.unwrap();
        let latest = load_latest(dir.path()).await.unwrap().unwrap();
        assert!(latest.recommendations.is_empty());
    }

    #[tokio::test]
    async fn corrupt_latest_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(LATEST_FILE_NAME), "{").unwrap();
        assert!(load_latest(dir.path()).await.is_err());
    }
}
