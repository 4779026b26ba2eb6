//! JSON snapshot of the displayed list.

use crate::error::AppError;
use crate::models::ArticleSnapshot;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

pub const JSON_FILENAME: &str = "articles.json";

/// Write `snapshot` to `{json_output_dir}/articles.json`.
///
/// Creates the directory if needed and returns the path written.
///
/// # Errors
///
/// [`AppError::Serialization`] if the snapshot cannot be encoded,
/// [`AppError::Io`] if the directory or file cannot be written.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir, count = snapshot.articles.len()))]
pub async fn write_snapshot(
    snapshot: &ArticleSnapshot,
    json_output_dir: &str,
) -> Result<PathBuf, AppError> {
    let json = serde_json::to_string_pretty(snapshot)?;

    if let Err(e) = fs::create_dir_all(json_output_dir).await {
        error!(error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = PathBuf::from(json_output_dir).join(JSON_FILENAME);
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote JSON snapshot");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleRecord;

    #[tokio::test]
    async fn test_write_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("json");
        let snapshot = ArticleSnapshot {
            topic: "sports".to_string(),
            order_by: "newest".to_string(),
            fetched_at: "2018-08-27T11:00:00+01:00".to_string(),
            articles: vec![ArticleRecord::new(
                "Sport",
                "Kane double sinks Spurs",
                "By Sean Ingle",
                "Aug 27, 2018",
                "https://www.theguardian.com/sport/1",
            )],
        };

        let path = write_snapshot(&snapshot, dir.to_str().unwrap()).await.unwrap();
        assert_eq!(path, dir.join(JSON_FILENAME));

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["topic"], "sports");
        assert_eq!(written["articles"][0]["section"], "Sport");
        assert_eq!(written["articles"][0]["url"], "https://www.theguardian.com/sport/1");
    }

    #[tokio::test]
    async fn test_write_snapshot_into_a_file_is_io_error() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let snapshot = ArticleSnapshot {
            topic: "sports".to_string(),
            order_by: "newest".to_string(),
            fetched_at: String::new(),
            articles: vec![],
        };

        let err = write_snapshot(&snapshot, tmp.path().to_str().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
