//! Article Store — date-keyed artifacts on local disk.
//!
//! Each article is three files sharing a prefix (`YYYY-MM-DD`, optionally
//! followed by a suffix): `<prefix>.json`, `<prefix>.pdf`, `<prefix>.mp3`.
//! The JSON record is the index; the PDF and MP3 are served statically.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::AppError;

/// The JSON record written next to each article's PDF and MP3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub date: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lexile: Option<String>,
    pub content: String,
}

/// A record together with the file prefix it was loaded from.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredArticle {
    pub prefix: String,
    pub record: ArticleRecord,
}

impl StoredArticle {
    /// The date encoded in the first ten characters of the prefix.
    pub fn date(&self) -> &str {
        self.prefix.get(..10).unwrap_or(&self.prefix)
    }

    /// Whatever follows the date in the prefix, used to order same-day articles.
    pub fn suffix(&self) -> &str {
        self.prefix.get(11..).unwrap_or("")
    }
}

#[derive(Debug, Clone)]
pub struct ArticleStore {
    dir: PathBuf,
}

impl ArticleStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the article directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    fn path_for(&self, prefix: &str, extension: &str) -> PathBuf {
        self.dir.join(format!("{prefix}.{extension}"))
    }

    pub async fn save_record(&self, prefix: &str, record: &ArticleRecord) -> Result<(), AppError> {
        validate_prefix(prefix)?;
        self.ensure_dir().await?;
        let json = serde_json::to_string_pretty(record)?;
        tokio::fs::write(self.path_for(prefix, "json"), json).await?;
        info!(prefix, "Saved article record");
        Ok(())
    }

    pub async fn save_pdf(&self, prefix: &str, pdf: &[u8]) -> Result<(), AppError> {
        validate_prefix(prefix)?;
        tokio::fs::write(self.path_for(prefix, "pdf"), pdf).await?;
        debug!(prefix, bytes = pdf.len(), "Saved article PDF");
        Ok(())
    }

    pub async fn save_audio(&self, prefix: &str, audio: &[u8]) -> Result<(), AppError> {
        validate_prefix(prefix)?;
        tokio::fs::write(self.path_for(prefix, "mp3"), audio).await?;
        debug!(prefix, bytes = audio.len(), "Saved article audio");
        Ok(())
    }

    /// Loads one record by prefix. `Ok(None)` if no such article exists.
    pub async fn load(&self, prefix: &str) -> Result<Option<StoredArticle>, AppError> {
        validate_prefix(prefix)?;
        let raw = match tokio::fs::read_to_string(self.path_for(prefix, "json")).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let record: ArticleRecord = serde_json::from_str(&raw)?;
        Ok(Some(StoredArticle {
            prefix: prefix.to_string(),
            record,
        }))
    }

    /// Prefixes of every `.json` record in the directory, unordered.
    async fn prefixes(&self) -> Result<Vec<String>, AppError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut prefixes = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            if let Some(prefix) = name.to_str().and_then(|n| n.strip_suffix(".json")) {
                prefixes.push(prefix.to_string());
            }
        }
        Ok(prefixes)
    }

    async fn load_all(&self, prefixes: Vec<String>) -> Result<Vec<StoredArticle>, AppError> {
        let mut articles = Vec::with_capacity(prefixes.len());
        for prefix in prefixes {
            if let Some(article) = self.load(&prefix).await? {
                articles.push(article);
            }
        }
        Ok(articles)
    }

    /// Every stored article, newest date first.
    pub async fn list(&self) -> Result<Vec<StoredArticle>, AppError> {
        let mut articles = self.load_all(self.prefixes().await?).await?;
        articles.sort_by(|a, b| b.date().cmp(a.date()));
        Ok(articles)
    }

    pub async fn latest(&self) -> Result<Option<StoredArticle>, AppError> {
        Ok(self.list().await?.into_iter().next())
    }

    /// Articles whose prefix starts with `date`, latest suffix first.
    pub async fn by_date(&self, date: &str) -> Result<Vec<StoredArticle>, AppError> {
        let prefixes = self
            .prefixes()
            .await?
            .into_iter()
            .filter(|p| p.starts_with(date))
            .collect();
        let mut articles = self.load_all(prefixes).await?;
        articles.sort_by(|a, b| b.suffix().cmp(a.suffix()));
        Ok(articles)
    }
}

/// Rejects prefixes that could escape the article directory.
pub fn validate_prefix(prefix: &str) -> Result<(), AppError> {
    if prefix.is_empty() || prefix.contains(['/', '\\']) || prefix.contains("..") {
        return Err(AppError::Validation(format!(
            "invalid article prefix '{prefix}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, title: &str) -> ArticleRecord {
        ArticleRecord {
            date: date.to_string(),
            title: title.to_string(),
            subtitles: vec!["Part One".to_string()],
            topic: Some("Technology".to_string()),
            lexile: None,
            content: format!("# {title}\n\nBody."),
        }
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArticleStore::new(dir.path().join("articles"));
        store
            .save_record("2024-05-01", &record("2024-05-01", "Solar"))
            .await
            .unwrap();

        let loaded = store.load("2024-05-01").await.unwrap().unwrap();
        assert_eq!(loaded.record.title, "Solar");
        assert_eq!(loaded.date(), "2024-05-01");
        assert!(store.load("2024-05-02").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_skips_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArticleStore::new(dir.path());
        for date in ["2024-05-01", "2024-06-10", "2024-05-20"] {
            store.save_record(date, &record(date, date)).await.unwrap();
        }
        store.save_pdf("2024-06-10", b"%PDF-").await.unwrap();

        let dates: Vec<String> = store
            .list()
            .await
            .unwrap()
            .iter()
            .map(|a| a.date().to_string())
            .collect();
        assert_eq!(dates, vec!["2024-06-10", "2024-05-20", "2024-05-01"]);

        let latest = store.latest().await.unwrap().unwrap();
        assert_eq!(latest.prefix, "2024-06-10");
    }

    #[tokio::test]
    async fn test_missing_directory_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArticleStore::new(dir.path().join("absent"));
        assert!(store.list().await.unwrap().is_empty());
        assert!(store.latest().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_by_date_orders_by_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArticleStore::new(dir.path());
        for prefix in ["2024-05-01", "2024-05-01-0900", "2024-05-01-1800", "2024-05-02"] {
            store
                .save_record(prefix, &record("2024-05-01", prefix))
                .await
                .unwrap();
        }

        let prefixes: Vec<String> = store
            .by_date("2024-05-01")
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.prefix)
            .collect();
        assert_eq!(prefixes, vec!["2024-05-01-1800", "2024-05-01-0900", "2024-05-01"]);
    }

    #[tokio::test]
    async fn test_traversal_prefix_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArticleStore::new(dir.path());
        let err = store.load("../secret").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_record_tolerates_missing_optional_fields() {
        let record: ArticleRecord =
            serde_json::from_str(r##"{"date":"2024-05-01","content":"# T"}"##).unwrap();
        assert_eq!(record.title, "");
        assert!(record.subtitles.is_empty());
        assert_eq!(record.topic, None);
    }
}
