// src/storage/mod.rs
use crate::github::models::RepoSlug;
use crate::release::ReleaseVersion;
use crate::utils::error::StorageError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// What a run wants to remember next to the saved document: the parameters it
/// ran with, the tally counts, and the broken tickets a human still has to fix.
#[derive(Debug)]
pub struct DigestSummary {
    pub repo: RepoSlug,
    pub release: ReleaseVersion,
    pub format: String,
    pub fetched: usize,
    pub suppressed: usize,
    pub hidden: usize,
    pub published: usize,
    pub broken: Vec<BrokenTicket>,
}

/// A ticket that carried the dev docs label but yielded no usable excerpt.
#[derive(Debug, Clone)]
pub struct BrokenTicket {
    pub pr: u64,
    pub title: String,
}

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self {
            base_dir: base_path,
        })
    }

    // Directory layout: /base_dir/repo_name/release/
    fn release_dir(
        &self,
        repo: &RepoSlug,
        release: ReleaseVersion,
    ) -> Result<PathBuf, StorageError> {
        let target_dir = self.base_dir.join(repo.name()).join(release.to_string());
        if !target_dir.exists() {
            fs::create_dir_all(&target_dir).map_err(StorageError::IoError)?;
        }
        Ok(target_dir)
    }

    /// Saves the compiled digest document under its repository/release
    /// directory, with the extension matching the output format.
    pub fn save_document(
        &self,
        repo: &RepoSlug,
        release: ReleaseVersion,
        extension: &str,
        content: &str,
    ) -> Result<PathBuf, StorageError> {
        let target_dir = self.release_dir(repo, release)?;

        let filename = format!("{}_{}_dev_docs.{}", repo.name(), release, extension);
        let file_path = target_dir.join(filename);

        let mut file = fs::File::create(&file_path).map_err(StorageError::IoError)?;
        file.write_all(content.as_bytes())
            .map_err(StorageError::IoError)?;

        tracing::info!("Saved digest to {}", file_path.display());

        Ok(file_path)
    }

    /// Saves run metadata in JSON format next to the document
    pub fn save_summary(&self, summary: &DigestSummary) -> Result<PathBuf, StorageError> {
        let target_dir = self.release_dir(&summary.repo, summary.release)?;

        let filename = format!(
            "{}_{}_dev_docs_meta.json",
            summary.repo.name(),
            summary.release
        );
        let file_path = target_dir.join(filename);

        let broken: Vec<serde_json::Value> = summary
            .broken
            .iter()
            .map(|ticket| {
                serde_json::json!({
                    "pr": ticket.pr,
                    "title": ticket.title,
                    "url": format!("https://github.com/{}/pull/{}", summary.repo, ticket.pr),
                })
            })
            .collect();

        let metadata = serde_json::json!({
            "repository": summary.repo.to_string(),
            "release": summary.release.to_string(),
            "format": summary.format,
            "tickets_fetched": summary.fetched,
            "tickets_suppressed": summary.suppressed,
            "tickets_hidden": summary.hidden,
            "entries_published": summary.published,
            "broken_tickets": broken,
            "generated_at": chrono::Utc::now().to_rfc3339(),
        });

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, metadata_str).map_err(StorageError::IoError)?;

        tracing::info!("Saved run summary to {}", file_path.display());

        Ok(file_path)
    }
}
