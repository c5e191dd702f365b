// src/github/client.rs
use crate::github::models::{Issue, Label, RepoSlug, Repository, SearchResults};
use crate::release::ReleaseVersion;
use crate::utils::error::GitHubError;
use reqwest::header;
use std::time::Duration;

const GITHUB_API_BASE: &str = "https://api.github.com";
// GitHub rejects requests that carry no User-Agent at all.
const GITHUB_USER_AGENT: &str = concat!("devdocs_digest/", env!("CARGO_PKG_VERSION"));
// Unauthenticated search is capped around 10 requests/minute. Be conservative. >100ms delay.
const GITHUB_REQUEST_DELAY_MS: u64 = 150;

/// Creates a reqwest client configured for GitHub interaction.
fn build_github_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(GITHUB_USER_AGENT) // Set the required User-Agent
        .build()
}

/// Issue-search query selecting tickets that carry both the documentation
/// label and the target release label.
fn search_query(repo: &RepoSlug, doc_label: &str, release: ReleaseVersion) -> String {
    format!("repo:{} label:{} label:{}", repo, doc_label, release)
}

/// Searches a repository for tickets labeled with `doc_label` and the target
/// release. Fetches a single page of up to 100 results; a truncated result
/// set is logged rather than followed.
pub async fn fetch_dev_doc_issues(
    repo: &RepoSlug,
    doc_label: &str,
    release: ReleaseVersion,
) -> Result<Vec<Issue>, GitHubError> {
    let client = build_github_client()?; // Propagate client build error if any

    let query = search_query(repo, doc_label, release);
    tracing::info!("Searching {} for tickets matching: {}", repo, query);
    tracing::debug!("Using User-Agent: {}", GITHUB_USER_AGENT);

    // --- Basic Rate Limiting ---
    // Unauthenticated callers share a small search quota, so pace even the
    // handful of requests a single run makes.
    tokio::time::sleep(Duration::from_millis(GITHUB_REQUEST_DELAY_MS)).await;
    // --------------------------

    let response = client
        .get(format!("{}/search/issues", GITHUB_API_BASE))
        // The q parameter contains spaces and colons, so let reqwest encode it
        .query(&[("q", query.as_str()), ("per_page", "100")])
        .header(header::ACCEPT, "application/vnd.github+json")
        .send()
        .await?; // Propagates reqwest::Error as GitHubError::Network

    // Check if the request was successful (status code 2xx)
    let status = response.status();
    if !status.is_success() {
        tracing::error!("HTTP error status: {} for issue search", status);
        // Check for specific common errors
        if status == reqwest::StatusCode::FORBIDDEN {
            tracing::warn!("Received 403 Forbidden - likely the unauthenticated search quota.");
            return Err(GitHubError::RateLimited);
        }
        // Return generic HTTP error
        return Err(GitHubError::Http(status));
    }

    let results: SearchResults<Issue> = response.json().await?;
    if results.incomplete_results || results.total_count > results.items.len() as u64 {
        tracing::warn!(
            "Search matched {} tickets but one page holds {}; the digest will be partial",
            results.total_count,
            results.items.len()
        );
    }
    tracing::debug!("Fetched {} tickets for {}", results.items.len(), query);

    Ok(results.items)
}

/// Resolves the repository record, mainly for its numeric id, which the label
/// search endpoint takes instead of an owner/name pair.
pub async fn fetch_repository(repo: &RepoSlug) -> Result<Repository, GitHubError> {
    let url = format!("{}/repos/{}/{}", GITHUB_API_BASE, repo.owner(), repo.name());

    let client = build_github_client()?;
    tokio::time::sleep(Duration::from_millis(GITHUB_REQUEST_DELAY_MS)).await;

    let response = client
        .get(&url)
        .header(header::ACCEPT, "application/vnd.github+json")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        if status == reqwest::StatusCode::NOT_FOUND {
            tracing::warn!("Received 404 Not Found for repository {}", repo);
            return Err(GitHubError::RepoNotFound(repo.to_string()));
        }
        return Err(GitHubError::Http(status));
    }

    let repository: Repository = response.json().await?;
    Ok(repository)
}

/// Fetches the most recently created labels of a repository, narrowed
/// server-side to names containing "v". Callers do the strict release
/// filtering; this returns the raw page.
pub async fn fetch_release_labels(repository_id: u64) -> Result<Vec<Label>, GitHubError> {
    let url = format!(
        "{}/search/labels?repository_id={}&q=v&sort=created&order=desc&per_page=100",
        GITHUB_API_BASE, repository_id
    );

    let client = build_github_client()?;
    tokio::time::sleep(Duration::from_millis(GITHUB_REQUEST_DELAY_MS)).await;

    let response = client
        .get(&url)
        .header(header::ACCEPT, "application/vnd.github+json")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(GitHubError::RateLimited);
        }
        return Err(GitHubError::Http(status));
    }

    let results: SearchResults<Label> = response.json().await?;
    tracing::debug!("Fetched {} candidate labels", results.items.len());

    Ok(results.items)
}
