// src/github/models.rs
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::utils::error::InvalidRepoSlug;

// --- Search API Envelope ---

/// Envelope returned by the GitHub search endpoints.
#[derive(Debug, Deserialize)]
pub struct SearchResults<T> {
    pub total_count: u64,
    pub incomplete_results: bool,
    pub items: Vec<T>,
}

// --- Issues and Labels ---

/// An issue or pull request as returned by the issue search. Only the fields
/// the digest consumes are modeled; everything else in the payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub state: IssueState,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

/// Repository record from `GET /repos/{owner}/{name}`. The numeric id is what
/// the label search endpoint takes instead of an owner/name pair.
#[derive(Debug, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub full_name: String,
}

// --- Repository Identification ---

/// A repository identifier in `owner/name` form, e.g. `elastic/kibana`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    owner: String,
    name: String,
}

impl RepoSlug {
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for RepoSlug {
    type Err = InvalidRepoSlug;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner, name) = s
            .split_once('/')
            .ok_or_else(|| InvalidRepoSlug(s.to_string()))?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(InvalidRepoSlug(s.to_string()));
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

// --- Visibility Filtering ---

/// Which ticket states make it into the rendered digest. This only affects
/// display; release deduplication looks at every fetched ticket regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateFilter {
    /// Closed tickets only, the default. An open ticket's note can still
    /// change before it merges.
    ClosedOnly,
    /// Closed and open tickets alike.
    All,
}

impl StateFilter {
    pub fn admits(self, state: IssueState) -> bool {
        match self {
            StateFilter::All => true,
            StateFilter::ClosedOnly => state == IssueState::Closed,
        }
    }
}
