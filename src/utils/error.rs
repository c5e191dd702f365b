// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode), // e.g., 422 Unprocessable Entity

    #[error("GitHub rate limit likely exceeded")]
    RateLimited, // Unauthenticated search quota is small

    #[error("Repository not found: {0}")]
    RepoNotFound(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// A label or CLI argument that does not match the strict `vMAJOR.MINOR.PATCH`
/// release pattern.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid release version '{0}': expected vMAJOR.MINOR.PATCH, e.g. v7.3.0")]
pub struct InvalidVersion(pub String);

/// A repository argument that is not in `owner/name` form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid repository '{0}': expected owner/name, e.g. elastic/kibana")]
pub struct InvalidRepoSlug(pub String);

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("GitHub interaction failed: {0}")]
    GitHub(#[from] GitHubError), // Automatically convert GitHub errors

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Data processing failed: {0}")]
    Processing(String),
}
