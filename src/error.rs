//! Error types for the fetch pipeline and the application shell.
//!
//! [`FetchError`] is the taxonomy of everything that can go wrong between
//! building a search URL and holding a parsed list of articles. None of these
//! are shown to the user individually; they are logged and the screen falls
//! back to its empty state. [`AppError`] covers the surrounding plumbing:
//! options files, output files and HTTP client construction.

use thiserror::Error;

/// Failure kinds of the fetch-and-parse pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request URL could not be parsed. No request was sent.
    #[error("malformed URL: {0}")]
    MalformedUrl(String),

    /// Connect, read, timeout, or body decoding failure.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status. The body was not parsed.
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// The body did not match the expected `response.results` shape, or a
    /// result was missing one of its required keys.
    #[error("malformed JSON: {0}")]
    MalformedJson(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) if e.is_status() => FetchError::HttpStatus(status.as_u16()),
            _ => FetchError::Network(e.to_string()),
        }
    }
}

impl From<url::ParseError> for FetchError {
    fn from(e: url::ParseError) -> Self {
        FetchError::MalformedUrl(e.to_string())
    }
}

/// Errors raised by the application shell around the pipeline.
#[derive(Debug, Error)]
pub enum AppError {
    /// Options file could not be read or parsed
    #[error("config error in {path}: {message}")]
    Config {
        /// Path of the offending file
        path: String,
        /// What went wrong
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}
