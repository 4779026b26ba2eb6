//! Fetch-and-parse pipeline: one HTTP GET turned into a list of articles.
//!
//! # Stages
//!
//! 1. **Validate** the URL. A malformed URL fails before any I/O.
//! 2. **Request** it once with bounded connect and read timeouts. Non-2xx
//!    statuses fail without touching the body.
//! 3. **Decode** the whole body as UTF-8 text.
//! 4. **Short-circuit** an empty or whitespace-only body to [`FetchOutcome::Empty`].
//! 5. **Parse** strictly: the envelope must have `response.results`, and
//!    every result must carry `sectionName`, `webTitle` and `webUrl`. One bad
//!    result fails the whole page.
//!
//! Every failure is logged here; callers that only want something to
//! display use [`FetchOutcome::into_articles`], which degrades all failures
//! to an empty list.

use crate::error::FetchError;
use crate::models::{ArticleRecord, SearchEnvelope, format_author};
use crate::utils::truncate_for_log;
use chrono::NaiveDate;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Reference connect timeout for the search request.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
/// Reference read timeout for the search request.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

const DISPLAY_DATE_FORMAT: &str = "%b %d, %Y";

/// Timeouts applied to the HTTP client used by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpSettings {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

impl HttpSettings {
    /// Build a [`Client`] honoring these timeouts.
    pub fn build_client(&self) -> Result<Client, reqwest::Error> {
        Client::builder()
            .connect_timeout(self.connect_timeout)
            .read_timeout(self.read_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The body parsed; the list may still be empty if the API found nothing.
    Success(Vec<ArticleRecord>),
    /// The body was empty or whitespace. Not an error.
    Empty,
    Failure(FetchError),
}

impl FetchOutcome {
    /// The articles to display. `Empty` and every `Failure` yield an empty list.
    pub fn into_articles(self) -> Vec<ArticleRecord> {
        match self {
            FetchOutcome::Success(articles) => articles,
            FetchOutcome::Empty | FetchOutcome::Failure(_) => Vec::new(),
        }
    }
}

/// Run the pipeline against `url`.
///
/// Never panics and never returns an error directly: every failure is logged
/// with enough context to diagnose it (URL, status code, or error text) and
/// folded into [`FetchOutcome::Failure`].
#[instrument(level = "info", skip_all)]
pub async fn fetch_articles(client: &Client, url: &str) -> FetchOutcome {
    let t0 = Instant::now();
    debug!(state = "requesting", "Pipeline started");

    let outcome = match request_body(client, url).await {
        Ok(body) if body.trim().is_empty() => {
            info!("Search returned an empty body");
            FetchOutcome::Empty
        }
        Ok(body) => match parse_articles(&body) {
            Ok(articles) => FetchOutcome::Success(articles),
            Err(e) => {
                error!(
                    error = %e,
                    body_preview = %truncate_for_log(&body, 300),
                    "Problem parsing search results"
                );
                FetchOutcome::Failure(e)
            }
        },
        Err(e) => FetchOutcome::Failure(e),
    };

    let elapsed_ms = t0.elapsed().as_millis();
    match &outcome {
        FetchOutcome::Success(articles) => {
            info!(count = articles.len(), elapsed_ms, state = "success", "Fetched articles")
        }
        FetchOutcome::Empty => info!(elapsed_ms, state = "empty", "No articles in response"),
        FetchOutcome::Failure(e) => warn!(error = %e, elapsed_ms, state = "failure", "Fetch failed"),
    }
    outcome
}

/// Validate `url`, GET it, and return the decoded body of a 2xx response.
async fn request_body(client: &Client, url: &str) -> Result<String, FetchError> {
    let parsed = match Url::parse(url) {
        Ok(u) => u,
        Err(e) => {
            error!(%url, error = %e, "Problem building the URL");
            return Err(e.into());
        }
    };
    let log_url = crate::request::redact_api_key(&parsed);

    // The response owns the connection; it is released when dropped on any path.
    let response = match client.get(parsed).send().await {
        Ok(r) => r,
        Err(e) => {
            error!(url = %log_url, error = %e, "Problem making the HTTP request");
            return Err(e.into());
        }
    };

    let status = response.status();
    if !status.is_success() {
        error!(url = %log_url, status = status.as_u16(), "Error response code");
        return Err(FetchError::HttpStatus(status.as_u16()));
    }

    let bytes = match response.bytes().await {
        Ok(b) => b,
        Err(e) => {
            error!(url = %log_url, error = %e, "Problem reading the response body");
            return Err(e.into());
        }
    };
    debug!(bytes = bytes.len(), "Read response body");

    String::from_utf8(bytes.to_vec()).map_err(|e| {
        error!(url = %log_url, error = %e, "Response body is not valid UTF-8");
        FetchError::Network(format!("invalid UTF-8 in body: {e}"))
    })
}

/// Parse a search response body into articles, preserving result order.
///
/// # Errors
///
/// [`FetchError::MalformedJson`] if the body is not a `response.results`
/// envelope or any result lacks a required key.
pub fn parse_articles(body: &str) -> Result<Vec<ArticleRecord>, FetchError> {
    let envelope: SearchEnvelope =
        serde_json::from_str(body).map_err(|e| FetchError::MalformedJson(e.to_string()))?;
    let response = envelope.response;

    if response.status.as_deref() == Some("error") {
        warn!(
            message = response.message.as_deref().unwrap_or(""),
            "API reported an error status"
        );
    }
    debug!(
        total = ?response.total,
        current_page = ?response.current_page,
        pages = ?response.pages,
        results = response.results.len(),
        "Parsed search envelope"
    );

    let articles = response
        .results
        .into_iter()
        .map(|entry| {
            let published_date = entry
                .web_publication_date
                .as_deref()
                .and_then(reformat_date)
                .unwrap_or_default();
            let author = format_author(entry.fields.as_ref().and_then(|f| f.byline.as_deref()));
            ArticleRecord::new(
                entry.section_name,
                entry.web_title,
                author,
                published_date,
                entry.web_url,
            )
        })
        .collect();

    Ok(articles)
}

/// Reformat an ISO-8601 timestamp to `"Aug 27, 2018"`.
///
/// Only the leading `yyyy-MM-dd` is significant; anything after it is
/// ignored. Returns `None` if that prefix is not a valid date.
pub fn reformat_date(iso: &str) -> Option<String> {
    let prefix = iso.trim().get(..10)?;
    match NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
        Ok(date) => Some(date.format(DISPLAY_DATE_FORMAT).to_string()),
        Err(e) => {
            warn!(date = %iso, error = %e, "Problem parsing the date");
            None
        }
    }
}
