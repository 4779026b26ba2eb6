//! Search request construction.
//!
//! Turns a base endpoint plus [`SearchOptions`] into the fully qualified
//! query URL. The parameter names are fixed by the content API:
//!
//! | Parameter | Source |
//! |-----------|--------|
//! | `api-key` | [`SearchOptions::api_key`] |
//! | `q` | [`SearchOptions::topic`] |
//! | `order-by` | [`SearchOptions::order_by`] |
//! | `page-size` | [`SearchOptions::page_size`] |
//! | `show-fields` | [`SearchOptions::show_fields`], comma-joined |
//! | `show-tags` | [`SearchOptions::show_tags`], comma-joined |
//!
//! Parameters are always appended in the order above so the same options
//! produce the same URL.

use crate::error::FetchError;
use itertools::Itertools;
use std::fmt;
use tracing::debug;
use url::Url;

/// Search endpoint of The Guardian content API.
pub const GUARDIAN_SEARCH_URL: &str = "https://content.guardianapis.com/search";

/// Options that shape a single search request.
///
/// Values are passed through verbatim; the remote service is the final
/// authority on whether e.g. an `order_by` value is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub api_key: String,
    pub topic: String,
    pub order_by: String,
    pub page_size: u32,
    pub show_fields: Vec<String>,
    pub show_tags: Vec<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            api_key: "test".to_string(),
            topic: "sports".to_string(),
            order_by: OrderBy::Newest.to_string(),
            page_size: 10,
            show_fields: vec!["byline".to_string()],
            show_tags: vec!["contributor".to_string()],
        }
    }
}

/// Sort orders the content API understands.
///
/// Used for CLI value hints only; [`SearchOptions`] keeps the raw string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OrderBy {
    Newest,
    Oldest,
    Relevance,
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderBy::Newest => "newest",
            OrderBy::Oldest => "oldest",
            OrderBy::Relevance => "relevance",
        };
        f.write_str(s)
    }
}

/// Build the search URL for `options` on top of `base_url`.
///
/// Query parameters already present on `base_url` are kept. A trailing bare
/// `?` is accepted.
///
/// # Errors
///
/// Returns [`FetchError::MalformedUrl`] if `base_url` does not parse.
pub fn build_request_url(base_url: &str, options: &SearchOptions) -> Result<Url, FetchError> {
    let mut url = Url::parse(base_url)?;

    // Url keeps an empty query for "…/search?"; drop it so the pairs start clean.
    if url.query() == Some("") {
        url.set_query(None);
    }

    url.query_pairs_mut()
        .append_pair("api-key", &options.api_key)
        .append_pair("q", &options.topic)
        .append_pair("order-by", &options.order_by)
        .append_pair("page-size", &options.page_size.to_string())
        .append_pair("show-fields", &options.show_fields.iter().join(","))
        .append_pair("show-tags", &options.show_tags.iter().join(","));

    debug!(url = %redact_api_key(&url), "Built search request URL");
    Ok(url)
}

/// Copy of `url` with the `api-key` value masked, for logging.
pub fn redact_api_key(url: &Url) -> Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            if k == "api-key" {
                (k.into_owned(), "***".to_string())
            } else {
                (k.into_owned(), v.into_owned())
            }
        })
        .collect();

    let mut redacted = url.clone();
    if pairs.is_empty() {
        return redacted;
    }
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted
}
