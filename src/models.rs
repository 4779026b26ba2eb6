//! Data models for search results and their display-ready representation.
//!
//! This module defines:
//! - Wire types ([`SearchEnvelope`], [`SearchResponse`], [`ResultEntry`],
//!   [`ResultFields`]) mirroring the content API's JSON shape
//! - [`ArticleRecord`]: the immutable, display-ready article built from one
//!   [`ResultEntry`]
//! - [`ArticleSnapshot`]: a loaded list plus the query that produced it
//!
//! The wire types use `#[serde(rename_all = "camelCase")]` so the Rust field
//! names stay snake_case while matching the API's camelCase keys.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Placeholder shown in the author slot when a result has no byline.
pub const NO_AUTHOR: &str = " ";

/// Top-level JSON object returned by the search endpoint.
///
/// Only `response` is required. Unknown keys are ignored.
#[derive(Debug, Deserialize)]
pub struct SearchEnvelope {
    pub response: SearchResponse,
}

/// The `response` object of a search reply.
///
/// The paging metadata is optional and informational only; it is logged but
/// never influences the parsed list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// `"ok"` or `"error"`.
    pub status: Option<String>,
    /// Error text the API attaches when `status == "error"`.
    pub message: Option<String>,
    /// Total number of matches across all pages.
    pub total: Option<u64>,
    pub current_page: Option<u64>,
    pub pages: Option<u64>,
    /// The page of results, in the order the API ranked them.
    pub results: Vec<ResultEntry>,
}

/// One element of `response.results`.
///
/// `section_name`, `web_title` and `web_url` are required: a result missing
/// any of them fails deserialization of the whole envelope. The date and the
/// byline are best effort; a value of the wrong type reads as absent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEntry {
    pub section_name: String,
    pub web_title: String,
    pub web_url: String,
    /// ISO-8601 timestamp such as `2018-08-27T10:00:00Z`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub web_publication_date: Option<String>,
    /// Present when the request asked for `show-fields`.
    #[serde(default, deserialize_with = "lenient_fields")]
    pub fields: Option<ResultFields>,
}

/// Extra fields requested through `show-fields`.
#[derive(Debug, Deserialize)]
pub struct ResultFields {
    #[serde(default, deserialize_with = "lenient_string")]
    pub byline: Option<String>,
}

/// Accept any JSON value, keeping it only if it is a string.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_str().map(str::to_owned)))
}

/// Accept any JSON value, keeping it only if it is an object.
fn lenient_fields<'de, D>(deserializer: D) -> Result<Option<ResultFields>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// A parsed, display-ready news article.
///
/// Records are created once per successful fetch and never mutated; the
/// fields are private and exposed through accessors.
///
/// # Fields
///
/// * `section` - Editorial section label (e.g. "Sport")
/// * `title` - Full headline; truncation is the display layer's business
/// * `author` - `"By <byline>"`, or [`NO_AUTHOR`] when there is no byline
/// * `published_date` - `"Aug 27, 2018"` style date, or empty if unknown
/// * `url` - Link to the article on the publisher's site
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleRecord {
    section: String,
    title: String,
    author: String,
    published_date: String,
    url: String,
}

impl ArticleRecord {
    pub fn new(
        section: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        published_date: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            section: section.into(),
            title: title.into(),
            author: author.into(),
            published_date: published_date.into(),
            url: url.into(),
        }
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn published_date(&self) -> &str {
        &self.published_date
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// The list as it was displayed after a load, for the output writers.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleSnapshot {
    pub topic: String,
    pub order_by: String,
    /// Local time of the snapshot, RFC 3339.
    pub fetched_at: String,
    pub articles: Vec<ArticleRecord>,
}

/// Format an optional byline the way the list displays it.
///
/// ```ignore
/// assert_eq!(format_author(Some("Jane Doe")), "By Jane Doe");
/// assert_eq!(format_author(None), " ");
/// ```
pub fn format_author(byline: Option<&str>) -> String {
    match byline {
        Some(name) => format!("By {name}"),
        None => NO_AUTHOR.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_deserialization() {
        let json = r#"{
            "response": {
                "status": "ok",
                "total": 2401,
                "currentPage": 1,
                "pages": 241,
                "results": [{
                    "sectionName": "Sport",
                    "webTitle": "England win the Ashes",
                    "webUrl": "https://www.theguardian.com/sport/ashes",
                    "webPublicationDate": "2018-08-27T10:00:00Z",
                    "fields": { "byline": "Jane Doe" }
                }]
            }
        }"#;

        let envelope: SearchEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.response.status.as_deref(), Some("ok"));
        assert_eq!(envelope.response.pages, Some(241));
        assert_eq!(envelope.response.results.len(), 1);

        let entry = &envelope.response.results[0];
        assert_eq!(entry.section_name, "Sport");
        assert_eq!(entry.fields.as_ref().unwrap().byline.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_entry_missing_web_url_is_rejected() {
        let json = r#"{ "sectionName": "Sport", "webTitle": "Headline" }"#;
        let parsed = serde_json::from_str::<ResultEntry>(json);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_entry_without_fields_or_date() {
        let json = r#"{ "sectionName": "Sport", "webTitle": "Headline", "webUrl": "https://example.com" }"#;
        let entry: ResultEntry = serde_json::from_str(json).unwrap();
        assert!(entry.fields.is_none());
        assert!(entry.web_publication_date.is_none());
    }

    #[test]
    fn test_entry_with_mistyped_optional_values() {
        let json = r#"{
            "sectionName": "Sport",
            "webTitle": "Headline",
            "webUrl": "https://example.com",
            "webPublicationDate": 20180827,
            "fields": { "byline": ["Jane", "Doe"] }
        }"#;
        let entry: ResultEntry = serde_json::from_str(json).unwrap();
        assert!(entry.web_publication_date.is_none());
        assert!(entry.fields.unwrap().byline.is_none());

        let json = r#"{ "sectionName": "Sport", "webTitle": "H", "webUrl": "u", "fields": "byline" }"#;
        let entry: ResultEntry = serde_json::from_str(json).unwrap();
        assert!(entry.fields.is_none());
    }

    #[test]
    fn test_entry_with_mistyped_title_is_rejected() {
        let json = r#"{ "sectionName": "Sport", "webTitle": 7, "webUrl": "https://example.com" }"#;
        assert!(serde_json::from_str::<ResultEntry>(json).is_err());
    }

    #[test]
    fn test_format_author() {
        assert_eq!(format_author(Some("Jane Doe")), "By Jane Doe");
        assert_eq!(format_author(None), NO_AUTHOR);
    }

    #[test]
    fn test_article_record_serialization() {
        let record = ArticleRecord::new(
            "Sport",
            "England win the Ashes",
            "By Jane Doe",
            "Aug 27, 2018",
            "https://www.theguardian.com/sport/ashes",
        );

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""section":"Sport""#));
        assert!(json.contains(r#""published_date":"Aug 27, 2018""#));
        assert_eq!(record.url(), "https://www.theguardian.com/sport/ashes");
    }
}
