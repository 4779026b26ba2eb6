//! Hand a selected article's link to the platform browser.

use thiserror::Error;
use tracing::{info, instrument};
use url::Url;

#[derive(Debug, Error)]
pub enum OpenError {
    /// The record's link is not an absolute http(s) URL
    #[error("not an openable URL: {0}")]
    InvalidUrl(String),

    /// The platform opener could not be launched
    #[error("could not launch browser: {0}")]
    Launch(#[from] std::io::Error),
}

/// Opens a URL outside this process.
pub trait UrlOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<(), OpenError>;
}

/// Opens links with the desktop's default browser via the `open` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserOpener;

impl UrlOpener for BrowserOpener {
    #[instrument(level = "info", skip(self))]
    fn open(&self, url: &str) -> Result<(), OpenError> {
        let parsed = validate(url)?;
        open::that_detached(parsed.as_str())?;
        info!("Opened article in browser");
        Ok(())
    }
}

/// Accept only absolute `http`/`https` URLs.
pub fn validate(url: &str) -> Result<Url, OpenError> {
    match Url::parse(url) {
        Ok(u) if matches!(u.scheme(), "http" | "https") => Ok(u),
        _ => Err(OpenError::InvalidUrl(url.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_web_links() {
        assert!(validate("https://www.theguardian.com/sport/2018/aug/27/ashes").is_ok());
        assert!(validate("http://example.com").is_ok());
    }

    #[test]
    fn test_validate_rejects_everything_else() {
        for bad in ["", "www.theguardian.com/sport", "file:///etc/passwd", "javascript:alert(1)"] {
            assert!(
                matches!(validate(bad), Err(OpenError::InvalidUrl(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_browser_opener_rejects_invalid_url_without_launching() {
        let err = BrowserOpener.open("not a url").unwrap_err();
        assert_eq!(err.to_string(), "not an openable URL: not a url");
    }
}
