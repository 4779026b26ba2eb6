//! Small helpers shared by the pipeline, the screen and the output writers.
//!
//! - String truncation for log lines and narrow terminal columns
//! - File system validation for output directories

use crate::error::AppError;
use std::path::Path;
use tokio::fs;
use tracing::{debug, instrument, warn};

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (backing off to the nearest
/// character boundary) with an ellipsis and byte count appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Fit `s` into `width` characters, replacing the tail with `…` if needed.
///
/// Used by the list view; the underlying record is never shortened.
pub fn truncate_to_width(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(width - 1).collect();
    out.push('…');
    out
}

/// Create `path` if needed and check that files can be written into it.
///
/// Called at startup for each output directory so a bad path fails the run
/// before anything is fetched. The check writes and removes a hidden marker
/// file named after the process id.
///
/// # Errors
///
/// [`AppError::Io`] if the directory cannot be created or written to.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), AppError> {
    let dir = Path::new(path);
    fs::create_dir_all(dir).await?;

    let marker = dir.join(format!(".extra_extra_news.{}.tmp", std::process::id()));
    fs::write(&marker, b"").await?;
    if let Err(e) = fs::remove_file(&marker).await {
        warn!(marker = %marker.display(), error = %e, "Could not remove write-check file");
    }
    debug!("Output directory is writable");
    Ok(())
}
