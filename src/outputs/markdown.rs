//! Markdown reading list of the displayed list.
//!
//! Articles are grouped under one heading per section (alphabetically),
//! keeping the API's order within each section.

use crate::error::AppError;
use crate::models::{ArticleRecord, ArticleSnapshot};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument};

pub const MARKDOWN_FILENAME: &str = "articles.md";

/// Render `snapshot` as Markdown.
pub fn snapshot_to_markdown(snapshot: &ArticleSnapshot) -> String {
    let mut md = format!(
        "# {} ({})\n\n_Fetched {}_\n\n",
        snapshot.topic, snapshot.order_by, snapshot.fetched_at
    );

    if snapshot.articles.is_empty() {
        md.push_str("No articles found.\n");
        return md;
    }

    let mut by_section: BTreeMap<&str, Vec<&ArticleRecord>> = BTreeMap::new();
    for article in &snapshot.articles {
        by_section.entry(article.section()).or_default().push(article);
    }

    for (section, articles) in by_section {
        md.push_str(&format!("## {section}\n\n"));
        for article in articles {
            md.push_str(&format!("- [{}]({})", escape_brackets(article.title()), article.url()));
            let author = article.author().trim();
            if !author.is_empty() {
                md.push_str(&format!(" {author}"));
            }
            if !article.published_date().is_empty() {
                md.push_str(&format!(", {}", article.published_date()));
            }
            md.push('\n');
        }
        md.push('\n');
    }
    md
}

fn escape_brackets(s: &str) -> String {
    s.replace('[', "\\[").replace(']', "\\]")
}

/// Write the Markdown rendering to `{markdown_output_dir}/articles.md`.
#[instrument(level = "info", skip_all, fields(%markdown_output_dir))]
pub async fn write_snapshot(
    snapshot: &ArticleSnapshot,
    markdown_output_dir: &str,
) -> Result<PathBuf, AppError> {
    fs::create_dir_all(markdown_output_dir).await?;
    let path = PathBuf::from(markdown_output_dir).join(MARKDOWN_FILENAME);
    fs::write(&path, snapshot_to_markdown(snapshot)).await?;
    info!(path = %path.display(), "Wrote Markdown reading list");
    Ok(path)
}
