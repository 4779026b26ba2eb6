//! List view binding parsed articles to terminal rows.
//!
//! One row per [`ArticleRecord`], numbered from 1. Each row shows the four
//! visible fields: section, title, author and date. Selecting a row yields
//! that record's URL; what happens with it is the caller's business.
//!
//! The view holds nothing but the current list and the message shown when
//! that list is empty. Replacing the list re-renders every row.

use crate::models::ArticleRecord;
use crate::utils::truncate_to_width;

/// Width used when the terminal width is unknown.
pub const DEFAULT_WIDTH: usize = 80;

// Row numbers are right-aligned to at least this many digits.
const MIN_INDEX_DIGITS: usize = 2;

#[derive(Debug, Clone, Default)]
pub struct ArticleList {
    articles: Vec<ArticleRecord>,
    empty_message: String,
}

impl ArticleList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new list. The previous one is dropped in full.
    pub fn replace(&mut self, articles: Vec<ArticleRecord>) {
        self.articles = articles;
    }

    pub fn clear(&mut self) {
        self.articles.clear();
    }

    pub fn set_empty_message(&mut self, message: impl Into<String>) {
        self.empty_message = message.into();
    }

    pub fn empty_message(&self) -> &str {
        &self.empty_message
    }

    pub fn articles(&self) -> &[ArticleRecord] {
        &self.articles
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Record shown on 1-based row `row`.
    pub fn get(&self, row: usize) -> Option<&ArticleRecord> {
        row.checked_sub(1).and_then(|i| self.articles.get(i))
    }

    /// Selection event: the URL behind 1-based row `row`.
    pub fn select(&self, row: usize) -> Option<&str> {
        self.get(row).map(ArticleRecord::url)
    }

    /// Render every row, or the empty-state message when there are none.
    ///
    /// Titles wider than `width` are shortened with an ellipsis.
    pub fn render(&self, width: usize) -> String {
        if self.articles.is_empty() {
            return format!("{}\n", self.empty_message());
        }

        let digits = self.articles.len().to_string().len().max(MIN_INDEX_DIGITS);
        // "NN. " in front of the title, as many spaces in front of the meta line
        let gutter = digits + 2;
        let title_width = width.saturating_sub(gutter).max(1);
        let mut out = String::new();
        for (i, article) in self.articles.iter().enumerate() {
            out.push_str(&render_row(i + 1, article, digits, title_width));
        }
        out
    }
}

fn render_row(row: usize, article: &ArticleRecord, digits: usize, title_width: usize) -> String {
    let mut meta = vec![article.section().to_uppercase()];
    if !article.author().trim().is_empty() {
        meta.push(article.author().to_string());
    }
    if !article.published_date().is_empty() {
        meta.push(article.published_date().to_string());
    }

    format!(
        "{row:>digits$}. {}\n{:indent$}{}\n",
        truncate_to_width(article.title(), title_width),
        "",
        truncate_to_width(&meta.join(" · "), title_width),
        indent = digits + 2,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(section: &str, title: &str, author: &str, date: &str, url: &str) -> ArticleRecord {
        ArticleRecord::new(section, title, author, date, url)
    }

    fn sample() -> Vec<ArticleRecord> {
        vec![
            record("Sport", "Kane double sinks Spurs", "By Sean Ingle", "Aug 27, 2018", "https://example.com/1"),
            record("Football", "Transfer window closes", " ", "", "https://example.com/2"),
        ]
    }

    #[test]
    fn test_select_is_one_based() {
        let mut list = ArticleList::new();
        list.replace(sample());

        assert_eq!(list.select(1), Some("https://example.com/1"));
        assert_eq!(list.select(2), Some("https://example.com/2"));
        assert_eq!(list.select(0), None);
        assert_eq!(list.select(3), None);
    }

    #[test]
    fn test_replace_swaps_whole_list() {
        let mut list = ArticleList::new();
        list.replace(sample());
        list.replace(vec![record("Culture", "New album", " ", "", "https://example.com/9")]);

        assert_eq!(list.len(), 1);
        assert_eq!(list.get(1).unwrap().section(), "Culture");
    }

    #[test]
    fn test_render_rows() {
        let mut list = ArticleList::new();
        list.replace(sample());

        let rendered = list.render(DEFAULT_WIDTH);
        assert_eq!(
            rendered,
            " 1. Kane double sinks Spurs\n    SPORT · By Sean Ingle · Aug 27, 2018\n \
             2. Transfer window closes\n    FOOTBALL\n"
        );
    }

    #[test]
    fn test_render_truncates_titles_only_for_display() {
        let mut list = ArticleList::new();
        list.replace(vec![record(
            "Sport",
            "An extraordinarily long headline that will not fit",
            " ",
            "",
            "https://example.com/1",
        )]);

        let rendered = list.render(26);
        assert!(rendered.starts_with(" 1. An extraordinarily lo…\n"), "{rendered}");
        assert_eq!(
            list.get(1).unwrap().title(),
            "An extraordinarily long headline that will not fit"
        );
    }

    #[test]
    fn test_render_widens_gutter_for_three_digit_rows() {
        let mut list = ArticleList::new();
        list.replace(
            (1..=120)
                .map(|i| record("Sport", &"x".repeat(40), "By Someone Else", "", &format!("https://example.com/{i}")))
                .collect(),
        );

        let width = 30;
        let rendered = list.render(width);
        for line in rendered.lines() {
            assert!(line.chars().count() <= width, "{line:?}");
        }
        assert!(rendered.starts_with("  1. "), "{rendered}");
        assert!(rendered.contains("\n120. "));
        assert!(rendered.contains("\n     SPORT"));
    }

    #[test]
    fn test_render_empty_state() {
        let mut list = ArticleList::new();
        list.set_empty_message("No articles found.");
        assert_eq!(list.render(DEFAULT_WIDTH), "No articles found.\n");

        list.replace(sample());
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.render(DEFAULT_WIDTH), "No articles found.\n");
    }
}
