//! Output writers for a loaded article list.
//!
//! # Submodules
//!
//! - [`json`]: Writes an [`ArticleSnapshot`](crate::models::ArticleSnapshot) as JSON
//! - [`markdown`]: Renders the same snapshot as a Markdown reading list
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── articles.json
//!
//! markdown_output_dir/
//! └── articles.md
//! ```
//!
//! Each run overwrites the previous file: the snapshot mirrors the list on
//! screen, which is itself replaced wholesale on every load.

pub mod json;
pub mod markdown;
